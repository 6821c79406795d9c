use serde::Deserialize;

/// Gameplay tuning for the slide rail.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct SlideTuning {
    /// Pull depth (0..1) that counts as racking the slide.
    pub charge_threshold: f32,

    /// How far back (0..1) a fired blowback goes.
    pub blowback_depth: f32,

    /// Duration of the backward blowback stroke in seconds.
    pub blowback_back_secs: f64,

    /// Duration of the forward blowback stroke in seconds.
    pub blowback_return_secs: f64,

    /// Duration of the return to closed after a release (0 snaps).
    pub release_return_secs: f64,

    /// Only allow a grip from a hand that is inside the grab zone.
    pub require_grab_zone: bool,
}

impl Default for SlideTuning {
    fn default() -> Self {
        Self {
            charge_threshold: 0.7,
            blowback_depth: 0.65,
            blowback_back_secs: 0.05,
            blowback_return_secs: 0.08,
            release_return_secs: 0.06,
            require_grab_zone: false,
        }
    }
}
