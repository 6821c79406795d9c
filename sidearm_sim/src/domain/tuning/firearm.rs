use glam::Vec3;
use serde::Deserialize;

/// Gameplay tuning for the fire-rate gate, hit test and ejection.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct FirearmTuning {
    /// Seconds between two accepted shots.
    pub fire_cooldown_secs: f64,

    /// Seconds the trigger is gated after a dry fire.
    pub dry_cooldown_secs: f64,

    /// Hit-test range in meters.
    pub max_range: f32,

    /// World-space impulse handed to physics when a magazine is ejected.
    pub eject_impulse: Vec3,
}

impl Default for FirearmTuning {
    fn default() -> Self {
        Self {
            fire_cooldown_secs: 0.12,
            dry_cooldown_secs: 0.1,
            max_range: 100.0,
            eject_impulse: Vec3::new(0.0, -1.5, 0.0),
        }
    }
}
