// Gameplay tuning, kept separate from runtime configuration (tick rate, channel sizes).

pub mod firearm;
pub mod magazine;
pub mod slide;

pub use firearm::FirearmTuning;
pub use magazine::MagazineTuning;
pub use slide::SlideTuning;

use serde::Deserialize;

/// All gameplay tuning for one rig, as loaded from an optional TOML file.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Tuning {
    pub firearm: FirearmTuning,
    pub slide: SlideTuning,
    pub magazine: MagazineTuning,
}
