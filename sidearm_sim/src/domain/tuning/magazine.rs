use serde::Deserialize;

/// Gameplay tuning for spawned magazines.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct MagazineTuning {
    /// Rounds a freshly spawned magazine can hold.
    pub capacity: u32,

    /// Refuse a new spawn while the last spawned magazine is still loose.
    pub one_at_a_time: bool,
}

impl Default for MagazineTuning {
    fn default() -> Self {
        Self {
            capacity: 15,
            one_at_a_time: true,
        }
    }
}
