// Use cases layer: application workflows for the firearm simulation.

pub mod dock;
pub mod rig;
pub mod simulation;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use dock::{DockManager, DockStatus};
pub use rig::Rig;
pub use simulation::{SimSettings, sim_task};
pub use types::{
    FirearmSnapshot, GunPose, MagazineSnapshot, RigInput, RigOutcome, SimUpdate,
};
