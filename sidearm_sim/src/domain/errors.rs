// Domain-level errors for rig workflows.
use super::magazine::MagazineId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigError {
    UnknownMagazine(MagazineId),
    MagazineAlreadyDocked(MagazineId),
    DockOccupied { docked: MagazineId },
    SpawnLimitReached { loose: MagazineId },
    InvalidCapacity,
}
