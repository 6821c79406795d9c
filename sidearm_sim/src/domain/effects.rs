// Outbound effects consumed by audio, animation, haptics and physics.

use super::magazine::MagazineId;
use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    ShotFired,
    DryFire,
    MagazineInserted {
        magazine: MagazineId,
    },
    // Pulled out of the dock by hand rather than ejected.
    MagazineRemoved {
        magazine: MagazineId,
    },
    MagazineEjected {
        magazine: MagazineId,
        impulse: Vec3,
    },
    SlideLocked,
    SlideUnlocked,
    HitTestRequested {
        origin: Vec3,
        direction: Vec3,
        max_range: f32,
    },
}
