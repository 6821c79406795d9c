// Use-case level inputs/outputs for the simulation loop.

use super::dock::DockStatus;
use crate::domain::{
    Effect, FireResult, FirearmState, HandId, MagazineId, RigError, SlideState,
};
use glam::Vec3;

/// Discrete events raised by the input and interaction layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RigInput {
    FirePressed,
    EjectPressed,
    SlideGripBegan { hand: HandId },
    // Explicit sample for the holding hand, applied immediately.
    SlideGripSample { position: Vec3 },
    SlideGripEnded { hand: HandId },
    HandMoved { hand: HandId, position: Vec3 },
    GrabZoneEntered { hand: HandId },
    GrabZoneExited { hand: HandId },
    MagazineEnteredDock { magazine: MagazineId },
    MagazineLeftDock { magazine: MagazineId },
    SpawnMagazine { capacity: Option<u32>, rounds: Option<i64> },
    DespawnMagazine { magazine: MagazineId },
    RefillMagazine { magazine: MagazineId },
    GunMoved(GunPose),
}

/// World-space pose of the parts of the gun the core needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GunPose {
    pub rail_closed: Vec3,
    pub rail_open: Vec3,
    pub muzzle_origin: Vec3,
    pub muzzle_direction: Vec3,
}

/// Immediate result of applying one input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RigOutcome {
    Applied,
    Fire(FireResult),
    Ejected(Option<MagazineId>),
    Spawned(MagazineId),
    // Whether a grip was started (false when already held or gated).
    GripStarted(bool),
    // Whether the finished grip racked the slide.
    GripEnded { charged: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FirearmSnapshot {
    pub state: FirearmState,
    pub slide_state: SlideState,
    pub charge: f32,
    // World position of the slide along its rail.
    pub slide_position: Vec3,
    pub holder: Option<HandId>,
    // Some hand is inside the grab zone.
    pub grab_enabled: bool,
    pub magazine: Option<MagazineId>,
    pub rounds: Option<u32>,
    pub dock: DockStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MagazineSnapshot {
    pub id: MagazineId,
    pub capacity: u32,
    pub rounds: u32,
    pub docked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimUpdate {
    pub tick: u64,
    pub firearm: FirearmSnapshot,
    pub magazines: Vec<MagazineSnapshot>,
    pub outcomes: Vec<RigOutcome>,
    pub effects: Vec<Effect>,
    pub rejected: Vec<RigError>,
}

impl SimUpdate {
    /// True when nothing happened this tick besides time passing.
    pub fn is_quiet(&self) -> bool {
        self.effects.is_empty() && self.rejected.is_empty() && self.outcomes.is_empty()
    }
}
