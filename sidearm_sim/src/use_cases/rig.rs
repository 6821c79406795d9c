// One firearm with its dock, two hand proxies and the grab zone, driven by discrete inputs.

use super::dock::DockManager;
use super::types::{FirearmSnapshot, GunPose, MagazineSnapshot, RigInput, RigOutcome};
use crate::domain::tuning::SlideTuning;
use crate::domain::{
    Clock, Effect, Firearm, FirearmId, GrabZone, HandId, Hands, Muzzle, RigError, SlideRail,
    Tuning,
};
use tracing::debug;

pub struct Rig<C> {
    clock: C,
    firearm: Firearm,
    dock: DockManager,
    hands: Hands,
    grab_zone: GrabZone,
    slide_tuning: SlideTuning,
}

impl<C> Rig<C>
where
    C: Clock,
{
    pub fn new(clock: C, tuning: Tuning) -> Self {
        Self {
            clock,
            firearm: Firearm::new(
                FirearmId(1),
                tuning.firearm,
                tuning.slide,
                SlideRail::default(),
            ),
            dock: DockManager::new(tuning.magazine),
            hands: Hands::default(),
            grab_zone: GrabZone::default(),
            slide_tuning: tuning.slide,
        }
    }

    pub fn firearm(&self) -> &Firearm {
        &self.firearm
    }

    pub fn dock(&self) -> &DockManager {
        &self.dock
    }

    pub fn hands(&self) -> &Hands {
        &self.hands
    }

    pub fn grab_zone(&self) -> &GrabZone {
        &self.grab_zone
    }

    pub fn now(&self) -> f64 {
        self.clock.now_seconds()
    }

    /// Applies one inbound event synchronously.
    pub fn apply(&mut self, input: RigInput) -> Result<RigOutcome, RigError> {
        let now = self.clock.now_seconds();
        let outcome = match input {
            RigInput::FirePressed => {
                RigOutcome::Fire(self.dock.fire(&mut self.firearm, now))
            }
            RigInput::EjectPressed => RigOutcome::Ejected(self.dock.eject(&mut self.firearm)),
            RigInput::SlideGripBegan { hand } => RigOutcome::GripStarted(self.begin_grip(hand)),
            RigInput::SlideGripSample { position } => {
                // Keep the holder's proxy in step so the next tick re-samples the same point.
                if let Some(holder) = self.firearm.slide().holder() {
                    self.hands.move_to(holder, position);
                }
                self.firearm.sample_slide(position);
                RigOutcome::Applied
            }
            RigInput::SlideGripEnded { hand } => RigOutcome::GripEnded {
                charged: self
                    .firearm
                    .release_slide(hand, now, self.dock.magazines()),
            },
            RigInput::HandMoved { hand, position } => {
                self.hands.move_to(hand, position);
                RigOutcome::Applied
            }
            RigInput::GrabZoneEntered { hand } => {
                self.grab_zone.enter(hand);
                RigOutcome::Applied
            }
            RigInput::GrabZoneExited { hand } => {
                self.grab_zone.exit(hand);
                RigOutcome::Applied
            }
            RigInput::MagazineEnteredDock { magazine } => {
                self.dock.dock(&mut self.firearm, magazine)?;
                RigOutcome::Applied
            }
            RigInput::MagazineLeftDock { magazine } => {
                self.dock.undock(&mut self.firearm, magazine)?;
                RigOutcome::Applied
            }
            RigInput::SpawnMagazine { capacity, rounds } => {
                RigOutcome::Spawned(self.dock.spawn(capacity, rounds)?)
            }
            RigInput::DespawnMagazine { magazine } => {
                self.dock.despawn(&mut self.firearm, magazine)?;
                RigOutcome::Applied
            }
            RigInput::RefillMagazine { magazine } => {
                self.dock.refill(magazine)?;
                RigOutcome::Applied
            }
            RigInput::GunMoved(pose) => {
                self.move_gun(pose);
                RigOutcome::Applied
            }
        };
        Ok(outcome)
    }

    /// Samples the holding hand, advances slide motion and returns the
    /// effects raised since the previous tick.
    pub fn tick(&mut self) -> Vec<Effect> {
        let now = self.clock.now_seconds();
        if let Some(hand) = self.firearm.slide().holder() {
            let position = self.hands.get(hand).position;
            self.firearm.sample_slide(position);
        }
        self.firearm.tick(now);
        self.firearm.drain_effects()
    }

    pub fn snapshot(&self) -> FirearmSnapshot {
        let slide = self.firearm.slide();
        let magazine = self.firearm.current_magazine();
        FirearmSnapshot {
            state: self.firearm.state(self.clock.now_seconds()),
            slide_state: slide.state(),
            charge: slide.charge(),
            slide_position: slide.rail().point_at(slide.charge()),
            holder: slide.holder(),
            grab_enabled: self.grab_zone.allows_grab(),
            magazine,
            rounds: magazine
                .and_then(|id| self.dock.magazine(id))
                .map(|magazine| magazine.rounds()),
            dock: self.dock.status(&self.firearm),
        }
    }

    pub fn magazine_snapshots(&self) -> Vec<MagazineSnapshot> {
        self.dock
            .magazines()
            .iter()
            .map(|magazine| MagazineSnapshot {
                id: magazine.id(),
                capacity: magazine.capacity(),
                rounds: magazine.rounds(),
                docked: magazine.docked_in().is_some(),
            })
            .collect()
    }

    fn begin_grip(&mut self, hand: HandId) -> bool {
        if self.slide_tuning.require_grab_zone && !self.grab_zone.contains(hand) {
            debug!(?hand, "slide grip outside grab zone ignored");
            return false;
        }
        if !self.firearm.grab_slide(hand) {
            return false;
        }
        // The grip starts where the hand already is.
        let position = self.hands.get(hand).position;
        self.firearm.sample_slide(position);
        true
    }

    fn move_gun(&mut self, pose: GunPose) {
        self.firearm
            .set_rail(SlideRail::new(pose.rail_closed, pose.rail_open));
        self.firearm
            .set_muzzle(Muzzle::new(pose.muzzle_origin, pose.muzzle_direction));
    }
}
