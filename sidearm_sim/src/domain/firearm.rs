// Firearm: fire-rate gate, arming policy and the firearm side of the dock link.

use super::effects::Effect;
use super::hands::HandId;
use super::magazine::{Magazine, MagazineId, MagazineStore};
use super::slide::{SlideAssembly, SlideRail};
use super::tuning::{FirearmTuning, SlideTuning};
use glam::Vec3;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FirearmId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireResult {
    Fired,
    Dry,
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirearmState {
    Idle,
    Cooldown,
    Locked,
}

/// World-space origin and forward direction of the barrel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Muzzle {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Default for Muzzle {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
        }
    }
}

impl Muzzle {
    /// Builds a muzzle pose, falling back to +Z for a zero-length direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.try_normalize().unwrap_or(Vec3::Z),
        }
    }
}

#[derive(Debug)]
pub struct Firearm {
    id: FirearmId,
    tuning: FirearmTuning,
    slide: SlideAssembly,
    muzzle: Muzzle,
    // Non-owning; the magazine itself lives in the `MagazineStore`.
    current_magazine: Option<MagazineId>,
    next_fire_time: f64,
    effects: Vec<Effect>,
}

impl Firearm {
    pub fn new(
        id: FirearmId,
        tuning: FirearmTuning,
        slide_tuning: SlideTuning,
        rail: SlideRail,
    ) -> Self {
        Self {
            id,
            tuning,
            slide: SlideAssembly::new(slide_tuning, rail),
            muzzle: Muzzle::default(),
            current_magazine: None,
            next_fire_time: f64::NEG_INFINITY,
            effects: Vec::new(),
        }
    }

    pub fn id(&self) -> FirearmId {
        self.id
    }

    pub fn slide(&self) -> &SlideAssembly {
        &self.slide
    }

    pub fn muzzle(&self) -> Muzzle {
        self.muzzle
    }

    pub fn current_magazine(&self) -> Option<MagazineId> {
        self.current_magazine
    }

    pub fn next_fire_time(&self) -> f64 {
        self.next_fire_time
    }

    /// Armed means the slide is not locked back.
    pub fn is_armed(&self) -> bool {
        !self.slide.is_locked()
    }

    pub fn state(&self, now: f64) -> FirearmState {
        if self.slide.is_locked() {
            FirearmState::Locked
        } else if now < self.next_fire_time {
            FirearmState::Cooldown
        } else {
            FirearmState::Idle
        }
    }

    pub fn set_muzzle(&mut self, muzzle: Muzzle) {
        self.muzzle = muzzle;
    }

    pub fn set_rail(&mut self, rail: SlideRail) {
        self.slide.set_rail(rail);
    }

    /// Takes every effect raised since the last drain, in order.
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    pub fn request_fire(&mut self, now: f64, magazines: &mut MagazineStore) -> FireResult {
        if now < self.next_fire_time {
            return FireResult::Blocked;
        }
        if self.slide.is_locked() {
            debug!(firearm = self.id.0, "fire blocked by locked slide");
            return FireResult::Blocked;
        }

        let Some(magazine) = self.docked_magazine_mut(magazines) else {
            return self.dry_fire(now);
        };
        if !magazine.consume() {
            return self.dry_fire(now);
        }
        let rounds_left = magazine.rounds();

        // Ammo and the rate gate are settled before any side effect runs.
        self.next_fire_time = now + self.tuning.fire_cooldown_secs;
        self.effects.push(Effect::ShotFired);
        self.slide.play_blowback(now);
        self.effects.push(Effect::HitTestRequested {
            origin: self.muzzle.origin,
            direction: self.muzzle.direction,
            max_range: self.tuning.max_range,
        });
        info!(firearm = self.id.0, rounds_left, "shot fired");

        if rounds_left == 0 {
            self.slide.force_lock();
            self.effects.push(Effect::SlideLocked);
            debug!(firearm = self.id.0, "magazine empty; slide locked open");
        }
        FireResult::Fired
    }

    fn dry_fire(&mut self, now: f64) -> FireResult {
        self.next_fire_time = now + self.tuning.dry_cooldown_secs;
        self.effects.push(Effect::DryFire);
        debug!(firearm = self.id.0, "dry fire");
        FireResult::Dry
    }

    /// Re-arms the weapon after a deliberate rack, if there is ammo to chamber.
    pub fn on_slide_charged(&mut self, now: f64, magazines: &MagazineStore) -> bool {
        let has_ammo = self
            .current_magazine
            .and_then(|id| magazines.get(id))
            .is_some_and(|magazine| !magazine.is_empty());
        if !has_ammo {
            debug!(firearm = self.id.0, "slide charged with nothing to chamber");
            return false;
        }
        if !self.slide.unlock(now) {
            return false;
        }
        self.effects.push(Effect::SlideUnlocked);
        debug!(firearm = self.id.0, "slide unlocked");
        true
    }

    pub fn grab_slide(&mut self, hand: HandId) -> bool {
        self.slide.grab(hand)
    }

    pub fn sample_slide(&mut self, position: Vec3) -> bool {
        self.slide.update_from_hand_position(position)
    }

    /// Ends the grip and forwards a completed rack to `on_slide_charged`.
    /// Returns whether the grip charged the slide.
    pub fn release_slide(&mut self, hand: HandId, now: f64, magazines: &MagazineStore) -> bool {
        let charged = self.slide.release(hand, now);
        if charged {
            self.on_slide_charged(now, magazines);
        }
        charged
    }

    pub fn tick(&mut self, now: f64) {
        self.slide.tick(now);
    }

    /// Unlinks the docked magazine and hands it back for the physics push.
    pub fn request_eject(&mut self, magazines: &mut MagazineStore) -> Option<MagazineId> {
        let id = self.current_magazine?;
        let magazine = self.docked_magazine_mut(magazines)?;
        magazine.undock();
        self.current_magazine = None;
        self.effects.push(Effect::MagazineEjected {
            magazine: id,
            impulse: self.tuning.eject_impulse,
        });
        info!(firearm = self.id.0, magazine = id.0, "magazine ejected");
        Some(id)
    }

    /// Links a magazine into the dock. Never unlocks the slide.
    pub fn on_magazine_docked(&mut self, magazine: &mut Magazine) {
        assert!(
            self.current_magazine.is_none_or(|id| id == magazine.id()),
            "firearm {:?} already holds magazine {:?}",
            self.id,
            self.current_magazine
        );
        magazine.clamp_to_capacity();
        magazine.dock(self.id);
        self.current_magazine = Some(magazine.id());
        self.effects.push(Effect::MagazineInserted {
            magazine: magazine.id(),
        });
        debug!(
            firearm = self.id.0,
            magazine = magazine.id().0,
            rounds = magazine.rounds(),
            "magazine docked"
        );
    }

    /// Clears both sides of the link. The slide lock is left as is.
    pub fn on_magazine_undocked(&mut self, magazine: &mut Magazine) {
        if self.current_magazine == Some(magazine.id()) {
            self.current_magazine = None;
            self.effects.push(Effect::MagazineRemoved {
                magazine: magazine.id(),
            });
        }
        magazine.undock();
        debug!(
            firearm = self.id.0,
            magazine = magazine.id().0,
            "magazine undocked"
        );
    }

    fn docked_magazine_mut<'a>(
        &self,
        magazines: &'a mut MagazineStore,
    ) -> Option<&'a mut Magazine> {
        let id = self.current_magazine?;
        match magazines.get_mut(id) {
            Some(magazine) => Some(magazine),
            None => panic!("firearm {:?} links missing magazine {:?}", self.id, id),
        }
    }
}
