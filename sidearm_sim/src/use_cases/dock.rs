// Magazine lifecycle: spawning, docking, ejecting and despawning against one firearm.

use crate::domain::tuning::MagazineTuning;
use crate::domain::{FireResult, Firearm, Magazine, MagazineId, MagazineStore, RigError};
use tracing::{debug, info};

/// How the dock and the slide line up right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockStatus {
    /// No magazine docked.
    Vacant,
    /// Docked magazine has no rounds left.
    Spent,
    /// Rounds are available but the slide is still locked back.
    AwaitingCharge,
    /// Rounds are available and the slide is forward.
    Ready,
}

/// Owns every magazine and keeps the firearm/magazine link pair consistent.
#[derive(Debug)]
pub struct DockManager {
    magazines: MagazineStore,
    tuning: MagazineTuning,
    // Most recent spawn; counts against the limit while it is loose.
    last_spawned: Option<MagazineId>,
}

impl DockManager {
    pub fn new(tuning: MagazineTuning) -> Self {
        Self {
            magazines: MagazineStore::new(),
            tuning,
            last_spawned: None,
        }
    }

    pub fn magazines(&self) -> &MagazineStore {
        &self.magazines
    }

    pub fn magazine(&self, id: MagazineId) -> Option<&Magazine> {
        self.magazines.get(id)
    }

    /// Creates a magazine. Missing values fall back to a full magazine of the
    /// tuned capacity.
    pub fn spawn(
        &mut self,
        capacity: Option<u32>,
        initial_rounds: Option<i64>,
    ) -> Result<MagazineId, RigError> {
        let capacity = capacity.unwrap_or(self.tuning.capacity);
        if capacity == 0 {
            return Err(RigError::InvalidCapacity);
        }
        if self.tuning.one_at_a_time {
            if let Some(loose) = self.loose_spawn() {
                return Err(RigError::SpawnLimitReached { loose });
            }
        }

        let rounds = initial_rounds.unwrap_or(i64::from(capacity));
        let id = self.magazines.insert_new(capacity, rounds);
        self.last_spawned = Some(id);
        info!(magazine = id.0, capacity, rounds, "magazine spawned");
        Ok(id)
    }

    /// Removes a magazine from the scene, unlinking it from the firearm first.
    pub fn despawn(&mut self, firearm: &mut Firearm, id: MagazineId) -> Result<(), RigError> {
        let magazine = self
            .magazines
            .get_mut(id)
            .ok_or(RigError::UnknownMagazine(id))?;
        if magazine.docked_in() == Some(firearm.id()) {
            firearm.on_magazine_undocked(magazine);
        }
        self.magazines.remove(id);
        if self.last_spawned == Some(id) {
            self.last_spawned = None;
        }
        debug!(magazine = id.0, "magazine despawned");
        Ok(())
    }

    /// A magazine entered the firearm's dock.
    pub fn dock(&mut self, firearm: &mut Firearm, id: MagazineId) -> Result<(), RigError> {
        let magazine = self
            .magazines
            .get_mut(id)
            .ok_or(RigError::UnknownMagazine(id))?;
        if magazine.docked_in().is_some() {
            return Err(RigError::MagazineAlreadyDocked(id));
        }
        if let Some(docked) = firearm.current_magazine() {
            return Err(RigError::DockOccupied { docked });
        }
        firearm.on_magazine_docked(magazine);
        Ok(())
    }

    /// A magazine left the dock without an eject (pulled out by hand).
    pub fn undock(&mut self, firearm: &mut Firearm, id: MagazineId) -> Result<(), RigError> {
        let magazine = self
            .magazines
            .get_mut(id)
            .ok_or(RigError::UnknownMagazine(id))?;
        firearm.on_magazine_undocked(magazine);
        Ok(())
    }

    pub fn eject(&mut self, firearm: &mut Firearm) -> Option<MagazineId> {
        firearm.request_eject(&mut self.magazines)
    }

    pub fn fire(&mut self, firearm: &mut Firearm, now: f64) -> FireResult {
        firearm.request_fire(now, &mut self.magazines)
    }

    /// Tops a magazine back up to capacity.
    pub fn refill(&mut self, id: MagazineId) -> Result<(), RigError> {
        let magazine = self
            .magazines
            .get_mut(id)
            .ok_or(RigError::UnknownMagazine(id))?;
        magazine.set_rounds(i64::from(magazine.capacity()));
        Ok(())
    }

    pub fn status(&self, firearm: &Firearm) -> DockStatus {
        let Some(magazine) = firearm.current_magazine().and_then(|id| self.magazines.get(id))
        else {
            return DockStatus::Vacant;
        };
        if magazine.is_empty() {
            DockStatus::Spent
        } else if firearm.is_armed() {
            DockStatus::Ready
        } else {
            DockStatus::AwaitingCharge
        }
    }

    fn loose_spawn(&self) -> Option<MagazineId> {
        self.last_spawned.filter(|id| {
            self.magazines
                .get(*id)
                .is_some_and(|magazine| magazine.docked_in().is_none())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tuning::{FirearmTuning, SlideTuning};
    use crate::domain::{Effect, FirearmId, SlideRail};

    fn firearm() -> Firearm {
        Firearm::new(
            FirearmId(7),
            FirearmTuning::default(),
            SlideTuning::default(),
            SlideRail::default(),
        )
    }

    fn manager() -> DockManager {
        DockManager::new(MagazineTuning::default())
    }

    #[test]
    fn when_spawned_without_overrides_then_magazine_is_full_at_tuned_capacity() {
        let mut dock = manager();
        let id = dock.spawn(None, None).expect("spawn should succeed");

        let magazine = dock.magazine(id).expect("magazine exists");
        assert_eq!(magazine.capacity(), 15);
        assert_eq!(magazine.rounds(), 15);
    }

    #[test]
    fn when_spawned_with_out_of_range_rounds_then_they_are_clamped() {
        let mut dock = manager();
        let id = dock.spawn(Some(10), Some(40)).expect("spawn should succeed");
        assert_eq!(dock.magazine(id).map(Magazine::rounds), Some(10));
    }

    #[test]
    fn when_capacity_is_zero_then_spawn_is_rejected() {
        let mut dock = manager();
        assert_eq!(dock.spawn(Some(0), None), Err(RigError::InvalidCapacity));
        assert!(dock.magazines().is_empty());
    }

    #[test]
    fn when_previous_spawn_is_loose_then_next_spawn_is_refused() {
        let mut dock = manager();
        let first = dock.spawn(None, None).expect("spawn should succeed");

        assert_eq!(
            dock.spawn(None, None),
            Err(RigError::SpawnLimitReached { loose: first })
        );
    }

    #[test]
    fn when_previous_spawn_is_docked_then_next_spawn_is_allowed() {
        let mut dock = manager();
        let mut firearm = firearm();
        let first = dock.spawn(None, None).expect("spawn should succeed");
        dock.dock(&mut firearm, first).expect("dock should succeed");

        assert!(dock.spawn(None, None).is_ok());
    }

    #[test]
    fn when_spawn_limit_is_off_then_many_loose_magazines_are_allowed() {
        let mut dock = DockManager::new(MagazineTuning {
            one_at_a_time: false,
            ..MagazineTuning::default()
        });
        dock.spawn(None, None).expect("spawn should succeed");
        dock.spawn(None, None).expect("spawn should succeed");
        assert_eq!(dock.magazines().len(), 2);
    }

    #[test]
    fn when_docked_magazine_is_despawned_then_links_are_cleared_first() {
        let mut dock = manager();
        let mut firearm = firearm();
        let id = dock.spawn(None, None).expect("spawn should succeed");
        dock.dock(&mut firearm, id).expect("dock should succeed");
        firearm.drain_effects();

        dock.despawn(&mut firearm, id).expect("despawn should succeed");

        assert_eq!(firearm.current_magazine(), None);
        assert!(dock.magazine(id).is_none());
        assert_eq!(
            firearm.drain_effects(),
            vec![Effect::MagazineRemoved { magazine: id }]
        );
        assert!(dock.spawn(None, None).is_ok());
    }

    #[test]
    fn when_magazine_is_unknown_then_dock_operations_fail() {
        let mut dock = manager();
        let mut firearm = firearm();
        let ghost = MagazineId(99);

        assert_eq!(dock.dock(&mut firearm, ghost), Err(RigError::UnknownMagazine(ghost)));
        assert_eq!(dock.undock(&mut firearm, ghost), Err(RigError::UnknownMagazine(ghost)));
        assert_eq!(dock.despawn(&mut firearm, ghost), Err(RigError::UnknownMagazine(ghost)));
        assert_eq!(dock.refill(ghost), Err(RigError::UnknownMagazine(ghost)));
    }

    #[test]
    fn when_dock_is_occupied_then_second_magazine_is_refused() {
        let mut dock = DockManager::new(MagazineTuning {
            one_at_a_time: false,
            ..MagazineTuning::default()
        });
        let mut firearm = firearm();
        let first = dock.spawn(None, None).expect("spawn should succeed");
        let second = dock.spawn(None, None).expect("spawn should succeed");
        dock.dock(&mut firearm, first).expect("dock should succeed");

        assert_eq!(
            dock.dock(&mut firearm, second),
            Err(RigError::DockOccupied { docked: first })
        );
        assert_eq!(
            dock.dock(&mut firearm, first),
            Err(RigError::MagazineAlreadyDocked(first))
        );
        assert_eq!(dock.magazine(second).and_then(Magazine::docked_in), None);
    }

    #[test]
    fn when_last_round_is_fired_then_status_walks_through_partial_states() {
        let mut dock = manager();
        let mut firearm = firearm();
        assert_eq!(dock.status(&firearm), DockStatus::Vacant);

        let id = dock.spawn(Some(5), Some(1)).expect("spawn should succeed");
        dock.dock(&mut firearm, id).expect("dock should succeed");
        assert_eq!(dock.status(&firearm), DockStatus::Ready);

        assert_eq!(dock.fire(&mut firearm, 0.0), FireResult::Fired);
        assert_eq!(dock.status(&firearm), DockStatus::Spent);

        dock.refill(id).expect("refill should succeed");
        assert_eq!(dock.status(&firearm), DockStatus::AwaitingCharge);

        assert!(firearm.on_slide_charged(1.0, dock.magazines()));
        assert_eq!(dock.status(&firearm), DockStatus::Ready);
    }

    #[test]
    fn when_ejected_then_magazine_stays_in_store_unlinked() {
        let mut dock = manager();
        let mut firearm = firearm();
        let id = dock.spawn(None, None).expect("spawn should succeed");
        dock.dock(&mut firearm, id).expect("dock should succeed");

        assert_eq!(dock.eject(&mut firearm), Some(id));
        assert_eq!(dock.magazine(id).and_then(Magazine::docked_in), None);
        assert_eq!(dock.eject(&mut firearm), None);
    }
}
