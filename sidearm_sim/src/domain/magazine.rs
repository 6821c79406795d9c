// Magazine: round accounting plus a non-owning link to the firearm it sits in.

use super::firearm::FirearmId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MagazineId(pub u64);

#[derive(Debug, Clone)]
pub struct Magazine {
    id: MagazineId,
    capacity: u32,
    rounds: u32,
    // Back-reference only; maintained by the dock/undock pair.
    docked_in: Option<FirearmId>,
}

impl Magazine {
    /// Creates a magazine, clamping an externally provided round count into
    /// `[0, capacity]`. Panics when `capacity` is zero.
    pub fn new(id: MagazineId, capacity: u32, initial_rounds: i64) -> Self {
        assert!(capacity > 0, "magazine capacity must be positive");
        Self {
            id,
            capacity,
            rounds: clamp_rounds(initial_rounds, capacity),
            docked_in: None,
        }
    }

    pub fn id(&self) -> MagazineId {
        self.id
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn is_empty(&self) -> bool {
        self.rounds == 0
    }

    pub fn docked_in(&self) -> Option<FirearmId> {
        self.docked_in
    }

    /// Removes one round if any is left. Returns whether a round was available.
    pub fn consume(&mut self) -> bool {
        assert!(
            self.rounds <= self.capacity,
            "magazine {:?} holds {} rounds over capacity {}",
            self.id,
            self.rounds,
            self.capacity
        );
        if self.rounds == 0 {
            return false;
        }
        self.rounds -= 1;
        true
    }

    /// Overwrites the round count from outside the firing path (refill, loadouts).
    pub fn set_rounds(&mut self, rounds: i64) {
        self.rounds = clamp_rounds(rounds, self.capacity);
    }

    // Re-applies the bounds; used when a magazine enters a dock.
    pub(crate) fn clamp_to_capacity(&mut self) {
        self.rounds = self.rounds.min(self.capacity);
    }

    pub(crate) fn dock(&mut self, firearm: FirearmId) {
        self.docked_in = Some(firearm);
    }

    pub(crate) fn undock(&mut self) {
        self.docked_in = None;
    }
}

/// Every live magazine in the scene, keyed by id.
#[derive(Debug, Default)]
pub struct MagazineStore {
    magazines: BTreeMap<MagazineId, Magazine>,
    next_id: u64,
}

impl MagazineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a magazine and returns its freshly allocated id.
    pub fn insert_new(&mut self, capacity: u32, initial_rounds: i64) -> MagazineId {
        self.next_id += 1;
        let id = MagazineId(self.next_id);
        self.magazines
            .insert(id, Magazine::new(id, capacity, initial_rounds));
        id
    }

    pub fn get(&self, id: MagazineId) -> Option<&Magazine> {
        self.magazines.get(&id)
    }

    pub fn get_mut(&mut self, id: MagazineId) -> Option<&mut Magazine> {
        self.magazines.get_mut(&id)
    }

    // Callers must clear dock links first.
    pub(crate) fn remove(&mut self, id: MagazineId) -> Option<Magazine> {
        self.magazines.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.magazines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magazines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Magazine> {
        self.magazines.values()
    }
}

fn clamp_rounds(rounds: i64, capacity: u32) -> u32 {
    // Bounded by `capacity`, so the narrowing cast cannot truncate.
    rounds.clamp(0, i64::from(capacity)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_initial_rounds_exceed_capacity_then_they_are_clamped() {
        let mag = Magazine::new(MagazineId(1), 10, 25);
        assert_eq!(mag.rounds(), 10);
    }

    #[test]
    fn when_initial_rounds_are_negative_then_they_are_clamped_to_zero() {
        let mag = Magazine::new(MagazineId(1), 10, -3);
        assert_eq!(mag.rounds(), 0);
        assert!(mag.is_empty());
    }

    #[test]
    #[should_panic(expected = "capacity must be positive")]
    fn when_capacity_is_zero_then_creation_panics() {
        let _ = Magazine::new(MagazineId(1), 0, 0);
    }

    #[test]
    fn when_consuming_until_empty_then_rounds_never_drop_below_zero() {
        let mut mag = Magazine::new(MagazineId(1), 3, 2);

        assert!(mag.consume());
        assert!(mag.consume());
        assert!(!mag.consume());
        assert!(!mag.consume());

        assert_eq!(mag.rounds(), 0);
    }

    #[test]
    fn when_rounds_are_set_externally_then_they_stay_within_bounds() {
        let mut mag = Magazine::new(MagazineId(1), 15, 15);

        mag.set_rounds(99);
        assert_eq!(mag.rounds(), 15);

        mag.set_rounds(-1);
        assert_eq!(mag.rounds(), 0);

        mag.set_rounds(7);
        assert_eq!(mag.rounds(), 7);
    }

    #[test]
    fn when_docked_and_undocked_then_back_reference_follows() {
        let mut mag = Magazine::new(MagazineId(4), 15, 15);
        assert_eq!(mag.docked_in(), None);

        mag.dock(FirearmId(9));
        assert_eq!(mag.docked_in(), Some(FirearmId(9)));

        mag.undock();
        assert_eq!(mag.docked_in(), None);
    }

    #[test]
    fn when_magazines_are_inserted_then_ids_are_unique() {
        let mut store = MagazineStore::new();
        let a = store.insert_new(15, 15);
        let b = store.insert_new(8, 2);

        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(b).map(Magazine::rounds), Some(2));
    }

    #[test]
    fn when_magazine_is_removed_then_its_id_is_not_reused() {
        let mut store = MagazineStore::new();
        let a = store.insert_new(15, 15);
        store.remove(a);
        let b = store.insert_new(15, 15);

        assert!(store.get(a).is_none());
        assert_ne!(a, b);
    }
}
