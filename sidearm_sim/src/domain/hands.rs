// Hand proxies and the grab zone that gates gripping the slide.

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandId {
    Left,
    Right,
}

impl HandId {
    fn index(self) -> usize {
        match self {
            HandId::Left => 0,
            HandId::Right => 1,
        }
    }
}

/// Last known world-space pose of a tracked hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandProxy {
    pub id: HandId,
    pub position: Vec3,
}

impl HandProxy {
    pub fn new(id: HandId) -> Self {
        Self {
            id,
            position: Vec3::ZERO,
        }
    }
}

/// Both tracked hands, indexed by `HandId`.
#[derive(Debug, Clone)]
pub struct Hands {
    proxies: [HandProxy; 2],
}

impl Default for Hands {
    fn default() -> Self {
        Self {
            proxies: [HandProxy::new(HandId::Left), HandProxy::new(HandId::Right)],
        }
    }
}

impl Hands {
    pub fn get(&self, hand: HandId) -> &HandProxy {
        &self.proxies[hand.index()]
    }

    pub fn move_to(&mut self, hand: HandId, position: Vec3) {
        self.proxies[hand.index()].position = position;
    }
}

/// Tracks which hands are inside the slide's grab volume.
///
/// Presence is per hand, so repeated enter events from the same hand do not
/// stack and a stray exit never drives the count negative.
#[derive(Debug, Clone, Default)]
pub struct GrabZone {
    inside: [bool; 2],
}

impl GrabZone {
    pub fn enter(&mut self, hand: HandId) {
        self.inside[hand.index()] = true;
    }

    pub fn exit(&mut self, hand: HandId) {
        self.inside[hand.index()] = false;
    }

    pub fn contains(&self, hand: HandId) -> bool {
        self.inside[hand.index()]
    }

    pub fn hands_inside(&self) -> usize {
        self.inside.iter().filter(|inside| **inside).count()
    }

    /// True while at least one hand is inside the zone.
    pub fn allows_grab(&self) -> bool {
        self.hands_inside() > 0
    }
}
