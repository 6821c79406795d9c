// Slide assembly: normalized travel along the rail, grip latching and scripted motion.

use super::hands::HandId;
use super::tuning::SlideTuning;
use glam::Vec3;
use tracing::debug;

// Anchors closer than this cannot define a travel axis.
const MIN_RAIL_LENGTH: f32 = 1e-4;

/// Closed and open anchor points of the slide in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideRail {
    pub closed: Vec3,
    pub open: Vec3,
}

impl Default for SlideRail {
    fn default() -> Self {
        // 15 mm of travel backwards along -Z.
        Self {
            closed: Vec3::ZERO,
            open: Vec3::new(0.0, 0.0, -0.015),
        }
    }
}

impl SlideRail {
    pub fn new(closed: Vec3, open: Vec3) -> Self {
        Self { closed, open }
    }

    /// Projects `sample` onto the closed->open axis, clamped to `[0, 1]`.
    /// Returns `None` for a degenerate rail.
    pub fn project(&self, sample: Vec3) -> Option<f32> {
        project_onto_rail(self.closed, self.open, sample)
    }

    /// World position of the slide at the given charge.
    pub fn point_at(&self, charge: f32) -> Vec3 {
        self.closed.lerp(self.open, charge.clamp(0.0, 1.0))
    }
}

/// Scalar displacement of `sample` along `closed -> open`, normalized by the
/// rail length and clamped to `[0, 1]`.
pub fn project_onto_rail(closed: Vec3, open: Vec3, sample: Vec3) -> Option<f32> {
    let axis = open - closed;
    let length = axis.length();
    if length < MIN_RAIL_LENGTH {
        return None;
    }
    let along = (sample - closed).dot(axis / length);
    Some((along / length).clamp(0.0, 1.0))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideState {
    Closed,
    Traveling,
    Open,
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    Rest,
    Held(HandId),
    Blowback { started_at: f64, from: f32 },
    Returning { started_at: f64, from: f32 },
}

#[derive(Debug, Clone)]
pub struct SlideAssembly {
    tuning: SlideTuning,
    rail: SlideRail,
    // 0 = closed, 1 = fully open.
    charge: f32,
    motion: Motion,
    charged_this_grip: bool,
    locked: bool,
}

impl SlideAssembly {
    pub fn new(tuning: SlideTuning, rail: SlideRail) -> Self {
        Self {
            tuning,
            rail,
            charge: 0.0,
            motion: Motion::Rest,
            charged_this_grip: false,
            locked: false,
        }
    }

    pub fn charge(&self) -> f32 {
        self.charge
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_held(&self) -> bool {
        self.holder().is_some()
    }

    pub fn holder(&self) -> Option<HandId> {
        match self.motion {
            Motion::Held(hand) => Some(hand),
            _ => None,
        }
    }

    pub fn charged_this_grip(&self) -> bool {
        self.charged_this_grip
    }

    pub fn is_animating(&self) -> bool {
        matches!(
            self.motion,
            Motion::Blowback { .. } | Motion::Returning { .. }
        )
    }

    pub fn rail(&self) -> SlideRail {
        self.rail
    }

    /// Moves the anchors, e.g. when the gun itself moves in the world.
    pub fn set_rail(&mut self, rail: SlideRail) {
        self.rail = rail;
    }

    pub fn state(&self) -> SlideState {
        if self.locked {
            return SlideState::Locked;
        }
        if self.charge >= 1.0 {
            SlideState::Open
        } else if self.charge <= 0.0 && !self.is_held() {
            SlideState::Closed
        } else {
            SlideState::Traveling
        }
    }

    /// Starts a grip. A slide already held by a hand ignores further grabs.
    ///
    /// A locked slide still records its holder so the release can be
    /// detected, but its charge stays pinned open.
    pub fn grab(&mut self, hand: HandId) -> bool {
        if self.is_held() {
            return false;
        }
        // A new grip supersedes any running blowback or return stroke.
        self.motion = Motion::Held(hand);
        self.charged_this_grip = false;
        true
    }

    /// Samples the holding hand. Returns true the first time the pull
    /// reaches the charge threshold during this grip.
    pub fn update_from_hand_position(&mut self, position: Vec3) -> bool {
        if !self.is_held() {
            return false;
        }
        let Some(pulled) = self.rail.project(position) else {
            return false;
        };

        // Locked slides do not travel; the pull is still observed.
        if !self.locked {
            self.charge = pulled;
        }

        if !self.charged_this_grip && pulled >= self.tuning.charge_threshold {
            self.charged_this_grip = true;
            debug!(pulled, "slide pulled past charge threshold");
            return true;
        }
        false
    }

    /// Ends the grip held by `hand`. Returns whether the slide was charged
    /// during the grip. Releases from any other hand are ignored.
    pub fn release(&mut self, hand: HandId, now: f64) -> bool {
        if self.holder() != Some(hand) {
            return false;
        }
        self.motion = Motion::Rest;
        if !self.locked {
            self.begin_return(now);
        }
        self.charged_this_grip
    }

    /// Plays the fire-driven excursion. Ignored while held or locked.
    pub fn play_blowback(&mut self, now: f64) -> bool {
        if self.is_held() || self.locked {
            return false;
        }
        self.motion = Motion::Blowback {
            started_at: now,
            from: self.charge,
        };
        true
    }

    /// Pins the slide fully open.
    pub fn force_lock(&mut self) {
        self.locked = true;
        self.charge = 1.0;
        if self.is_animating() {
            self.motion = Motion::Rest;
        }
    }

    /// Releases the lock. An unheld slide then runs forward to closed.
    /// Returns false if the slide was not locked.
    pub fn unlock(&mut self, now: f64) -> bool {
        if !self.locked {
            return false;
        }
        self.locked = false;
        if !self.is_held() {
            self.begin_return(now);
        }
        true
    }

    /// Advances scripted motion to `now`.
    pub fn tick(&mut self, now: f64) {
        match self.motion {
            Motion::Rest | Motion::Held(_) => {}
            Motion::Blowback { started_at, from } => {
                let elapsed = (now - started_at).max(0.0);
                let back = self.tuning.blowback_back_secs;
                let depth = self.tuning.blowback_depth.clamp(0.0, 1.0);
                if elapsed < back {
                    self.charge = lerp(from, depth, progress(elapsed, back));
                    return;
                }
                let forward_elapsed = elapsed - back;
                let forward = self.tuning.blowback_return_secs;
                if forward_elapsed < forward {
                    self.charge = lerp(depth, 0.0, progress(forward_elapsed, forward));
                } else {
                    self.settle_closed();
                }
            }
            Motion::Returning { started_at, from } => {
                let elapsed = (now - started_at).max(0.0);
                let duration = self.tuning.release_return_secs;
                if elapsed < duration {
                    self.charge = lerp(from, 0.0, progress(elapsed, duration));
                } else {
                    self.settle_closed();
                }
            }
        }
    }

    fn begin_return(&mut self, now: f64) {
        if self.tuning.release_return_secs <= 0.0 || self.charge <= 0.0 {
            self.settle_closed();
            return;
        }
        self.motion = Motion::Returning {
            started_at: now,
            from: self.charge,
        };
    }

    fn settle_closed(&mut self) {
        self.charge = 0.0;
        self.motion = Motion::Rest;
    }
}

fn progress(elapsed: f64, duration: f64) -> f32 {
    if duration <= 0.0 {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0) as f32
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}
