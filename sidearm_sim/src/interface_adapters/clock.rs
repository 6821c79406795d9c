use std::time::Instant;

use crate::domain::Clock;

// Monotonic clock adapter; seconds elapsed since the adapter was created.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    started: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}
