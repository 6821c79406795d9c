use std::sync::{Arc, Mutex};

use crate::domain::Clock;

// Manually advanced time source shared between a test and the rig it drives.
#[derive(Clone, Default)]
pub(crate) struct ManualClock(Arc<Mutex<f64>>);

impl ManualClock {
    pub(crate) fn advance(&self, seconds: f64) {
        let mut now = self.0.lock().expect("clock mutex poisoned");
        *now += seconds;
    }
}

impl Clock for ManualClock {
    fn now_seconds(&self) -> f64 {
        *self.0.lock().expect("clock mutex poisoned")
    }
}
