// Port for reading simulation time in seconds.
pub trait Clock: Send + Sync {
    fn now_seconds(&self) -> f64;
}
