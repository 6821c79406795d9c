// Shared helpers for driving the full stdio runtime from integration tests.
use std::time::Duration;

use serde_json::Value;
use sidearm_sim::domain::{Clock, Tuning};
use sidearm_sim::use_cases::{Rig, SimSettings};
use tokio::io::{AsyncReadExt, BufReader};

// Time source pinned at zero so rate gating is deterministic regardless of tick timing.
pub struct FrozenClock;

impl Clock for FrozenClock {
    fn now_seconds(&self) -> f64 {
        0.0
    }
}

// Feed `script` (one JSON message per line) through the runtime and collect every output line.
pub async fn run_script(script: &str) -> Vec<Value> {
    // The runtime owns its reader, so hand it an owned in-memory cursor.
    let reader = BufReader::new(std::io::Cursor::new(script.as_bytes().to_vec()));
    // Duplex pipe: the runtime writes one end while the test drains the other.
    let (writer, mut output) = tokio::io::duplex(64 * 1024);

    let settings = SimSettings {
        input_channel_capacity: 64,
        update_broadcast_capacity: 256,
        tick_interval: Duration::from_millis(2),
    };
    let rig = Rig::new(FrozenClock, Tuning::default());
    let runtime = tokio::spawn(sidearm_sim::run(reader, writer, rig, settings));

    // Read until the writer side is dropped at runtime shutdown.
    let mut text = String::new();
    output
        .read_to_string(&mut text)
        .await
        .expect("output stream should be readable");
    runtime
        .await
        .expect("runtime task should not panic")
        .expect("runtime should finish cleanly");

    text.lines()
        .map(|line| serde_json::from_str(line).expect("every output line is json"))
        .collect()
}

// Flatten a field list (`outcomes` or `effects`) across all update lines, in order.
pub fn collect(lines: &[Value], field: &str) -> Vec<Value> {
    lines
        .iter()
        .filter_map(|line| line["data"][field].as_array())
        .flat_map(|items| items.iter().cloned())
        .collect()
}
