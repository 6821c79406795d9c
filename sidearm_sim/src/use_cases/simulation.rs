// Fixed-step loop that drains inputs into a rig and publishes one update per tick.

use super::rig::Rig;
use super::types::{RigInput, RigOutcome, SimUpdate};
use crate::domain::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, broadcast, mpsc};
use tracing::{debug, info, warn};

/// Shared configuration for spawning the simulation task.
#[derive(Debug, Clone)]
pub struct SimSettings {
    /// Capacity for inbound input events.
    pub input_channel_capacity: usize,
    /// Capacity for broadcast simulation updates.
    pub update_broadcast_capacity: usize,
    /// Fixed tick interval for the simulation loop.
    pub tick_interval: Duration,
}

pub async fn sim_task<C>(
    mut rig: Rig<C>,
    mut input_rx: mpsc::Receiver<RigInput>,
    update_tx: broadcast::Sender<SimUpdate>,
    tick_interval: Duration,
    shutdown: Arc<Notify>,
) where
    C: Clock,
{
    let mut tick: u64 = 0;
    let mut interval = tokio::time::interval(tick_interval);
    let mut inputs_closed = false;

    info!(tick_ms = tick_interval.as_millis(), "simulation started");

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                break;
            }
            _ = interval.tick() => {}
        }

        let mut outcomes = Vec::new();
        let mut rejected = Vec::new();
        loop {
            match input_rx.try_recv() {
                Ok(input) => match rig.apply(input) {
                    Ok(RigOutcome::Applied) => {}
                    Ok(outcome) => {
                        debug!(?input, ?outcome, "input applied");
                        outcomes.push(outcome);
                    }
                    Err(error) => {
                        warn!(?input, ?error, "input rejected");
                        rejected.push(error);
                    }
                },
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    inputs_closed = true;
                    break;
                }
            }
        }

        let effects = rig.tick();
        tick += 1;

        let _ = update_tx.send(SimUpdate {
            tick,
            firearm: rig.snapshot(),
            magazines: rig.magazine_snapshots(),
            outcomes,
            effects,
            rejected,
        });

        if inputs_closed {
            info!(tick, "input channel closed; simulation exiting");
            break;
        }
    }
}
