// Framework bootstrap for the simulation runtime.

use crate::domain::Clock;
use crate::frameworks::config;
use crate::interface_adapters::clock::MonotonicClock;
use crate::interface_adapters::stdio::{read_inputs, write_updates};
use crate::use_cases::{Rig, RigInput, SimSettings, SimUpdate, sim_task};

use std::io::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};
use tokio::sync::{Notify, broadcast, mpsc};

fn init_runtime() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Logs go to stderr; stdout carries the update stream.
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Runs one rig against the given streams until the input side closes or the
/// output side fails.
pub async fn run<R, W, C>(reader: R, writer: W, rig: Rig<C>, settings: SimSettings) -> Result<()>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
    C: Clock + 'static,
{
    // input_tx/rx: every parsed input goes to the single sim task.
    let (input_tx, input_rx) = mpsc::channel::<RigInput>(settings.input_channel_capacity);
    // update_tx/rx: one update per tick, fanned out to the writer.
    let (update_tx, update_rx) =
        broadcast::channel::<SimUpdate>(settings.update_broadcast_capacity);
    let shutdown = Arc::new(Notify::new());

    let sim = tokio::spawn(sim_task(
        rig,
        input_rx,
        update_tx,
        settings.tick_interval,
        shutdown.clone(),
    ));
    let mut writer_task = tokio::spawn(write_updates(update_rx, writer));

    // Reader exit drops `input_tx`, which lets the sim task finish its last tick.
    let reading = read_inputs(reader, input_tx);
    tokio::pin!(reading);

    tokio::select! {
        read_result = &mut reading => {
            if let Err(e) = &read_result {
                tracing::error!(error = %e, "input stream failed");
                shutdown.notify_one();
            }
            sim.await.map_err(std::io::Error::other)?;
            writer_task
                .await
                .map_err(std::io::Error::other)?
                .inspect_err(|e| {
                    tracing::error!(error = %e, "output stream failed");
                })?;
            read_result
        }
        write_result = &mut writer_task => {
            // Nobody is listening any more; stop the sim instead of waiting on input.
            shutdown.notify_one();
            sim.await.map_err(std::io::Error::other)?;
            write_result
                .map_err(std::io::Error::other)?
                .inspect_err(|e| {
                    tracing::error!(error = %e, "output stream failed");
                })
        }
    }
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let tuning = config::load_tuning().inspect_err(|e| {
        tracing::error!(error = %e, "failed to load tuning");
    })?;
    let settings = SimSettings {
        input_channel_capacity: config::input_channel_capacity(),
        update_broadcast_capacity: config::update_broadcast_capacity(),
        tick_interval: config::tick_interval(),
    };
    tracing::debug!(
        ?tuning,
        tick_ms = settings.tick_interval.as_millis(),
        tuning_path = ?config::tuning_path(),
        "simulation configured"
    );

    let rig = Rig::new(MonotonicClock::new(), tuning);
    run(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        rig,
        settings,
    )
    .await
}
