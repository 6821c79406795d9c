// JSON-lines adapter: inbound messages from a reader, outbound updates to a writer.

use crate::interface_adapters::protocol::{ClientMessage, ServerMessage, SimUpdateDto};
use crate::use_cases::{FirearmSnapshot, MagazineSnapshot, RigInput, SimUpdate};
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, warn};

/// Parses one `ClientMessage` per line and forwards it to the simulation.
///
/// Blank lines are skipped and malformed lines are logged and dropped.
/// Returns when the reader hits EOF or the simulation stops listening.
pub async fn read_inputs<R>(reader: R, input_tx: mpsc::Sender<RigInput>) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no: u64 = 0;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let message = match serde_json::from_str::<ClientMessage>(trimmed) {
            Ok(message) => message,
            Err(e) => {
                warn!(line_no, error = %e, "dropping malformed input line");
                continue;
            }
        };

        if input_tx.send(RigInput::from(message)).await.is_err() {
            debug!(line_no, "input channel closed; reader exiting");
            break;
        }
    }
    Ok(())
}

/// Serializes simulation updates as one `ServerMessage` line each.
///
/// Ticks where nothing happened and no state moved are not written.
pub async fn write_updates<W>(
    mut update_rx: broadcast::Receiver<SimUpdate>,
    mut writer: W,
) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut last_state: Option<(FirearmSnapshot, Vec<MagazineSnapshot>)> = None;

    loop {
        match update_rx.recv().await {
            Ok(update) => {
                let unchanged = last_state.as_ref().is_some_and(|(firearm, magazines)| {
                    *firearm == update.firearm && *magazines == update.magazines
                });
                if update.is_quiet() && unchanged {
                    continue;
                }
                last_state = Some((update.firearm.clone(), update.magazines.clone()));

                let msg = ServerMessage::Update(SimUpdateDto::from(update));
                let mut line = match serde_json::to_string(&msg) {
                    Ok(line) => line,
                    Err(e) => {
                        error!(error = ?e, "failed to serialize sim update");
                        continue;
                    }
                };
                line.push('\n');
                writer.write_all(line.as_bytes()).await?;
                writer.flush().await?;
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(missed = n, "update writer lagged; skipping to latest update");
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("update channel closed; writer exiting");
                break;
            }
        }
    }
    Ok(())
}
