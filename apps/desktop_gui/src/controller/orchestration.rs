//! Hands station button presses to the backend worker without blocking a frame.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued counter command"),
        Err(TrySendError::Full(_)) => {
            *status = "Counter command queue is full; press again in a moment".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Counter worker stopped; restart the station".to_string();
        }
    }
}
