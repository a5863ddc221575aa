//! Interrupt handling.

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Spawns a task that cancels the returned token on Ctrl+C.
///
/// Cancelling only asks the connection loop to start a graceful close;
/// the process exits once that close completes.
#[must_use]
pub fn install_interrupt_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("received SIGINT (Ctrl+C), closing connection");
                token_clone.cancel();
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for Ctrl+C");
            }
        }
    });

    token
}
