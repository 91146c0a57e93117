//! Ctrl-C handling.

use migration_pipeline::CancellationToken;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Cancel `token` when the process receives Ctrl-C.
///
/// The listener exits quietly if the token is cancelled first.
pub fn shutdown_on_ctrl_c(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {}
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => {
                    info!("Received shutdown signal");
                    token.cancel();
                }
                Err(e) => warn!(error = %e, "Could not listen for shutdown signal"),
            },
        }
    })
}
