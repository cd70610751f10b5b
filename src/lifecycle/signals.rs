//! OS signal handling.

use crate::lifecycle::Shutdown;

/// Wait for Ctrl-C (SIGINT) and trigger shutdown.
pub async fn wait_for_signal(shutdown: &Shutdown) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Interrupt received, shutting down"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for interrupt, shutting down"),
    }
    shutdown.trigger();
}
