//! Shutdown signal handling.

use tokio_util::sync::CancellationToken;

use crate::TRACING_TARGET_SERVER_SHUTDOWN;

/// Spawns a task that cancels the token on SIGINT/SIGTERM.
///
/// The token coordinates shutdown of the HTTP server, the delivery
/// workers and the retry coordinator.
pub fn spawn_signal_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    error = %err,
                    "Failed to listen for ctrl-c"
                );
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(err) => {
                    tracing::error!(
                        target: TRACING_TARGET_SERVER_SHUTDOWN,
                        error = %err,
                        "Failed to listen for SIGTERM"
                    );
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }

        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "Shutdown signal received"
        );
        cancel.cancel();
    });
}
