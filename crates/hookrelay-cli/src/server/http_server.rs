//! HTTP server bootstrap with graceful shutdown.

use anyhow::Context;
use axum::Router;
use tokio_util::sync::CancellationToken;

use crate::TRACING_TARGET_SERVER_STARTUP;
use crate::config::ServerConfig;

/// Serves the router until the cancellation token fires.
///
/// In-flight requests are allowed to complete after shutdown is requested.
pub async fn serve(router: Router, config: &ServerConfig, cancel: CancellationToken) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        %addr,
        "HTTP server listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .context("HTTP server terminated with an error")?;

    Ok(())
}
