#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use aide::openapi::OpenApi;
use axum::{Extension, Router};
use clap::Parser;
use hookrelay_server::handler;
use hookrelay_server::middleware::{
    RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
};
use hookrelay_server::service::{EventDispatcher, ServiceState};
use hookrelay_server::worker::{DeliveryWorker, RetryCoordinator};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{Cli, MiddlewareConfig};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "hookrelay_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "hookrelay_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "hookrelay_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    #[cfg(feature = "dotenv")]
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_tracing();
    log_startup_info();
    log_service_config(&cli);

    let service_config = cli.service.to_config()?;

    // Connect shared clients once; the HTTP state and the background
    // workers reuse the same pools and connections.
    let pg_client = service_config.connect_postgres().await?;
    let nats_client = service_config.connect_nats().await?;
    let webhook_service = service_config.create_webhook_service();
    let publisher = nats_client.delivery_publisher().await?;
    let dispatcher = EventDispatcher::new(pg_client.clone(), publisher);

    let state = ServiceState::from_parts(
        pg_client.clone(),
        nats_client.clone(),
        webhook_service.clone(),
        dispatcher.clone(),
    );

    let cancel = CancellationToken::new();
    server::spawn_signal_listener(cancel.clone());

    // Delivery worker pool, bounded by configuration.
    let retry_policy = service_config.retry_policy();
    let mut workers = Vec::with_capacity(service_config.delivery_workers + 1);
    for worker_index in 0..service_config.delivery_workers {
        let worker = DeliveryWorker::new(
            pg_client.clone(),
            nats_client.clone(),
            webhook_service.clone(),
            retry_policy.clone(),
        );
        let worker_cancel = cancel.clone();
        workers.push(tokio::spawn(async move {
            if let Err(err) = worker.run(worker_cancel).await {
                tracing::error!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    worker_index,
                    error = %err,
                    "delivery worker exited with error"
                );
            }
        }));
    }

    // Retry coordinator.
    let coordinator = RetryCoordinator::new(
        pg_client.clone(),
        dispatcher.clone(),
        service_config.retry_poll_interval(),
    );
    let coordinator_cancel = cancel.clone();
    workers.push(tokio::spawn(async move {
        if let Err(err) = coordinator.run(coordinator_cancel).await {
            tracing::error!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                error = %err,
                "retry coordinator exited with error"
            );
        }
    }));

    let router = create_router(state, &cli.middleware);
    let result = server::serve(router, &cli.server, cancel.clone()).await;

    // Stop the pipeline and wait for workers to drain.
    cancel.cancel();
    for worker in workers {
        let _ = worker.await;
    }

    result
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - catches panics and enforces timeouts
/// 2. Observability - request IDs and tracing spans
/// 3. Security - CORS
/// 4. Routes (innermost) - actual request handlers
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    let mut api = OpenApi::default();

    let api_router: Router = handler::routes()
        .finish_api_with(&mut api, |api| {
            api.title("hookrelay API")
                .version(env!("CARGO_PKG_VERSION"))
        })
        .with_state(state);

    let api_router = api_router
        .route("/openapi.json", axum::routing::get(serve_openapi))
        .layer(Extension(std::sync::Arc::new(api)));

    api_router
        .with_security(middleware.cors())
        .with_observability()
        .with_recovery(middleware.recovery())
}

/// Serves the generated OpenAPI document.
async fn serve_openapi(
    Extension(api): Extension<std::sync::Arc<OpenApi>>,
) -> axum::Json<OpenApi> {
    axum::Json((*api).clone())
}

/// Initializes tracing with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Logs startup information.
fn log_startup_info() {
    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting hookrelay server"
    );

    tracing::debug!(
        target: TRACING_TARGET_SERVER_STARTUP,
        pid = process::id(),
        arch = std::env::consts::ARCH,
        os = std::env::consts::OS,
        features = ?enabled_features(),
        "build information"
    );
}

/// Logs the effective service configuration.
fn log_service_config(cli: &Cli) {
    tracing::info!(
        target: TRACING_TARGET_CONFIG,
        host = %cli.server.host,
        port = cli.server.port,
        delivery_workers = cli.service.delivery_workers,
        retry_max_attempts = cli.service.retry_max_attempts,
        retry_poll_interval_secs = cli.service.retry_poll_interval_secs,
        request_timeout_secs = cli.middleware.request_timeout_secs,
        "service configuration"
    );
}

/// Returns a list of enabled compile-time features.
fn enabled_features() -> Vec<&'static str> {
    [cfg!(feature = "dotenv").then_some("dotenv")]
        .into_iter()
        .flatten()
        .collect()
}
