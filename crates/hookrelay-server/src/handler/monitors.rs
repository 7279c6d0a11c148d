//! Health monitoring handlers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use hookrelay_nats::NatsClient;
use hookrelay_postgres::PgClient;

use crate::extract::Json;
use crate::handler::response::{ApiResponse, ComponentHealth, HealthStatus};
use crate::service::ServiceState;

/// Tracing target for health checks.
const TRACING_TARGET: &str = "hookrelay_server::handler::monitors";

/// Reports the health of the service's dependencies.
#[tracing::instrument(skip_all)]
async fn health(
    State(pg_client): State<PgClient>,
    State(nats_client): State<NatsClient>,
) -> (StatusCode, Json<ApiResponse<HealthStatus>>) {
    let postgres = ComponentHealth::from_result(&pg_client.ping().await);
    let nats = ComponentHealth::from_result(&nats_client.ping().await);

    let healthy = postgres.is_healthy() && nats.is_healthy();
    let status = HealthStatus {
        healthy,
        postgres,
        nats,
    };

    if !healthy {
        tracing::warn!(
            target: TRACING_TARGET,
            postgres = ?status.postgres,
            nats = ?status.nats,
            "Dependency health check failed"
        );
    }

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(ApiResponse::ok(status)))
}

fn health_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Health check")
        .description("Reports connectivity to PostgreSQL and NATS.")
        .response::<200, Json<ApiResponse<HealthStatus>>>()
        .response::<503, Json<ApiResponse<HealthStatus>>>()
}

/// Returns routes for health monitoring.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/health/", get_with(health, health_docs))
        .with_path_items(|item| item.tag("Monitors"))
}
