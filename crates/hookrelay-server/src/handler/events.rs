//! Platform event ingestion handlers.
//!
//! A standalone deployment has no in-process domain events to observe, so
//! producers publish events through this endpoint; the dispatcher fans them
//! out to subscribed webhooks asynchronously.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;

use crate::extract::{Json, TenantContext, ValidateJson};
use crate::handler::request::PublishEvent;
use crate::handler::response::{ApiResponse, ErrorResponse, EventDispatched};
use crate::handler::{ErrorKind, Result};
use crate::service::{EventDispatcher, ServiceState};

/// Tracing target for event ingestion.
const TRACING_TARGET: &str = "hookrelay_server::handler::events";

/// Publishes a platform event for webhook dispatch.
///
/// Dispatch only creates delivery rows and queue jobs; the actual HTTP
/// deliveries happen asynchronously in the worker pool.
#[tracing::instrument(
    skip_all,
    fields(
        tenant_id = %context.tenant_id,
        account_id = %context.account_id,
    )
)]
async fn publish_event(
    State(dispatcher): State<EventDispatcher>,
    context: TenantContext,
    ValidateJson(request): ValidateJson<PublishEvent>,
) -> Result<(StatusCode, Json<ApiResponse<EventDispatched>>)> {
    tracing::debug!(target: TRACING_TARGET, event = %request.event, "Publishing event");

    let matched_webhooks = dispatcher
        .dispatch(
            context.tenant_id,
            request.event,
            request.resource_id,
            Some(context.account_id),
            request.metadata,
        )
        .await
        .map_err(|e| {
            tracing::error!(target: TRACING_TARGET, error = %e, "Event dispatch failed");
            ErrorKind::InternalServerError
                .with_message("Failed to dispatch the event")
                .into_static()
        })?;

    tracing::info!(
        target: TRACING_TARGET,
        event = %request.event,
        matched_webhooks,
        "Event dispatched",
    );

    let response = EventDispatched {
        event: request.event,
        matched_webhooks,
    };

    Ok((StatusCode::ACCEPTED, Json(ApiResponse::ok(response))))
}

fn publish_event_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Publish event")
        .description("Fans a platform event out to all subscribed webhooks of the tenant.")
        .response::<202, Json<ApiResponse<EventDispatched>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<422, Json<ErrorResponse>>()
}

/// Returns routes for event ingestion.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/events/", post_with(publish_event, publish_event_docs))
        .with_path_items(|item| item.tag("Events"))
}
