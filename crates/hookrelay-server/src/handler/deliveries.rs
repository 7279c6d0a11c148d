//! Delivery history, manual retry and statistics handlers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use hookrelay_postgres::model::NewDelivery;
use hookrelay_postgres::query::DeliveryRepository;
use hookrelay_webhook::DeliveryJob;
use jiff::Timestamp;

use crate::extract::{Json, Path, PgPool, Query, TenantContext};
use crate::handler::request::{
    DeliveryListParams, DeliveryPathParams, StatisticsParams, WebhookPathParams,
};
use crate::handler::response::{
    ApiResponse, Deliveries, Delivery, ErrorResponse, WebhookStatistics,
};
use crate::handler::webhooks::find_tenant_webhook;
use crate::handler::{ErrorKind, Result};
use crate::service::{EventDispatcher, ServiceState};

/// Tracing target for delivery history operations.
const TRACING_TARGET: &str = "hookrelay_server::handler::deliveries";

/// Lists the delivery history of a webhook.
///
/// Returns deliveries newest first, filterable by status. History is
/// retained even after the webhook is deleted.
#[tracing::instrument(
    skip_all,
    fields(
        tenant_id = %context.tenant_id,
        webhook_id = %path_params.webhook_id,
    )
)]
async fn list_deliveries(
    PgPool(mut conn): PgPool,
    context: TenantContext,
    Path(path_params): Path<WebhookPathParams>,
    Query(params): Query<DeliveryListParams>,
) -> Result<(StatusCode, Json<ApiResponse<Deliveries>>)> {
    tracing::debug!(target: TRACING_TARGET, "Listing deliveries");

    let webhook = find_tenant_webhook(&mut conn, &context, path_params.webhook_id).await?;

    let deliveries = conn
        .list_deliveries(webhook.id, params.status, params.pagination())
        .await?;
    let deliveries: Deliveries = Delivery::from_models(deliveries);

    tracing::debug!(
        target: TRACING_TARGET,
        delivery_count = deliveries.len(),
        "Deliveries listed",
    );

    Ok((StatusCode::OK, Json(ApiResponse::ok(deliveries))))
}

fn list_deliveries_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List deliveries")
        .description("Returns the delivery history of the webhook, newest first.")
        .response::<200, Json<ApiResponse<Deliveries>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Manually retries a finished delivery.
///
/// Creates a new delivery with a fresh attempt counter carrying the same
/// event and payload, independent of the original's exhausted budget.
/// Only `failed` and `dead` deliveries can be retried.
#[tracing::instrument(
    skip_all,
    fields(
        tenant_id = %context.tenant_id,
        webhook_id = %path_params.webhook_id,
        delivery_id = %path_params.delivery_id,
    )
)]
async fn retry_delivery(
    PgPool(mut conn): PgPool,
    State(dispatcher): State<EventDispatcher>,
    context: TenantContext,
    Path(path_params): Path<DeliveryPathParams>,
) -> Result<(StatusCode, Json<ApiResponse<Delivery>>)> {
    tracing::debug!(target: TRACING_TARGET, "Retrying delivery");

    let webhook = find_tenant_webhook(&mut conn, &context, path_params.webhook_id).await?;

    let Some(original) = conn
        .find_webhook_delivery(webhook.id, path_params.delivery_id)
        .await?
    else {
        return Err(ErrorKind::NotFound
            .with_message("Delivery not found")
            .with_resource("delivery"));
    };

    if !original.status.is_manually_retryable() {
        return Err(ErrorKind::Conflict
            .with_message("Only failed or dead deliveries can be retried")
            .with_resource("delivery"));
    }

    let retry = conn
        .create_delivery(NewDelivery {
            webhook_id: webhook.id,
            event_type: original.event_type,
            payload: original.payload,
        })
        .await?;

    let job = DeliveryJob::new(retry.id, webhook.id, context.tenant_id);
    dispatcher.enqueue(&job).await.map_err(|e| {
        tracing::error!(target: TRACING_TARGET, error = %e, "Failed to enqueue retry");
        ErrorKind::InternalServerError
            .with_message("Failed to enqueue the retry")
            .into_static()
    })?;

    tracing::info!(
        target: TRACING_TARGET,
        retry_delivery_id = %retry.id,
        "Manual retry enqueued",
    );

    Ok((StatusCode::ACCEPTED, Json(ApiResponse::ok(retry.into()))))
}

fn retry_delivery_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Retry delivery")
        .description(
            "Creates a new delivery with a fresh attempt counter for a failed or dead delivery.",
        )
        .response::<202, Json<ApiResponse<Delivery>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Returns delivery statistics for a webhook over a trailing window.
#[tracing::instrument(
    skip_all,
    fields(
        tenant_id = %context.tenant_id,
        webhook_id = %path_params.webhook_id,
    )
)]
async fn webhook_statistics(
    PgPool(mut conn): PgPool,
    context: TenantContext,
    Path(path_params): Path<WebhookPathParams>,
    Query(params): Query<StatisticsParams>,
) -> Result<(StatusCode, Json<ApiResponse<WebhookStatistics>>)> {
    tracing::debug!(target: TRACING_TARGET, "Computing webhook statistics");

    let webhook = find_tenant_webhook(&mut conn, &context, path_params.webhook_id).await?;

    let now = Timestamp::now();
    let since = params.since(now)?;
    let statistics = conn.delivery_statistics(webhook.id, since).await?;

    let response = WebhookStatistics::from_statistics(statistics, since, now);

    Ok((StatusCode::OK, Json(ApiResponse::ok(response))))
}

fn webhook_statistics_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Webhook statistics")
        .description("Returns success rate and latency statistics over a trailing window.")
        .response::<200, Json<ApiResponse<WebhookStatistics>>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns routes for delivery history and statistics.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/webhooks/{webhook_id}/deliveries/",
            get_with(list_deliveries, list_deliveries_docs),
        )
        .api_route(
            "/webhooks/{webhook_id}/deliveries/{delivery_id}/retry/",
            post_with(retry_delivery, retry_delivery_docs),
        )
        .api_route(
            "/webhooks/{webhook_id}/statistics/",
            get_with(webhook_statistics, webhook_statistics_docs),
        )
        .with_path_items(|item| item.tag("Deliveries"))
}
