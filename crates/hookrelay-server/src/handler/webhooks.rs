//! Webhook registry management handlers.
//!
//! This module provides webhook management functionality, allowing tenants
//! to create, configure, test and manage webhooks for receiving event
//! notifications. All operations are scoped to the requesting tenant.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;
use axum::extract::State;
use hookrelay_postgres::PgConn;
use hookrelay_postgres::model;
use hookrelay_postgres::query::{WebhookListFilter, WebhookRepository};
use hookrelay_webhook::{WebhookRequest, WebhookService};
use url::Url;

use crate::extract::{Json, Path, PgPool, Query, TenantContext, ValidateJson};
use crate::handler::request::{
    CreateWebhook, TestWebhook, UpdateWebhook as UpdateWebhookRequest, ValidateUrl,
    WebhookListParams, WebhookPathParams, validate_webhook_url,
};
use crate::handler::response::{
    ApiResponse, DeliveryResult, ErrorResponse, EventCatalogEntry, UrlValidation, Webhook,
    WebhookWithSecret, Webhooks,
};
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for webhook registry operations.
const TRACING_TARGET: &str = "hookrelay_server::handler::webhooks";

/// Creates a new webhook.
///
/// Returns the webhook with secret. The secret is only shown once at creation.
#[tracing::instrument(
    skip_all,
    fields(
        tenant_id = %context.tenant_id,
        account_id = %context.account_id,
    )
)]
async fn create_webhook(
    PgPool(mut conn): PgPool,
    context: TenantContext,
    ValidateJson(request): ValidateJson<CreateWebhook>,
) -> Result<(StatusCode, Json<ApiResponse<WebhookWithSecret>>)> {
    tracing::debug!(target: TRACING_TARGET, "Creating webhook");

    let new_webhook = request.into_model(context.tenant_id, context.account_id);
    let webhook = conn.create_webhook(new_webhook).await?;

    tracing::info!(
        target: TRACING_TARGET,
        webhook_id = %webhook.id,
        "Webhook created",
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(webhook.into())),
    ))
}

fn create_webhook_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create webhook")
        .description("Creates a new webhook. The secret is only shown once at creation.")
        .response::<201, Json<ApiResponse<WebhookWithSecret>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<422, Json<ErrorResponse>>()
}

/// Lists all webhooks of the tenant.
///
/// Returns configured webhooks without secrets, filterable by status and event.
#[tracing::instrument(skip_all, fields(tenant_id = %context.tenant_id))]
async fn list_webhooks(
    PgPool(mut conn): PgPool,
    context: TenantContext,
    Query(params): Query<WebhookListParams>,
) -> Result<(StatusCode, Json<ApiResponse<Webhooks>>)> {
    tracing::debug!(target: TRACING_TARGET, "Listing webhooks");

    let filter = WebhookListFilter {
        status: params.status,
        event: params.event,
    };

    let webhooks = conn
        .list_webhooks(context.tenant_id, filter, params.pagination())
        .await?;
    let webhooks: Webhooks = Webhook::from_models(webhooks);

    tracing::debug!(
        target: TRACING_TARGET,
        webhook_count = webhooks.len(),
        "Webhooks listed",
    );

    Ok((StatusCode::OK, Json(ApiResponse::ok(webhooks))))
}

fn list_webhooks_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List webhooks")
        .description("Returns all configured webhooks of the tenant without secrets.")
        .response::<200, Json<ApiResponse<Webhooks>>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Retrieves a specific webhook.
///
/// Returns webhook details without secret.
#[tracing::instrument(
    skip_all,
    fields(
        tenant_id = %context.tenant_id,
        webhook_id = %path_params.webhook_id,
    )
)]
async fn read_webhook(
    PgPool(mut conn): PgPool,
    context: TenantContext,
    Path(path_params): Path<WebhookPathParams>,
) -> Result<(StatusCode, Json<ApiResponse<Webhook>>)> {
    tracing::debug!(target: TRACING_TARGET, "Reading webhook");

    let webhook = find_tenant_webhook(&mut conn, &context, path_params.webhook_id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(webhook.into()))))
}

fn read_webhook_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get webhook")
        .description("Returns webhook details without the secret.")
        .response::<200, Json<ApiResponse<Webhook>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Updates a webhook.
///
/// Updates webhook configuration; setting `status` to `paused`/`active`
/// pauses or resumes dispatch and is idempotent.
#[tracing::instrument(
    skip_all,
    fields(
        tenant_id = %context.tenant_id,
        webhook_id = %path_params.webhook_id,
    )
)]
async fn update_webhook(
    PgPool(mut conn): PgPool,
    context: TenantContext,
    Path(path_params): Path<WebhookPathParams>,
    ValidateJson(request): ValidateJson<UpdateWebhookRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Webhook>>)> {
    tracing::debug!(target: TRACING_TARGET, "Updating webhook");

    let current = find_tenant_webhook(&mut conn, &context, path_params.webhook_id).await?;

    let update_data = request.into_model(current.status);
    let webhook = conn
        .update_webhook(path_params.webhook_id, update_data)
        .await?;

    tracing::info!(target: TRACING_TARGET, "Webhook updated");

    Ok((StatusCode::OK, Json(ApiResponse::ok(webhook.into()))))
}

fn update_webhook_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update webhook")
        .description("Updates webhook configuration such as URL, event subscriptions or status.")
        .response::<200, Json<ApiResponse<Webhook>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<422, Json<ErrorResponse>>()
}

/// Deletes a webhook.
///
/// The webhook becomes ineligible for dispatch; historical deliveries are
/// retained for auditing.
#[tracing::instrument(
    skip_all,
    fields(
        tenant_id = %context.tenant_id,
        webhook_id = %path_params.webhook_id,
    )
)]
async fn delete_webhook(
    PgPool(mut conn): PgPool,
    context: TenantContext,
    Path(path_params): Path<WebhookPathParams>,
) -> Result<StatusCode> {
    tracing::debug!(target: TRACING_TARGET, "Deleting webhook");

    let _ = find_tenant_webhook(&mut conn, &context, path_params.webhook_id).await?;

    conn.delete_webhook(path_params.webhook_id).await?;

    tracing::info!(target: TRACING_TARGET, "Webhook deleted");

    Ok(StatusCode::NO_CONTENT)
}

fn delete_webhook_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete webhook")
        .description("Removes the webhook from dispatch. Delivery history is retained.")
        .response::<204, ()>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Sends a synchronous test delivery.
///
/// The attempt is recorded in the delivery log like any other delivery.
#[tracing::instrument(
    skip_all,
    fields(
        tenant_id = %context.tenant_id,
        webhook_id = %path_params.webhook_id,
    )
)]
async fn test_webhook(
    PgPool(mut conn): PgPool,
    State(webhook_service): State<WebhookService>,
    context: TenantContext,
    Path(path_params): Path<WebhookPathParams>,
    ValidateJson(request): ValidateJson<TestWebhook>,
) -> Result<(StatusCode, Json<ApiResponse<DeliveryResult>>)> {
    use hookrelay_postgres::query::DeliveryRepository;
    use hookrelay_postgres::types::WebhookEvent;

    tracing::debug!(target: TRACING_TARGET, "Testing webhook");

    let webhook = find_tenant_webhook(&mut conn, &context, path_params.webhook_id).await?;

    let url: Url = webhook.url.parse().map_err(|_| {
        ErrorKind::UnprocessableEntity
            .with_message("Webhook URL is not a valid URL")
            .into_static()
    })?;

    let mut delivery_request = WebhookRequest::test(url, webhook.id, context.tenant_id)
        .with_secret(webhook.secret.clone())
        .with_headers(webhook.parsed_headers());

    if let Some(payload) = request.payload {
        delivery_request.context = delivery_request.context.with_metadata(payload);
    }

    // Record the test in the delivery log before attempting it.
    let payload_snapshot = serde_json::to_value(&delivery_request.context)
        .unwrap_or(serde_json::Value::Null);
    let delivery = conn
        .create_delivery(model::NewDelivery {
            webhook_id: webhook.id,
            event_type: WebhookEvent::WebhookTest,
            payload: payload_snapshot,
        })
        .await?;
    delivery_request = delivery_request.with_request_id(delivery.id);

    let result = match webhook_service.deliver(&delivery_request).await {
        Ok(response) if response.is_success() => {
            conn.record_attempt_success(
                delivery.id,
                response.status_code as i32,
                response.body.clone(),
                response.response_time_ms() as i32,
            )
            .await?;
            DeliveryResult::from_response(&response)
        }
        Ok(response) => {
            conn.record_attempt_failure(
                delivery.id,
                (response.status_code != 0).then_some(response.status_code as i32),
                response.body.clone(),
                response.error.clone(),
                Some(response.response_time_ms() as i32),
            )
            .await?;
            DeliveryResult::from_response(&response)
        }
        Err(err) => {
            conn.record_attempt_failure(
                delivery.id,
                None,
                None,
                Some(err.to_string()),
                None,
            )
            .await?;
            DeliveryResult {
                success: false,
                status_code: None,
                response_time_ms: None,
                error_message: Some(err.to_string()),
            }
        }
    };

    conn.record_webhook_triggered(webhook.id).await?;

    tracing::info!(
        target: TRACING_TARGET,
        success = result.success,
        "Test delivery completed"
    );

    Ok((StatusCode::OK, Json(ApiResponse::ok(result))))
}

fn test_webhook_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Test webhook")
        .description("Sends a synchronous test delivery and records it in the delivery log.")
        .response::<200, Json<ApiResponse<DeliveryResult>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns the event catalog.
#[tracing::instrument(skip_all)]
async fn list_events() -> (StatusCode, Json<ApiResponse<Vec<EventCatalogEntry>>>) {
    let catalog = EventCatalogEntry::catalog();
    (StatusCode::OK, Json(ApiResponse::ok(catalog)))
}

fn list_events_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List events")
        .description("Returns the catalog of events that webhooks can subscribe to.")
        .response::<200, Json<ApiResponse<Vec<EventCatalogEntry>>>>()
}

/// Validates a webhook endpoint URL without creating anything.
#[tracing::instrument(skip_all)]
async fn validate_url(
    ValidateJson(request): ValidateJson<ValidateUrl>,
) -> (StatusCode, Json<ApiResponse<UrlValidation>>) {
    let validation = match validate_webhook_url(&request.url) {
        Ok(()) => UrlValidation::valid(),
        Err(err) => UrlValidation::invalid(
            err.message
                .map(|m| m.to_string())
                .unwrap_or_else(|| "URL is not acceptable".to_string()),
        ),
    };

    (StatusCode::OK, Json(ApiResponse::ok(validation)))
}

fn validate_url_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Validate URL")
        .description("Checks whether a URL is acceptable as a webhook endpoint.")
        .response::<200, Json<ApiResponse<UrlValidation>>>()
        .response::<422, Json<ErrorResponse>>()
}

/// Finds a webhook by ID and verifies it belongs to the requesting tenant.
///
/// A webhook owned by another tenant is reported as not found so that
/// webhook ids cannot be probed across tenants.
pub(crate) async fn find_tenant_webhook(
    conn: &mut PgConn,
    context: &TenantContext,
    webhook_id: uuid::Uuid,
) -> Result<model::Webhook> {
    let Some(webhook) = conn.find_webhook_by_id(webhook_id).await? else {
        return Err(ErrorKind::NotFound
            .with_message("Webhook not found")
            .with_resource("webhook"));
    };

    if webhook.tenant_id != context.tenant_id {
        return Err(ErrorKind::NotFound
            .with_message("Webhook not found")
            .with_resource("webhook"));
    }

    Ok(webhook)
}

/// Returns routes for webhook management.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/webhooks/",
            post_with(create_webhook, create_webhook_docs)
                .get_with(list_webhooks, list_webhooks_docs),
        )
        .api_route("/webhooks/events/", get_with(list_events, list_events_docs))
        .api_route(
            "/webhooks/validate-url/",
            post_with(validate_url, validate_url_docs),
        )
        .api_route(
            "/webhooks/{webhook_id}/",
            get_with(read_webhook, read_webhook_docs)
                .put_with(update_webhook, update_webhook_docs)
                .delete_with(delete_webhook, delete_webhook_docs),
        )
        .api_route(
            "/webhooks/{webhook_id}/test/",
            post_with(test_webhook, test_webhook_docs),
        )
        .with_path_items(|item| item.tag("Webhooks"))
}
