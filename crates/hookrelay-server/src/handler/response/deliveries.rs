//! Delivery response types.

use hookrelay_postgres::model;
use hookrelay_postgres::types::{DeliveryStatus, WebhookEvent};
use hookrelay_webhook::WebhookResponse;
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Delivery log entry response.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    /// Unique delivery identifier.
    pub delivery_id: Uuid,
    /// Webhook this delivery belongs to.
    pub webhook_id: Uuid,
    /// Event type that produced this delivery.
    pub event_type: WebhookEvent,
    /// Immutable payload snapshot sent to the endpoint.
    pub payload: serde_json::Value,
    /// Current lifecycle state.
    pub status: DeliveryStatus,
    /// HTTP status code of the most recent attempt.
    pub response_code: Option<i32>,
    /// Truncated response body of the most recent attempt.
    pub response_body: Option<String>,
    /// Failure reason of the most recent attempt.
    pub error_message: Option<String>,
    /// Number of attempts performed so far.
    pub attempt_count: i32,
    /// When the next retry becomes due.
    pub next_attempt_at: Option<Timestamp>,
    /// Latency of the most recent attempt in milliseconds.
    pub response_time_ms: Option<i32>,
    /// Timestamp when this delivery was created.
    pub created_at: Timestamp,
    /// Timestamp when this delivery reached a terminal state.
    pub completed_at: Option<Timestamp>,
}

impl Delivery {
    /// Creates a delivery response from a database model.
    pub fn from_model(delivery: model::Delivery) -> Self {
        Self {
            delivery_id: delivery.id,
            webhook_id: delivery.webhook_id,
            event_type: delivery.event_type,
            payload: delivery.payload,
            status: delivery.status,
            response_code: delivery.response_code,
            response_body: delivery.response_body,
            error_message: delivery.error_message,
            attempt_count: delivery.attempt_count,
            next_attempt_at: delivery.next_attempt_at.map(Into::into),
            response_time_ms: delivery.response_time_ms,
            created_at: delivery.created_at.into(),
            completed_at: delivery.completed_at.map(Into::into),
        }
    }

    /// Creates a list of delivery responses from database models.
    pub fn from_models(models: Vec<model::Delivery>) -> Vec<Self> {
        models.into_iter().map(Self::from_model).collect()
    }
}

impl From<model::Delivery> for Delivery {
    fn from(delivery: model::Delivery) -> Self {
        Self::from_model(delivery)
    }
}

/// Response for listing deliveries.
pub type Deliveries = Vec<Delivery>;

/// Result of a synchronous (test) webhook delivery attempt.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResult {
    /// Whether the webhook delivery was successful (2xx status code).
    pub success: bool,
    /// HTTP status code returned by the webhook endpoint.
    pub status_code: Option<u16>,
    /// Time taken to receive a response in milliseconds.
    pub response_time_ms: Option<i64>,
    /// Error message if the delivery failed.
    pub error_message: Option<String>,
}

impl DeliveryResult {
    /// Creates a result from the delivery client's response.
    pub fn from_response(response: &WebhookResponse) -> Self {
        Self {
            success: response.is_success(),
            status_code: (response.status_code != 0).then_some(response.status_code),
            response_time_ms: Some(response.response_time_ms()),
            error_message: response.error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_from_success_response() {
        let response = WebhookResponse::new(Uuid::now_v7(), 200, Timestamp::now());
        let result = DeliveryResult::from_response(&response);

        assert!(result.success);
        assert_eq!(result.status_code, Some(200));
        assert!(result.error_message.is_none());
    }

    #[test]
    fn test_result_from_transport_failure() {
        let response =
            WebhookResponse::transport_failure(Uuid::now_v7(), "timed out", Timestamp::now());
        let result = DeliveryResult::from_response(&response);

        assert!(!result.success);
        assert_eq!(result.status_code, None);
        assert_eq!(result.error_message.as_deref(), Some("timed out"));
    }
}
