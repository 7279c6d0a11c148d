//! Event ingestion request types.

use hookrelay_postgres::types::WebhookEvent;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request payload for publishing a platform event to the dispatcher.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PublishEvent {
    /// The event type; must be part of the event catalog.
    pub event: WebhookEvent,
    /// The primary resource affected by the event.
    pub resource_id: Uuid,
    /// Additional event-specific metadata forwarded to receivers.
    pub metadata: Option<serde_json::Value>,
}
