//! Event ingestion response types.

use hookrelay_postgres::types::WebhookEvent;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Result of dispatching a platform event.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDispatched {
    /// The dispatched event type.
    pub event: WebhookEvent,
    /// Number of webhooks the event was fanned out to.
    pub matched_webhooks: usize,
}
