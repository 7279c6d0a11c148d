//! Path parameter types.

use schemars::JsonSchema;
use serde::Deserialize;
use uuid::Uuid;

/// Path parameters for webhook-scoped routes.
#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
pub struct WebhookPathParams {
    /// The webhook identifier.
    pub webhook_id: Uuid,
}

/// Path parameters for delivery-scoped routes.
#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
pub struct DeliveryPathParams {
    /// The webhook identifier.
    pub webhook_id: Uuid,
    /// The delivery identifier.
    pub delivery_id: Uuid,
}
