//! Request DTOs for all handlers.

mod deliveries;
mod events;
mod paths;
mod statistics;
mod webhooks;

pub use deliveries::DeliveryListParams;
pub use events::PublishEvent;
pub use paths::{DeliveryPathParams, WebhookPathParams};
pub use statistics::StatisticsParams;
pub use webhooks::{
    CreateWebhook, TestWebhook, UpdateWebhook, ValidateUrl, WebhookListParams,
    validate_webhook_url,
};
