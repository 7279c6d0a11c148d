//! Response DTOs for all handlers.

mod api_response;
mod deliveries;
mod error_response;
mod events;
mod monitors;
mod statistics;
mod webhooks;

pub use api_response::ApiResponse;
pub use deliveries::{Deliveries, Delivery, DeliveryResult};
pub use error_response::ErrorResponse;
pub use events::EventDispatched;
pub use monitors::{ComponentHealth, HealthStatus};
pub use statistics::WebhookStatistics;
pub use webhooks::{EventCatalogEntry, UrlValidation, Webhook, WebhookWithSecret, Webhooks};
