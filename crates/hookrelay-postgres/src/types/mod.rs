//! Database-backed enumerations shared across the service.

mod enums;

pub use enums::{DeliveryStatus, WebhookEvent, WebhookStatus};
