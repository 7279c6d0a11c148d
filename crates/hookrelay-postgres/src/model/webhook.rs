//! Webhook registry model for PostgreSQL database operations.
//!
//! A webhook is a tenant-owned endpoint subscription: an HTTPS URL, the set
//! of events it wants to receive, a signing secret and an operational status.

use std::collections::HashMap;

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::webhooks;
use crate::types::{WebhookEvent, WebhookStatus};

/// Webhook model representing a registered endpoint subscription.
///
/// Each webhook maintains its own lifecycle with status tracking and
/// delivery monitoring. Deleted webhooks are soft-deleted so that their
/// delivery history survives for auditing.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = webhooks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Webhook {
    /// Unique webhook identifier.
    pub id: Uuid,
    /// Tenant this webhook belongs to.
    pub tenant_id: Uuid,
    /// Human-readable name for the webhook.
    pub display_name: String,
    /// Description of the webhook's purpose.
    pub description: String,
    /// Webhook endpoint URL.
    pub url: String,
    /// Array of event types this webhook subscribes to.
    pub events: Vec<Option<WebhookEvent>>,
    /// Custom headers to include in webhook requests.
    pub headers: serde_json::Value,
    /// HMAC-SHA256 signing secret for webhook verification.
    pub secret: String,
    /// Current status of the webhook.
    pub status: WebhookStatus,
    /// Timestamp of last webhook trigger.
    pub last_triggered_at: Option<Timestamp>,
    /// Account that created this webhook.
    pub created_by: Uuid,
    /// Timestamp when this webhook was created.
    pub created_at: Timestamp,
    /// Timestamp when this webhook was last modified.
    pub updated_at: Timestamp,
    /// Timestamp when this webhook was soft-deleted.
    pub deleted_at: Option<Timestamp>,
}

/// Data structure for creating a new webhook.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = webhooks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewWebhook {
    /// Tenant this webhook will belong to.
    pub tenant_id: Uuid,
    /// Human-readable name for the webhook.
    pub display_name: String,
    /// Description of the webhook's purpose.
    pub description: String,
    /// Webhook endpoint URL.
    pub url: String,
    /// Array of event types this webhook subscribes to.
    pub events: Vec<Option<WebhookEvent>>,
    /// Custom headers to include in webhook requests.
    pub headers: Option<serde_json::Value>,
    /// HMAC-SHA256 signing secret.
    pub secret: String,
    /// Initial status of the webhook.
    pub status: Option<WebhookStatus>,
    /// Account creating this webhook.
    pub created_by: Uuid,
}

/// Data structure for updating an existing webhook.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = webhooks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateWebhook {
    /// Updated name for the webhook.
    pub display_name: Option<String>,
    /// Updated description.
    pub description: Option<String>,
    /// Updated endpoint URL.
    pub url: Option<String>,
    /// Updated event subscriptions.
    pub events: Option<Vec<Option<WebhookEvent>>>,
    /// Updated custom headers.
    pub headers: Option<serde_json::Value>,
    /// Updated status.
    pub status: Option<WebhookStatus>,
    /// Updated last triggered timestamp.
    pub last_triggered_at: Option<Option<Timestamp>>,
    /// Soft deletion timestamp.
    pub deleted_at: Option<Option<Timestamp>>,
}

impl Webhook {
    /// Returns whether the webhook is active and receiving events.
    pub fn is_active(&self) -> bool {
        self.status.is_active() && self.deleted_at.is_none()
    }

    /// Returns whether the webhook is currently paused.
    pub fn is_paused(&self) -> bool {
        self.status.is_paused()
    }

    /// Returns whether the webhook has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns whether the webhook has custom headers.
    pub fn has_custom_headers(&self) -> bool {
        !self.headers.as_object().is_none_or(|obj| obj.is_empty())
    }

    /// Returns the list of subscribed events.
    pub fn subscribed_events(&self) -> Vec<WebhookEvent> {
        self.events.iter().filter_map(|e| *e).collect()
    }

    /// Returns the custom headers as a `HashMap<String, String>`.
    pub fn parsed_headers(&self) -> HashMap<String, String> {
        serde_json::from_value(self.headers.clone()).unwrap_or_default()
    }

    /// Returns whether the webhook subscribes to a specific event type.
    pub fn subscribes_to(&self, event: WebhookEvent) -> bool {
        self.events.contains(&Some(event))
    }

    /// Returns whether the webhook is eligible for dispatch.
    ///
    /// Dispatch requires an active, non-deleted webhook subscribed to the
    /// event; a paused or deleted webhook never receives new deliveries.
    pub fn accepts_event(&self, event: WebhookEvent) -> bool {
        self.is_active() && self.subscribes_to(event)
    }
}

impl NewWebhook {
    /// Converts a `HashMap<String, String>` to `Option<serde_json::Value>`.
    ///
    /// Returns `None` if the map is empty.
    pub fn serialize_headers(headers: HashMap<String, String>) -> Option<serde_json::Value> {
        if headers.is_empty() {
            None
        } else {
            Some(serde_json::to_value(&headers).unwrap_or_default())
        }
    }

    /// Converts an `Option<HashMap<String, String>>` to `Option<serde_json::Value>`.
    ///
    /// Returns `None` if the input is `None` or the map is empty.
    pub fn serialize_headers_opt(
        headers: Option<HashMap<String, String>>,
    ) -> Option<serde_json::Value> {
        headers.and_then(Self::serialize_headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_webhook() -> Webhook {
        Webhook {
            id: Uuid::now_v7(),
            tenant_id: Uuid::now_v7(),
            display_name: "ci".into(),
            description: String::new(),
            url: "https://example.com/hook".into(),
            events: vec![Some(WebhookEvent::PostCreated), Some(WebhookEvent::JobPosted)],
            headers: serde_json::json!({"x-team": "alumni"}),
            secret: "whsec_secret".into(),
            status: WebhookStatus::Active,
            last_triggered_at: None,
            created_by: Uuid::now_v7(),
            created_at: jiff::Timestamp::now().into(),
            updated_at: jiff::Timestamp::now().into(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_subscription_helpers() {
        let webhook = sample_webhook();

        assert!(webhook.subscribes_to(WebhookEvent::PostCreated));
        assert!(!webhook.subscribes_to(WebhookEvent::FormSubmitted));
        assert_eq!(webhook.subscribed_events().len(), 2);
    }

    #[test]
    fn test_accepts_event_requires_active_status() {
        let mut webhook = sample_webhook();
        assert!(webhook.accepts_event(WebhookEvent::PostCreated));

        webhook.status = WebhookStatus::Paused;
        assert!(!webhook.accepts_event(WebhookEvent::PostCreated));

        webhook.status = WebhookStatus::Active;
        webhook.deleted_at = Some(jiff::Timestamp::now().into());
        assert!(!webhook.accepts_event(WebhookEvent::PostCreated));
    }

    #[test]
    fn test_parsed_headers() {
        let webhook = sample_webhook();
        let headers = webhook.parsed_headers();

        assert!(webhook.has_custom_headers());
        assert_eq!(headers.get("x-team").map(String::as_str), Some("alumni"));
    }

    #[test]
    fn test_serialize_headers() {
        assert!(NewWebhook::serialize_headers(HashMap::new()).is_none());
        assert!(NewWebhook::serialize_headers_opt(None).is_none());

        let mut headers = HashMap::new();
        headers.insert("x-a".to_string(), "1".to_string());
        let value = NewWebhook::serialize_headers(headers).unwrap();
        assert_eq!(value.get("x-a").and_then(|v| v.as_str()), Some("1"));
    }
}
