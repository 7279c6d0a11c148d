//! Webhook response types.

use std::collections::HashMap;

use hookrelay_postgres::model;
use hookrelay_postgres::types::{WebhookEvent, WebhookStatus};
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use uuid::Uuid;

/// Webhook response without the signing secret.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    /// Unique webhook identifier.
    pub webhook_id: Uuid,
    /// Tenant this webhook belongs to.
    pub tenant_id: Uuid,
    /// Human-readable name for the webhook.
    pub display_name: String,
    /// Detailed description of the webhook's purpose.
    pub description: String,
    /// The URL webhook payloads are sent to.
    pub url: String,
    /// List of event types this webhook receives.
    pub events: Vec<WebhookEvent>,
    /// Custom headers included in webhook requests.
    pub headers: HashMap<String, String>,
    /// Current status of the webhook.
    pub status: WebhookStatus,
    /// Timestamp of the most recent webhook trigger.
    pub last_triggered_at: Option<Timestamp>,
    /// Account that originally created this webhook.
    pub created_by: Uuid,
    /// Timestamp when this webhook was first created.
    pub created_at: Timestamp,
    /// Timestamp when this webhook was last modified.
    pub updated_at: Timestamp,
}

impl Webhook {
    /// Creates a webhook response from a database model.
    pub fn from_model(webhook: model::Webhook) -> Self {
        let events = webhook.subscribed_events();
        let headers = webhook.parsed_headers();

        Self {
            webhook_id: webhook.id,
            tenant_id: webhook.tenant_id,
            display_name: webhook.display_name,
            description: webhook.description,
            url: webhook.url,
            events,
            headers,
            status: webhook.status,
            last_triggered_at: webhook.last_triggered_at.map(Into::into),
            created_by: webhook.created_by,
            created_at: webhook.created_at.into(),
            updated_at: webhook.updated_at.into(),
        }
    }

    /// Creates a list of webhook responses from database models.
    pub fn from_models(models: Vec<model::Webhook>) -> Vec<Self> {
        models.into_iter().map(Self::from_model).collect()
    }
}

impl From<model::Webhook> for Webhook {
    fn from(webhook: model::Webhook) -> Self {
        Self::from_model(webhook)
    }
}

/// Response for listing webhooks.
pub type Webhooks = Vec<Webhook>;

/// Webhook response including the signing secret.
///
/// Only returned at creation time; the secret is never echoed again.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookWithSecret {
    /// The webhook, without its secret.
    #[serde(flatten)]
    pub webhook: Webhook,
    /// HMAC-SHA256 signing secret.
    pub secret: String,
}

impl From<model::Webhook> for WebhookWithSecret {
    fn from(mut webhook: model::Webhook) -> Self {
        let secret = std::mem::take(&mut webhook.secret);
        Self {
            webhook: Webhook::from_model(webhook),
            secret,
        }
    }
}

/// One entry of the event catalog.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventCatalogEntry {
    /// The event name.
    pub event: WebhookEvent,
    /// The event category (e.g. "post", "member").
    pub category: String,
}

impl EventCatalogEntry {
    /// Returns the full event catalog.
    pub fn catalog() -> Vec<Self> {
        WebhookEvent::iter()
            .map(|event| Self {
                category: event.category().to_string(),
                event,
            })
            .collect()
    }
}

/// Result of validating a webhook endpoint URL.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UrlValidation {
    /// Whether the URL is acceptable as a webhook endpoint.
    pub valid: bool,
    /// Why the URL was rejected, when it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl UrlValidation {
    /// Creates a passing validation result.
    pub fn valid() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    /// Creates a failing validation result.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_contains_every_event() {
        let catalog = EventCatalogEntry::catalog();
        assert_eq!(catalog.len(), WebhookEvent::iter().count());
        assert!(
            catalog
                .iter()
                .any(|entry| entry.event == WebhookEvent::PostCreated && entry.category == "post")
        );
    }

    #[test]
    fn test_secret_is_split_out() {
        let model = model::Webhook {
            id: Uuid::now_v7(),
            tenant_id: Uuid::now_v7(),
            display_name: "ci".into(),
            description: String::new(),
            url: "https://example.com/hook".into(),
            events: vec![Some(WebhookEvent::PostCreated)],
            headers: serde_json::json!({}),
            secret: "whsec_test".into(),
            status: WebhookStatus::Active,
            last_triggered_at: None,
            created_by: Uuid::now_v7(),
            created_at: Timestamp::now().into(),
            updated_at: Timestamp::now().into(),
            deleted_at: None,
        };

        let response = WebhookWithSecret::from(model);
        assert_eq!(response.secret, "whsec_test");
        assert_eq!(response.webhook.events, vec![WebhookEvent::PostCreated]);
    }
}
