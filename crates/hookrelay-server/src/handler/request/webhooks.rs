//! Webhook request types.
//!
//! This module provides request DTOs for webhook management including
//! creation, updates, test deliveries and URL validation.

use std::collections::HashMap;

use hookrelay_postgres::model::{NewWebhook, UpdateWebhook as UpdateWebhookModel};
use hookrelay_postgres::types::{WebhookEvent, WebhookStatus};
use rand::distr::{Alphanumeric, SampleString};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Length of generated signing secrets (excluding the prefix).
const GENERATED_SECRET_LEN: usize = 32;

/// Validates that a webhook endpoint URL parses and uses HTTPS.
pub fn validate_webhook_url(url: &str) -> Result<(), ValidationError> {
    let parsed = Url::parse(url)
        .map_err(|_| ValidationError::new("url").with_message("not a valid URL".into()))?;

    if parsed.scheme() != "https" {
        return Err(
            ValidationError::new("url").with_message("webhook URLs must use https".into())
        );
    }

    if parsed.host_str().is_none() {
        return Err(ValidationError::new("url").with_message("URL is missing a host".into()));
    }

    Ok(())
}

/// Generates a fresh signing secret.
fn generate_secret() -> String {
    let suffix = Alphanumeric.sample_string(&mut rand::rng(), GENERATED_SECRET_LEN);
    format!("whsec_{suffix}")
}

/// Request payload for creating a new webhook.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebhook {
    /// Human-readable name for the webhook (1-100 characters).
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
    /// Detailed description of the webhook's purpose (max 500 characters).
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
    /// The HTTPS URL to send webhook payloads to.
    #[validate(length(min = 1, max = 2048), custom(function = "validate_webhook_url"))]
    pub url: String,
    /// List of event types this webhook should receive (non-empty).
    #[validate(length(min = 1))]
    pub events: Vec<WebhookEvent>,
    /// Optional signing secret; generated when omitted (16-128 characters).
    #[validate(length(min = 16, max = 128))]
    pub secret: Option<String>,
    /// Optional custom headers to include in webhook requests.
    pub headers: Option<HashMap<String, String>>,
    /// Initial status of the webhook (active or paused).
    pub status: Option<WebhookStatus>,
}

impl CreateWebhook {
    /// Converts this request into a [`NewWebhook`] model.
    ///
    /// A signing secret is generated when none was supplied. Users cannot
    /// set the `disabled` status; it is coerced to `paused`.
    ///
    /// # Arguments
    ///
    /// * `tenant_id` - The tenant this webhook belongs to.
    /// * `account_id` - The account creating the webhook.
    pub fn into_model(self, tenant_id: Uuid, account_id: Uuid) -> NewWebhook {
        let events = self.events.into_iter().map(Some).collect();
        let headers = NewWebhook::serialize_headers_opt(self.headers);
        let secret = self.secret.unwrap_or_else(generate_secret);
        let status = self.status.map(|s| match s {
            WebhookStatus::Disabled => WebhookStatus::Paused,
            other => other,
        });

        NewWebhook {
            tenant_id,
            display_name: self.display_name,
            description: self.description,
            url: self.url,
            events,
            headers,
            secret,
            status,
            created_by: account_id,
        }
    }
}

/// Request payload for updating an existing webhook.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWebhook {
    /// Updated human-readable name for the webhook (1-100 characters).
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
    /// Updated description of the webhook's purpose (max 500 characters).
    #[validate(length(max = 500))]
    pub description: Option<String>,
    /// Updated HTTPS URL to send webhook payloads to.
    #[validate(length(min = 1, max = 2048), custom(function = "validate_webhook_url"))]
    pub url: Option<String>,
    /// Updated list of event types this webhook should receive (non-empty).
    #[validate(length(min = 1))]
    pub events: Option<Vec<WebhookEvent>>,
    /// Updated custom headers to include in webhook requests.
    pub headers: Option<HashMap<String, String>>,
    /// Updated status (active to resume, paused to pause).
    pub status: Option<WebhookStatus>,
}

impl UpdateWebhook {
    /// Converts this request into an [`UpdateWebhookModel`].
    ///
    /// If `current_status` is `Disabled`, the status field is ignored;
    /// re-enabling a disabled webhook is an operator action. If the user
    /// tries to set `Disabled`, it is treated as `Paused`.
    pub fn into_model(self, current_status: WebhookStatus) -> UpdateWebhookModel {
        let events = self.events.map(|e| e.into_iter().map(Some).collect());
        let headers = NewWebhook::serialize_headers_opt(self.headers);
        let status = if current_status.is_disabled() {
            None
        } else {
            self.status.map(|s| match s {
                WebhookStatus::Disabled => WebhookStatus::Paused,
                other => other,
            })
        };

        UpdateWebhookModel {
            display_name: self.display_name,
            description: self.description,
            url: self.url,
            events,
            headers,
            status,
            ..Default::default()
        }
    }
}

/// Query parameters for listing webhooks.
#[derive(Debug, Clone, Copy, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookListParams {
    /// Restrict to webhooks with this status.
    pub status: Option<WebhookStatus>,
    /// Restrict to webhooks subscribed to this event.
    pub event: Option<WebhookEvent>,
    /// 1-based page number.
    pub page: Option<i64>,
    /// Page size (1-1000).
    pub per_page: Option<i64>,
}

impl WebhookListParams {
    /// Converts the page parameters into repository pagination.
    pub fn pagination(&self) -> hookrelay_postgres::query::Pagination {
        hookrelay_postgres::query::Pagination::from_page(
            self.page.unwrap_or(1),
            self.per_page.unwrap_or(50),
        )
    }
}

/// Request payload for testing a webhook.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TestWebhook {
    /// Optional custom payload to send in the test request.
    /// If not provided, a default test payload will be used.
    pub payload: Option<serde_json::Value>,
}

/// Request payload for validating a webhook endpoint URL.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ValidateUrl {
    /// The URL to validate.
    #[validate(length(min = 1, max = 2048))]
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation_requires_https() {
        assert!(validate_webhook_url("https://example.com/hook").is_ok());
        assert!(validate_webhook_url("http://example.com/hook").is_err());
        assert!(validate_webhook_url("not a url").is_err());
        assert!(validate_webhook_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_create_rejects_empty_events() {
        let request = CreateWebhook {
            display_name: "ci".into(),
            url: "https://example.com/hook".into(),
            events: vec![],
            ..Default::default()
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_rejects_plain_http() {
        let request = CreateWebhook {
            display_name: "ci".into(),
            url: "http://example.com/hook".into(),
            events: vec![WebhookEvent::PostCreated],
            ..Default::default()
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_accepts_valid_request() {
        let request = CreateWebhook {
            display_name: "ci".into(),
            url: "https://example.com/hook".into(),
            events: vec![WebhookEvent::PostCreated],
            ..Default::default()
        };

        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_into_model_generates_secret() {
        let tenant_id = Uuid::now_v7();
        let account_id = Uuid::now_v7();
        let request = CreateWebhook {
            display_name: "ci".into(),
            url: "https://example.com/hook".into(),
            events: vec![WebhookEvent::PostCreated],
            ..Default::default()
        };

        let model = request.into_model(tenant_id, account_id);
        assert!(model.secret.starts_with("whsec_"));
        assert_eq!(model.secret.len(), "whsec_".len() + GENERATED_SECRET_LEN);
        assert_eq!(model.tenant_id, tenant_id);
        assert_eq!(model.created_by, account_id);
    }

    #[test]
    fn test_into_model_coerces_disabled_to_paused() {
        let request = CreateWebhook {
            display_name: "ci".into(),
            url: "https://example.com/hook".into(),
            events: vec![WebhookEvent::PostCreated],
            status: Some(WebhookStatus::Disabled),
            ..Default::default()
        };

        let model = request.into_model(Uuid::now_v7(), Uuid::now_v7());
        assert_eq!(model.status, Some(WebhookStatus::Paused));
    }

    #[test]
    fn test_update_ignores_status_while_disabled() {
        let request = UpdateWebhook {
            status: Some(WebhookStatus::Active),
            ..Default::default()
        };

        let model = request.into_model(WebhookStatus::Disabled);
        assert!(model.status.is_none());
    }

    #[test]
    fn test_update_pause_and_resume() {
        let pause = UpdateWebhook {
            status: Some(WebhookStatus::Paused),
            ..Default::default()
        };
        assert_eq!(
            pause.into_model(WebhookStatus::Active).status,
            Some(WebhookStatus::Paused)
        );

        let resume = UpdateWebhook {
            status: Some(WebhookStatus::Active),
            ..Default::default()
        };
        assert_eq!(
            resume.into_model(WebhookStatus::Paused).status,
            Some(WebhookStatus::Active)
        );
    }
}
