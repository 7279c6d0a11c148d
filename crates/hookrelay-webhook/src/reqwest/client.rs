//! Reqwest-based HTTP client for webhook delivery.

use std::sync::Arc;

use hmac::{Hmac, Mac};
use jiff::Timestamp;
use reqwest::Client;
use sha2::Sha256;

use super::{Error, ReqwestConfig, TRACING_TARGET};
use crate::{WebhookProvider, WebhookRequest, WebhookResponse, WebhookService};

type HmacSha256 = Hmac<Sha256>;

/// Inner client that holds the HTTP client and configuration.
struct ReqwestClientInner {
    http: Client,
    config: ReqwestConfig,
}

/// Reqwest-based HTTP client for delivering webhook payloads to external endpoints.
///
/// This client implements the [`WebhookProvider`] trait and provides HTTP-based
/// webhook delivery with request signing support. Transport-level failures are
/// returned as failed [`WebhookResponse`]s rather than errors, so a dead
/// endpoint never propagates past the delivery boundary.
///
/// # Examples
///
/// ```rust,ignore
/// use hookrelay_webhook::reqwest::{ReqwestClient, ReqwestConfig};
/// use hookrelay_webhook::WebhookRequest;
/// use url::Url;
///
/// let config = ReqwestConfig::default();
/// let client = ReqwestClient::new(config);
///
/// let url = Url::parse("https://example.com/webhook")?;
/// let request = WebhookRequest::test(url, webhook_id, tenant_id);
/// let response = client.deliver(&request).await?;
/// ```
#[derive(Clone)]
pub struct ReqwestClient {
    inner: Arc<ReqwestClientInner>,
}

impl std::fmt::Debug for ReqwestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestClient {
    /// Creates a new reqwest client with the given configuration.
    pub fn new(config: ReqwestConfig) -> Self {
        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            timeout_ms = timeout.as_millis(),
            "Creating reqwest client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()
            .expect("failed to create HTTP client");

        let inner = ReqwestClientInner { http, config };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Gets the underlying HTTP client.
    pub(crate) fn http(&self) -> &Client {
        &self.inner.http
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ReqwestConfig {
        &self.inner.config
    }

    /// Converts this client into a [`WebhookService`] for use with dependency injection.
    pub fn into_service(self) -> WebhookService {
        WebhookService::new(self)
    }

    /// Signs a payload using HMAC-SHA256.
    ///
    /// The signature is computed over: `{timestamp}.{payload}`
    pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> String {
        let signing_input = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));

        let mut mac =
            HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());

        let result = mac.finalize();
        hex::encode(result.into_bytes())
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new(ReqwestConfig::default())
    }
}

#[async_trait::async_trait]
impl WebhookProvider for ReqwestClient {
    async fn deliver(&self, request: &WebhookRequest) -> crate::Result<WebhookResponse> {
        let started_at = Timestamp::now();
        let timestamp = started_at.as_second();

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            url = %request.url,
            event = %request.event,
            "Delivering webhook"
        );

        // Create the payload from the request
        let payload = request.to_payload();
        let payload_bytes = serde_json::to_vec(&payload).map_err(Error::Serde)?;

        // Determine the timeout to use
        let timeout = request.timeout.unwrap_or_else(|| self.config().timeout());

        // Build the HTTP request
        let mut http_request = self
            .http()
            .post(request.url.as_str())
            .header("content-type", "application/json")
            .header("x-webhook-event", &request.event)
            .header("x-webhook-timestamp", timestamp.to_string())
            .header("x-webhook-delivery", request.request_id.to_string())
            .timeout(timeout);

        // Add HMAC-SHA256 signature if secret is present
        if let Some(ref secret) = request.secret {
            let signature = Self::sign_payload(secret, timestamp, &payload_bytes);
            http_request =
                http_request.header("x-webhook-signature", format!("sha256={}", signature));
        }

        // Add custom headers
        for (name, value) in &request.headers {
            http_request = http_request.header(name, value);
        }

        // Send the request with the JSON payload
        let http_response = match http_request.body(payload_bytes).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    error = %err,
                    "Webhook delivery failed before a response"
                );
                return Ok(WebhookResponse::transport_failure(
                    request.request_id,
                    err.to_string(),
                    started_at,
                ));
            }
        };

        let status_code = http_response.status().as_u16();
        let body = http_response.text().await.unwrap_or_default();

        let response = WebhookResponse::new(request.request_id, status_code, started_at)
            .with_body(body, self.config().max_response_bytes);

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            status_code,
            success = response.is_success(),
            "Webhook delivery completed"
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_payload() {
        let secret = "test_secret";
        let timestamp = 1234567890i64;
        let payload = b"{\"event\":\"test\"}";

        let signature = ReqwestClient::sign_payload(secret, timestamp, payload);

        // Signature should be a hex string (64 chars for SHA256)
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_sign_payload_is_deterministic() {
        let a = ReqwestClient::sign_payload("secret", 42, b"payload");
        let b = ReqwestClient::sign_payload("secret", 42, b"payload");
        let c = ReqwestClient::sign_payload("secret", 43, b"payload");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_client_creation() {
        let config = ReqwestConfig::default();
        let client = ReqwestClient::new(config);
        assert!(client.config().user_agent.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_recorded_not_raised() {
        let config = ReqwestConfig::default().with_timeout(1);
        let client = ReqwestClient::new(config);

        // Reserved TEST-NET-1 address; nothing listens there.
        let url = url::Url::parse("https://192.0.2.1/webhook").unwrap();
        let request = WebhookRequest::test(url, uuid::Uuid::now_v7(), uuid::Uuid::now_v7());

        let response = client.deliver(&request).await.unwrap();
        assert!(!response.is_success());
        assert_eq!(response.status_code, 0);
        assert!(response.error.is_some());
    }
}
