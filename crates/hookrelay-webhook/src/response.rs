//! Webhook delivery response types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response from a webhook delivery attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookResponse {
    /// Unique identifier for this response.
    pub response_id: Uuid,
    /// Request ID this response corresponds to.
    pub request_id: Uuid,
    /// HTTP status code from the webhook endpoint (0 if request failed before response).
    pub status_code: u16,
    /// Response body returned by the endpoint, truncated to the client's limit.
    pub body: Option<String>,
    /// Transport-level error message if the request failed before a response.
    pub error: Option<String>,
    /// Timestamp when the request was initiated.
    pub started_at: Timestamp,
    /// Timestamp when the response was received.
    pub finished_at: Timestamp,
}

impl WebhookResponse {
    /// Creates a new webhook response.
    pub fn new(request_id: Uuid, status_code: u16, started_at: Timestamp) -> Self {
        Self {
            response_id: Uuid::now_v7(),
            request_id,
            status_code,
            body: None,
            error: None,
            started_at,
            finished_at: Timestamp::now(),
        }
    }

    /// Creates a response for a request that failed before reaching the endpoint.
    pub fn transport_failure(
        request_id: Uuid,
        error: impl Into<String>,
        started_at: Timestamp,
    ) -> Self {
        Self {
            response_id: Uuid::now_v7(),
            request_id,
            status_code: 0,
            body: None,
            error: Some(error.into()),
            started_at,
            finished_at: Timestamp::now(),
        }
    }

    /// Attaches the response body, truncated to `limit` bytes on a char boundary.
    pub fn with_body(mut self, body: String, limit: usize) -> Self {
        self.body = Some(truncate_body(body, limit));
        self
    }

    /// Returns whether the delivery was successful (2xx status code).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Calculates the response time as a duration.
    pub fn duration(&self) -> jiff::Span {
        self.started_at.until(self.finished_at).unwrap_or_default()
    }

    /// Returns the response time in whole milliseconds.
    pub fn response_time_ms(&self) -> i64 {
        self.finished_at
            .duration_since(self.started_at)
            .as_millis()
            .max(0) as i64
    }

    /// Checks if the response indicates a retryable error.
    pub fn is_retryable(&self) -> bool {
        if self.is_success() {
            return false;
        }

        // Network errors (status 0) or server errors (5xx) or specific client errors are retryable
        self.status_code == 0
            || self.status_code >= 500
            || self.status_code == 408
            || self.status_code == 429
    }
}

/// Truncates a response body to at most `limit` bytes without splitting a char.
fn truncate_body(mut body: String, limit: usize) -> String {
    if body.len() <= limit {
        return body;
    }

    let mut end = limit;
    while end > 0 && !body.is_char_boundary(end) {
        end -= 1;
    }
    body.truncate(end);
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response() {
        let request_id = Uuid::new_v4();
        let started_at = Timestamp::now();
        let response = WebhookResponse::new(request_id, 200, started_at);

        assert!(response.is_success());
        assert_eq!(response.request_id, request_id);
        assert_eq!(response.status_code, 200);
        assert!(response.error.is_none());
    }

    #[test]
    fn test_transport_failure() {
        let request_id = Uuid::new_v4();
        let response =
            WebhookResponse::transport_failure(request_id, "connection refused", Timestamp::now());

        assert!(!response.is_success());
        assert!(response.is_retryable());
        assert_eq!(response.status_code, 0);
        assert_eq!(response.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_is_retryable() {
        let started_at = Timestamp::now();

        // Success is not retryable
        assert!(!WebhookResponse::new(Uuid::new_v4(), 200, started_at).is_retryable());

        // 5xx errors are retryable
        assert!(WebhookResponse::new(Uuid::new_v4(), 500, started_at).is_retryable());
        assert!(WebhookResponse::new(Uuid::new_v4(), 503, started_at).is_retryable());

        // 429 Too Many Requests is retryable
        assert!(WebhookResponse::new(Uuid::new_v4(), 429, started_at).is_retryable());

        // 408 Request Timeout is retryable
        assert!(WebhookResponse::new(Uuid::new_v4(), 408, started_at).is_retryable());

        // 4xx errors (except 408, 429) are not retryable
        assert!(!WebhookResponse::new(Uuid::new_v4(), 400, started_at).is_retryable());
        assert!(!WebhookResponse::new(Uuid::new_v4(), 404, started_at).is_retryable());

        // Network errors (status 0) are retryable
        assert!(WebhookResponse::new(Uuid::new_v4(), 0, started_at).is_retryable());
    }

    #[test]
    fn test_body_truncation() {
        let response = WebhookResponse::new(Uuid::new_v4(), 200, Timestamp::now())
            .with_body("ok".repeat(100), 16);

        assert_eq!(response.body.as_ref().map(String::len), Some(16));
    }

    #[test]
    fn test_body_truncation_char_boundary() {
        // "é" is two bytes; truncating at byte 3 must not split it.
        let response = WebhookResponse::new(Uuid::new_v4(), 200, Timestamp::now())
            .with_body("éé".to_string(), 3);

        assert_eq!(response.body.as_deref(), Some("é"));
    }

    #[test]
    fn test_response_time_is_non_negative() {
        let response = WebhookResponse::new(Uuid::new_v4(), 200, Timestamp::now());
        assert!(response.response_time_ms() >= 0);
    }
}
