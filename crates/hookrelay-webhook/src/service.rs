//! Injectable handle around a [`WebhookProvider`] implementation.

use std::sync::Arc;

use crate::{Result, WebhookProvider, WebhookRequest, WebhookResponse};

/// Cloneable webhook delivery service for dependency injection.
///
/// Wraps any [`WebhookProvider`] behind an `Arc` so that handlers and
/// workers can share a single provider instance.
#[derive(Clone)]
pub struct WebhookService {
    provider: Arc<dyn WebhookProvider>,
}

impl std::fmt::Debug for WebhookService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookService").finish_non_exhaustive()
    }
}

impl WebhookService {
    /// Creates a new service from the given provider.
    pub fn new(provider: impl WebhookProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Delivers a webhook payload via the underlying provider.
    pub async fn deliver(&self, request: &WebhookRequest) -> Result<WebhookResponse> {
        self.provider.deliver(request).await
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use url::Url;
    use uuid::Uuid;

    use super::*;

    struct StaticProvider {
        status_code: u16,
    }

    #[async_trait::async_trait]
    impl WebhookProvider for StaticProvider {
        async fn deliver(&self, request: &WebhookRequest) -> Result<WebhookResponse> {
            Ok(WebhookResponse::new(
                request.request_id,
                self.status_code,
                Timestamp::now(),
            ))
        }
    }

    #[tokio::test]
    async fn test_service_delegates_to_provider() {
        let service = WebhookService::new(StaticProvider { status_code: 204 });
        let url = Url::parse("https://example.com/hook").unwrap();
        let request = WebhookRequest::test(url, Uuid::now_v7(), Uuid::now_v7());

        let response = service.deliver(&request).await.unwrap();
        assert_eq!(response.status_code, 204);
        assert_eq!(response.request_id, request.request_id);
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_failed_delivery_feeds_retry_policy() {
        use crate::{RetryDecision, RetryPolicy};

        let service = WebhookService::new(StaticProvider { status_code: 500 });
        let url = Url::parse("https://example.com/hook").unwrap();
        let request = WebhookRequest::test(url, Uuid::now_v7(), Uuid::now_v7());

        let response = service.deliver(&request).await.unwrap();
        assert!(!response.is_success());
        assert!(response.is_retryable());

        // One attempt recorded so far, budget of two: one retry, then dead.
        let policy = RetryPolicy::new(
            2,
            std::time::Duration::from_secs(1),
            std::time::Duration::from_secs(60),
        );
        assert!(matches!(policy.decide(1), RetryDecision::Retry(_)));
        assert_eq!(policy.decide(2), RetryDecision::Exhausted);
    }
}
