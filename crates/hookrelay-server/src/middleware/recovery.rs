//! Recovery middleware: panic catching and request timeouts.

use std::time::Duration;

use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;

/// Default request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Recovery configuration.
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Maximum duration of a single request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Extension trait applying recovery layers to a router.
pub trait RouterRecoveryExt {
    /// Applies panic catching and the request timeout.
    fn with_recovery(self, config: RecoveryConfig) -> Self;
}

impl RouterRecoveryExt for Router {
    fn with_recovery(self, config: RecoveryConfig) -> Self {
        let timeout = Duration::from_secs(config.request_timeout_secs.max(1));

        self.layer(TimeoutLayer::new(timeout))
            .layer(CatchPanicLayer::new())
    }
}
