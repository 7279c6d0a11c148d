//! Middleware configuration arguments.

use clap::Args;
use hookrelay_server::middleware::{CorsConfig, RecoveryConfig};

/// Middleware options.
#[derive(Debug, Clone, Args)]
pub struct MiddlewareConfig {
    /// Allowed CORS origin (repeatable); all origins when omitted
    #[arg(long = "cors-origin", env = "CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    /// Allow credentialed CORS requests (requires explicit origins)
    #[arg(long = "cors-credentials", env = "CORS_CREDENTIALS")]
    pub cors_credentials: bool,

    /// Maximum duration of a single request in seconds
    #[arg(
        long = "request-timeout",
        env = "REQUEST_TIMEOUT_SECS",
        default_value = "30"
    )]
    pub request_timeout_secs: u64,
}

impl MiddlewareConfig {
    /// Returns the CORS layer configuration.
    pub fn cors(&self) -> CorsConfig {
        CorsConfig {
            allowed_origins: self.cors_origins.clone(),
            allow_credentials: self.cors_credentials,
        }
    }

    /// Returns the recovery layer configuration.
    pub fn recovery(&self) -> RecoveryConfig {
        RecoveryConfig {
            request_timeout_secs: self.request_timeout_secs,
        }
    }
}
