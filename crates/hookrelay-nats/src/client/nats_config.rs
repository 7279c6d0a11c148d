//! NATS connection configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

// Default values
const DEFAULT_NAME: &str = "hookrelay-nats";
const DEFAULT_MAX_RECONNECTS: usize = 10;
const DEFAULT_RECONNECT_DELAY_SECS: u64 = 2;
const DEFAULT_PING_INTERVAL_SECS: u64 = 30;

/// Configuration for NATS connections with sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct NatsConfig {
    /// NATS server URL (comma-separated for clustering)
    #[cfg_attr(feature = "config", arg(long = "nats-url", env = "NATS_URL"))]
    pub nats_url: String,

    /// Authentication token
    #[cfg_attr(
        feature = "config",
        arg(long = "nats-token", env = "NATS_TOKEN", default_value = "")
    )]
    pub nats_token: String,

    /// Client connection name for debugging and monitoring
    #[cfg_attr(
        feature = "config",
        arg(long = "nats-client-name", env = "NATS_CLIENT_NAME")
    )]
    pub nats_client_name: Option<String>,

    /// Connection timeout in seconds (optional)
    #[cfg_attr(
        feature = "config",
        arg(long = "nats-connect-timeout", env = "NATS_CONNECT_TIMEOUT_SECS")
    )]
    pub nats_connect_timeout: Option<u64>,

    /// Maximum number of reconnection attempts (0 = unlimited)
    #[cfg_attr(
        feature = "config",
        arg(long = "nats-max-reconnects", env = "NATS_MAX_RECONNECTS")
    )]
    pub nats_max_reconnects: Option<usize>,
}

impl NatsConfig {
    /// Create a new configuration with a single server URL and token.
    pub fn new(server_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            nats_url: server_url.into(),
            nats_token: token.into(),
            nats_client_name: None,
            nats_connect_timeout: None,
            nats_max_reconnects: None,
        }
    }

    /// Returns the client name, using the default if not set.
    #[inline]
    pub fn name(&self) -> &str {
        self.nats_client_name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    /// Returns the server URLs as a vector (splits comma-separated URLs).
    pub fn servers(&self) -> Vec<&str> {
        self.nats_url.split(',').map(str::trim).collect()
    }

    /// Returns the connection timeout as a Duration, if set.
    #[inline]
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.nats_connect_timeout.map(Duration::from_secs)
    }

    /// Returns the maximum reconnect attempts, `None` meaning unlimited.
    pub fn max_reconnects_option(&self) -> Option<usize> {
        match self.nats_max_reconnects {
            Some(0) => None,
            Some(n) => Some(n),
            None => Some(DEFAULT_MAX_RECONNECTS),
        }
    }

    /// Returns the base delay between reconnection attempts.
    #[inline]
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(DEFAULT_RECONNECT_DELAY_SECS)
    }

    /// Returns the interval between keep-alive pings.
    #[inline]
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(DEFAULT_PING_INTERVAL_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config() {
        let config = NatsConfig::new("nats://127.0.0.1:4222", "token");
        assert_eq!(config.nats_url, "nats://127.0.0.1:4222");
        assert_eq!(config.name(), DEFAULT_NAME);
        assert!(config.connect_timeout().is_none());
    }

    #[test]
    fn test_servers_splits_comma_separated() {
        let config = NatsConfig::new("nats://a:4222, nats://b:4222", "");
        assert_eq!(config.servers(), vec!["nats://a:4222", "nats://b:4222"]);
    }

    #[test]
    fn test_max_reconnects_zero_means_unlimited() {
        let mut config = NatsConfig::new("nats://127.0.0.1:4222", "");
        config.nats_max_reconnects = Some(0);
        assert_eq!(config.max_reconnects_option(), None);

        config.nats_max_reconnects = Some(7);
        assert_eq!(config.max_reconnects_option(), Some(7));

        config.nats_max_reconnects = None;
        assert_eq!(config.max_reconnects_option(), Some(DEFAULT_MAX_RECONNECTS));
    }
}
