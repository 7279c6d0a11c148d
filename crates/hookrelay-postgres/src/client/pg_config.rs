//! PostgreSQL connection configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Default maximum number of pooled connections.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default timeout when waiting for a pooled connection, in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Configuration for PostgreSQL connections with sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct PgConfig {
    /// Postgres connection string
    #[cfg_attr(
        feature = "config",
        arg(long = "postgres-url", env = "DATABASE_URL")
    )]
    pub database_url: String,

    /// Maximum number of connections in the pool
    #[cfg_attr(
        feature = "config",
        arg(
            long = "postgres-max-connections",
            env = "POSTGRES_MAX_CONNECTIONS",
            default_value = "10"
        )
    )]
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Timeout when acquiring a connection, in seconds
    #[cfg_attr(
        feature = "config",
        arg(
            long = "postgres-connect-timeout",
            env = "POSTGRES_CONNECT_TIMEOUT_SECS",
            default_value = "30"
        )
    )]
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

impl PgConfig {
    /// Create a new configuration for the given connection string.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }

    /// Returns the connection acquisition timeout as a Duration.
    #[inline]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Returns the effective pool size, using the default when zero.
    pub fn effective_max_connections(&self) -> usize {
        if self.max_connections == 0 {
            DEFAULT_MAX_CONNECTIONS as usize
        } else {
            self.max_connections as usize
        }
    }

    /// Set the maximum pool size.
    #[must_use]
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config_defaults() {
        let config = PgConfig::new("postgresql://localhost/hookrelay");
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.connect_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_zero_pool_size_falls_back_to_default() {
        let config = PgConfig::new("postgresql://localhost/hookrelay").with_max_connections(0);
        assert_eq!(
            config.effective_max_connections(),
            DEFAULT_MAX_CONNECTIONS as usize
        );
    }
}
