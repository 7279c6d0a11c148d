//! Health check response types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Aggregated health of the service's dependencies.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// Whether every dependency is reachable.
    pub healthy: bool,
    /// PostgreSQL connectivity.
    pub postgres: ComponentHealth,
    /// NATS connectivity.
    pub nats: ComponentHealth,
}

/// Health of a single dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ComponentHealth {
    /// The dependency responded.
    Healthy,
    /// The dependency did not respond.
    Unhealthy,
}

impl ComponentHealth {
    /// Creates component health from a check outcome.
    pub fn from_result<T, E>(result: &Result<T, E>) -> Self {
        if result.is_ok() {
            Self::Healthy
        } else {
            Self::Unhealthy
        }
    }

    /// Returns whether the component is healthy.
    pub fn is_healthy(self) -> bool {
        matches!(self, Self::Healthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_health_from_result() {
        let ok: Result<(), &str> = Ok(());
        let err: Result<(), &str> = Err("down");

        assert!(ComponentHealth::from_result(&ok).is_healthy());
        assert!(!ComponentHealth::from_result(&err).is_healthy());
    }
}
