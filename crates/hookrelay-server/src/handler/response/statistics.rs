//! Webhook statistics response types.

use hookrelay_postgres::query::DeliveryStatistics;
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Aggregated delivery statistics for a webhook over a trailing window.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookStatistics {
    /// Start of the aggregation window.
    pub period_start: Timestamp,
    /// End of the aggregation window.
    pub period_end: Timestamp,
    /// Total number of deliveries in the window.
    pub total: i64,
    /// Deliveries waiting for a worker.
    pub pending: i64,
    /// Deliveries acknowledged with a 2xx response.
    pub successes: i64,
    /// Deliveries whose last attempt failed, awaiting a retry decision.
    pub failed: i64,
    /// Deliveries with a scheduled retry.
    pub retrying: i64,
    /// Deliveries that exhausted their retry budget or were cancelled.
    pub dead: i64,
    /// Success rate over finished deliveries: `successes / (successes + dead)`.
    pub success_rate: f64,
    /// Average latency of successful attempts in milliseconds.
    pub average_response_ms: Option<f64>,
}

impl WebhookStatistics {
    /// Creates a statistics response from repository aggregates.
    pub fn from_statistics(
        statistics: DeliveryStatistics,
        period_start: Timestamp,
        period_end: Timestamp,
    ) -> Self {
        Self {
            period_start,
            period_end,
            total: statistics.total(),
            pending: statistics.pending,
            successes: statistics.successes,
            failed: statistics.failed,
            retrying: statistics.retrying,
            dead: statistics.dead,
            success_rate: statistics.success_rate(),
            average_response_ms: statistics.average_response_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_statistics() {
        let statistics = DeliveryStatistics {
            successes: 7,
            dead: 3,
            pending: 1,
            ..Default::default()
        };

        let now = Timestamp::now();
        let since = now.checked_sub(jiff::Span::new().hours(24)).unwrap();
        let response = WebhookStatistics::from_statistics(statistics, since, now);

        assert_eq!(response.total, 11);
        assert!((response.success_rate - 0.7).abs() < f64::EPSILON);
        assert_eq!(response.period_start, since);
        assert_eq!(response.period_end, now);
    }
}
