//! Retry policy for failed webhook deliveries.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default maximum number of delivery attempts per delivery.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default base backoff between attempts: 30 seconds.
pub const DEFAULT_BASE_BACKOFF_SECS: u64 = 30;

/// Default backoff cap: 1 hour.
pub const DEFAULT_MAX_BACKOFF_SECS: u64 = 3600;

/// Outcome of consulting the retry policy after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Schedule another attempt after the given backoff.
    Retry(Duration),
    /// The retry budget is exhausted; the delivery is dead.
    Exhausted,
}

impl RetryDecision {
    /// Returns the backoff duration when another attempt is scheduled.
    pub fn backoff(&self) -> Option<Duration> {
        match self {
            Self::Retry(backoff) => Some(*backoff),
            Self::Exhausted => None,
        }
    }
}

/// Exponential backoff policy bounding delivery attempts.
///
/// The backoff before attempt `n + 1` is `base * 2^n`, capped at `max_backoff`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of attempts per delivery (including the first).
    pub max_attempts: u32,
    /// Base backoff duration in seconds.
    pub base_backoff_secs: u64,
    /// Maximum backoff duration in seconds.
    pub max_backoff_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff_secs: DEFAULT_BASE_BACKOFF_SECS,
            max_backoff_secs: DEFAULT_MAX_BACKOFF_SECS,
        }
    }
}

impl RetryPolicy {
    /// Creates a new policy.
    pub fn new(max_attempts: u32, base_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_backoff_secs: base_backoff.as_secs(),
            max_backoff_secs: max_backoff.as_secs(),
        }
    }

    /// Calculates the backoff before the attempt following `completed_attempts`.
    pub fn backoff(&self, completed_attempts: u32) -> Duration {
        let exponent = completed_attempts.min(31);
        let backoff_secs = self
            .base_backoff_secs
            .saturating_mul(1u64 << exponent)
            .min(self.max_backoff_secs);
        Duration::from_secs(backoff_secs)
    }

    /// Decides whether a delivery with `attempt_count` completed attempts
    /// should be retried.
    pub fn decide(&self, attempt_count: u32) -> RetryDecision {
        if attempt_count < self.max_attempts {
            RetryDecision::Retry(self.backoff(attempt_count))
        } else {
            RetryDecision::Exhausted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::new(
            5,
            Duration::from_secs(30),
            Duration::from_secs(3600),
        );

        assert_eq!(policy.backoff(0), Duration::from_secs(30));
        assert_eq!(policy.backoff(1), Duration::from_secs(60));
        assert_eq!(policy.backoff(2), Duration::from_secs(120));
        assert_eq!(policy.backoff(3), Duration::from_secs(240));
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy::new(
            10,
            Duration::from_secs(30),
            Duration::from_secs(300),
        );

        assert_eq!(policy.backoff(5), Duration::from_secs(300));
        assert_eq!(policy.backoff(30), Duration::from_secs(300));
        // Large attempt counts must not overflow.
        assert_eq!(policy.backoff(u32::MAX), Duration::from_secs(300));
    }

    #[test]
    fn test_decide_retries_until_exhausted() {
        let policy = RetryPolicy::new(3, Duration::from_secs(1), Duration::from_secs(60));

        assert_eq!(
            policy.decide(1),
            RetryDecision::Retry(Duration::from_secs(2))
        );
        assert_eq!(
            policy.decide(2),
            RetryDecision::Retry(Duration::from_secs(4))
        );
        assert_eq!(policy.decide(3), RetryDecision::Exhausted);
        assert_eq!(policy.decide(4), RetryDecision::Exhausted);
    }

    #[test]
    fn test_max_attempts_floor() {
        let policy = RetryPolicy::new(0, Duration::from_secs(1), Duration::from_secs(60));
        assert_eq!(policy.max_attempts, 1);
    }

    #[test]
    fn test_decision_backoff_accessor() {
        assert_eq!(
            RetryDecision::Retry(Duration::from_secs(5)).backoff(),
            Some(Duration::from_secs(5))
        );
        assert_eq!(RetryDecision::Exhausted.backoff(), None);
    }
}
