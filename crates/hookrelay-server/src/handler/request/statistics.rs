//! Statistics window request types.

use jiff::Timestamp;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::handler::{ErrorKind, Result};

/// Default statistics window when no period is given.
const DEFAULT_PERIOD_HOURS: u64 = 30 * 24;

/// Maximum supported statistics window: one year.
const MAX_PERIOD_HOURS: u64 = 365 * 24;

/// Query parameters for webhook statistics.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsParams {
    /// Trailing window, e.g. `30d` or `12h`. Defaults to `30d`.
    pub period: Option<String>,
}

impl StatisticsParams {
    /// Resolves the start of the statistics window relative to `now`.
    pub fn since(&self, now: Timestamp) -> Result<Timestamp> {
        let hours = match self.period.as_deref() {
            None => DEFAULT_PERIOD_HOURS,
            Some(period) => parse_period_hours(period).ok_or_else(|| {
                ErrorKind::BadRequest
                    .with_message("Invalid period; expected formats like `30d` or `12h`")
                    .into_static()
            })?,
        };

        let hours = hours.min(MAX_PERIOD_HOURS);
        now.checked_sub(jiff::Span::new().hours(hours as i64))
            .map_err(|_| {
                ErrorKind::BadRequest
                    .with_message("Period is out of range")
                    .into_static()
            })
    }
}

/// Parses a `{N}d` / `{N}h` period into hours.
fn parse_period_hours(period: &str) -> Option<u64> {
    let period = period.trim();
    let (digits, unit) = period.split_at(period.len().checked_sub(1)?);
    let count: u64 = digits.parse().ok()?;

    if count == 0 {
        return None;
    }

    match unit {
        "d" => count.checked_mul(24),
        "h" => Some(count),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_period_hours() {
        assert_eq!(parse_period_hours("30d"), Some(720));
        assert_eq!(parse_period_hours("7d"), Some(168));
        assert_eq!(parse_period_hours("12h"), Some(12));
        assert_eq!(parse_period_hours(" 1d "), Some(24));

        assert_eq!(parse_period_hours("0d"), None);
        assert_eq!(parse_period_hours("30"), None);
        assert_eq!(parse_period_hours("d"), None);
        assert_eq!(parse_period_hours("-3d"), None);
        assert_eq!(parse_period_hours(""), None);
        assert_eq!(parse_period_hours("30w"), None);
    }

    #[test]
    fn test_since_defaults_to_thirty_days() {
        let now = Timestamp::now();
        let params = StatisticsParams::default();

        let since = params.since(now).unwrap();
        let expected = now.checked_sub(jiff::Span::new().hours(720)).unwrap();
        assert_eq!(since, expected);
    }

    #[test]
    fn test_since_rejects_garbage() {
        let params = StatisticsParams {
            period: Some("yesterday".into()),
        };
        assert!(params.since(Timestamp::now()).is_err());
    }

    #[test]
    fn test_since_caps_the_window() {
        let now = Timestamp::now();
        let params = StatisticsParams {
            period: Some("9999d".into()),
        };

        let since = params.since(now).unwrap();
        let expected = now
            .checked_sub(jiff::Span::new().hours(MAX_PERIOD_HOURS as i64))
            .unwrap();
        assert_eq!(since, expected);
    }
}
