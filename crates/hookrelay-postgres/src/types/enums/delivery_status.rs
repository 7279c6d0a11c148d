//! Delivery status enumeration for the delivery state machine.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Defines the lifecycle state of a single delivery.
///
/// This enumeration corresponds to the `DELIVERY_STATUS` PostgreSQL enum.
/// Allowed transitions: `pending → success | failed`,
/// `failed → retrying | dead`, `retrying → pending | dead`.
/// Cancellation (webhook paused or deleted) may terminate a `pending`
/// delivery directly to `dead`. `success` and `dead` are terminal.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::DeliveryStatus"]
pub enum DeliveryStatus {
    /// Delivery is queued and waiting for a worker
    #[db_rename = "pending"]
    #[serde(rename = "pending")]
    #[strum(serialize = "pending")]
    #[default]
    Pending,

    /// The endpoint acknowledged the delivery with a 2xx response
    #[db_rename = "success"]
    #[serde(rename = "success")]
    #[strum(serialize = "success")]
    Success,

    /// The last attempt failed; a retry decision has not been applied yet
    #[db_rename = "failed"]
    #[serde(rename = "failed")]
    #[strum(serialize = "failed")]
    Failed,

    /// A retry is scheduled for a later point in time
    #[db_rename = "retrying"]
    #[serde(rename = "retrying")]
    #[strum(serialize = "retrying")]
    Retrying,

    /// The retry budget is exhausted or the delivery was cancelled
    #[db_rename = "dead"]
    #[serde(rename = "dead")]
    #[strum(serialize = "dead")]
    Dead,
}

impl DeliveryStatus {
    /// Returns whether this is a terminal state.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, DeliveryStatus::Success | DeliveryStatus::Dead)
    }

    /// Returns whether the delivery is waiting for a worker.
    #[inline]
    pub fn is_pending(self) -> bool {
        matches!(self, DeliveryStatus::Pending)
    }

    /// Returns whether a retry is scheduled.
    #[inline]
    pub fn is_retrying(self) -> bool {
        matches!(self, DeliveryStatus::Retrying)
    }

    /// Returns whether a manual retry may be issued for this state.
    ///
    /// Manual retries are limited to deliveries the pipeline will no longer
    /// touch on its own.
    #[inline]
    pub fn is_manually_retryable(self) -> bool {
        matches!(self, DeliveryStatus::Failed | DeliveryStatus::Dead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(DeliveryStatus::Success.is_terminal());
        assert!(DeliveryStatus::Dead.is_terminal());

        assert!(!DeliveryStatus::Pending.is_terminal());
        assert!(!DeliveryStatus::Failed.is_terminal());
        assert!(!DeliveryStatus::Retrying.is_terminal());
    }

    #[test]
    fn test_manual_retry_states() {
        assert!(DeliveryStatus::Dead.is_manually_retryable());
        assert!(DeliveryStatus::Failed.is_manually_retryable());

        assert!(!DeliveryStatus::Pending.is_manually_retryable());
        assert!(!DeliveryStatus::Retrying.is_manually_retryable());
        assert!(!DeliveryStatus::Success.is_manually_retryable());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(DeliveryStatus::Pending.to_string(), "pending");
        assert_eq!(DeliveryStatus::Dead.to_string(), "dead");

        let decoded: DeliveryStatus = serde_json::from_str("\"retrying\"").unwrap();
        assert_eq!(decoded, DeliveryStatus::Retrying);
    }
}
