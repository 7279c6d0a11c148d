//! Delivery log model for PostgreSQL database operations.
//!
//! A delivery is one unit of work in the pipeline: an immutable payload
//! snapshot plus the mutable execution state (status, attempt counter,
//! captured response). Rows are created by the dispatcher and only the
//! executor or the retry coordinator advance their status.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::deliveries;
use crate::types::{DeliveryStatus, WebhookEvent};

/// Delivery model representing one delivery (or retry chain) of an event
/// payload to a webhook endpoint.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = deliveries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Delivery {
    /// Unique delivery identifier, also used as the idempotency key.
    pub id: Uuid,
    /// Webhook this delivery belongs to.
    pub webhook_id: Uuid,
    /// Event type that produced this delivery.
    pub event_type: WebhookEvent,
    /// Immutable payload snapshot sent to the endpoint.
    pub payload: serde_json::Value,
    /// Current lifecycle state.
    pub status: DeliveryStatus,
    /// HTTP status code of the most recent attempt.
    pub response_code: Option<i32>,
    /// Truncated response body of the most recent attempt.
    pub response_body: Option<String>,
    /// Failure reason of the most recent attempt.
    pub error_message: Option<String>,
    /// Number of attempts performed so far.
    pub attempt_count: i32,
    /// When the next retry becomes due (only while retrying).
    pub next_attempt_at: Option<Timestamp>,
    /// Latency of the most recent attempt in milliseconds.
    pub response_time_ms: Option<i32>,
    /// Timestamp when this delivery was created.
    pub created_at: Timestamp,
    /// Timestamp when this delivery was last modified.
    pub updated_at: Timestamp,
    /// Timestamp when this delivery reached a terminal state.
    pub completed_at: Option<Timestamp>,
}

/// Data structure for creating a new delivery.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = deliveries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDelivery {
    /// Webhook this delivery belongs to.
    pub webhook_id: Uuid,
    /// Event type that produced this delivery.
    pub event_type: WebhookEvent,
    /// Immutable payload snapshot.
    pub payload: serde_json::Value,
}

impl Delivery {
    /// Returns whether the delivery reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns whether the delivery is waiting for a worker.
    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    /// Returns whether a scheduled retry is due at `now`.
    pub fn is_due(&self, now: jiff::Timestamp) -> bool {
        self.status.is_retrying()
            && self
                .next_attempt_at
                .is_some_and(|due| jiff::Timestamp::from(due) <= now)
    }

    /// Returns whether the attempt budget allows another attempt.
    pub fn has_attempts_left(&self, max_attempts: u32) -> bool {
        (self.attempt_count as u32) < max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_delivery(status: DeliveryStatus) -> Delivery {
        Delivery {
            id: Uuid::now_v7(),
            webhook_id: Uuid::now_v7(),
            event_type: WebhookEvent::PostCreated,
            payload: serde_json::json!({"event": "post.created"}),
            status,
            response_code: None,
            response_body: None,
            error_message: None,
            attempt_count: 0,
            next_attempt_at: None,
            response_time_ms: None,
            created_at: jiff::Timestamp::now().into(),
            updated_at: jiff::Timestamp::now().into(),
            completed_at: None,
        }
    }

    #[test]
    fn test_terminal_detection() {
        assert!(sample_delivery(DeliveryStatus::Success).is_terminal());
        assert!(sample_delivery(DeliveryStatus::Dead).is_terminal());
        assert!(!sample_delivery(DeliveryStatus::Pending).is_terminal());
    }

    #[test]
    fn test_is_due() {
        let now = jiff::Timestamp::now();

        let mut delivery = sample_delivery(DeliveryStatus::Retrying);
        let past = now.checked_sub(jiff::Span::new().seconds(5)).unwrap();
        delivery.next_attempt_at = Some(past.into());
        assert!(delivery.is_due(now));

        let future = now.checked_add(jiff::Span::new().seconds(60)).unwrap();
        delivery.next_attempt_at = Some(future.into());
        assert!(!delivery.is_due(now));

        // A pending delivery is never "due", it is already queued.
        let mut pending = sample_delivery(DeliveryStatus::Pending);
        pending.next_attempt_at = Some(now.into());
        assert!(!pending.is_due(now));
    }

    #[test]
    fn test_attempt_budget() {
        let mut delivery = sample_delivery(DeliveryStatus::Failed);
        delivery.attempt_count = 4;

        assert!(delivery.has_attempts_left(5));
        delivery.attempt_count = 5;
        assert!(!delivery.has_attempts_left(5));
    }
}
