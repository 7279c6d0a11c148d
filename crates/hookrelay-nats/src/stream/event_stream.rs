//! Event stream configuration for NATS JetStream.

use std::time::Duration;

/// Marker trait for event streams.
///
/// This trait defines the configuration for a NATS JetStream stream.
pub trait EventStream: Clone + Send + Sync + 'static {
    /// Stream name used in NATS JetStream.
    const NAME: &'static str;

    /// Subject pattern for publishing/subscribing to this stream.
    const SUBJECT: &'static str;

    /// Maximum age for messages in this stream.
    /// Returns `None` for streams where messages should not expire.
    const MAX_AGE: Option<Duration>;

    /// Default consumer name for this stream.
    const CONSUMER_NAME: &'static str;
}

/// Stream for webhook delivery jobs.
///
/// Messages expire after 1 day; a delivery whose job outlives that window
/// is picked back up by the retry coordinator from the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DeliveryStream;

impl EventStream for DeliveryStream {
    const CONSUMER_NAME: &'static str = "delivery-worker";
    const MAX_AGE: Option<Duration> = Some(Duration::from_secs(24 * 60 * 60));
    const NAME: &'static str = "DELIVERIES";
    const SUBJECT: &'static str = "deliveries";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_stream() {
        assert_eq!(DeliveryStream::NAME, "DELIVERIES");
        assert_eq!(DeliveryStream::SUBJECT, "deliveries");
        assert_eq!(
            DeliveryStream::MAX_AGE,
            Some(Duration::from_secs(24 * 60 * 60))
        );
        assert_eq!(DeliveryStream::CONSUMER_NAME, "delivery-worker");
    }
}
