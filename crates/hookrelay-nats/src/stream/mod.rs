//! Typed JetStream work-queue streams.
//!
//! A stream is described by an [`EventStream`] marker type; the generic
//! [`EventPublisher`] and [`EventSubscriber`] pair move serialized messages
//! through it with at-least-once semantics (explicit ack/nack).

mod event_stream;
mod event_pub;
mod event_sub;
mod stream_pub;
mod stream_sub;

use std::time::Duration;

use async_nats::jetstream::{Context, stream};

pub use event_stream::{DeliveryStream, EventStream};
pub use event_pub::EventPublisher;
pub use event_sub::EventSubscriber;
pub use stream_pub::StreamPublisher;
pub use stream_sub::{MessageStream, StreamSubscriber, TypedMessage};

use crate::{Error, Result, TRACING_TARGET_STREAM};

/// Ensures the JetStream stream exists, creating it when missing.
///
/// Streams are created with work-queue retention: each message is removed
/// once a consumer acknowledges it.
pub(crate) async fn ensure_stream(
    jetstream: &Context,
    name: &str,
    subject: &str,
    max_age: Option<Duration>,
) -> Result<()> {
    if jetstream.get_stream(name).await.is_ok() {
        tracing::debug!(
            target: TRACING_TARGET_STREAM,
            stream = %name,
            "Using existing stream"
        );
        return Ok(());
    }

    let stream_config = stream::Config {
        name: name.to_string(),
        description: Some(format!("Work queue stream: {}", name)),
        subjects: vec![format!("{}.>", subject)],
        retention: stream::RetentionPolicy::WorkQueue,
        max_age: max_age.unwrap_or_default(),
        ..Default::default()
    };

    tracing::debug!(
        target: TRACING_TARGET_STREAM,
        stream = %name,
        subject = %subject,
        "Creating new stream"
    );

    jetstream
        .create_stream(stream_config)
        .await
        .map_err(|e| Error::stream_error(name, e.to_string()))?;

    Ok(())
}
