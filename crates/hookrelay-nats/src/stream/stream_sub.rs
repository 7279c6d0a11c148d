//! Concrete JetStream subscriber for serialized messages.

use std::marker::PhantomData;
use std::time::Duration;

use async_nats::jetstream::consumer::pull;
use async_nats::jetstream::{AckKind, Context, Message};
use futures::StreamExt;
use serde::de::DeserializeOwned;

use super::ensure_stream;
use crate::{Error, Result, TRACING_TARGET_STREAM};

/// How long a message may stay unacknowledged before redelivery.
const DEFAULT_ACK_WAIT: Duration = Duration::from_secs(60);

/// Maximum queue-level redeliveries per message.
///
/// Application-level retries are handled by the retry coordinator; this
/// bound only covers workers dying mid-message.
const DEFAULT_MAX_DELIVER: i64 = 3;

/// Subscriber consuming serialized messages from a JetStream stream via a
/// durable pull consumer.
#[derive(Debug)]
pub struct StreamSubscriber<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    jetstream: Context,
    stream_name: String,
    consumer_name: String,
    filter_subject: Option<String>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StreamSubscriber<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    /// Create a new subscriber, ensuring the stream exists.
    pub(crate) async fn new(
        jetstream: &Context,
        stream_name: &str,
        subject: &str,
        consumer_name: &str,
        max_age: Option<Duration>,
    ) -> Result<Self> {
        ensure_stream(jetstream, stream_name, subject, max_age).await?;

        Ok(Self {
            jetstream: jetstream.clone(),
            stream_name: stream_name.to_string(),
            consumer_name: consumer_name.to_string(),
            filter_subject: None,
            _marker: PhantomData,
        })
    }

    /// Restrict the consumer to a filter subject.
    #[must_use]
    pub fn with_filter_subject(mut self, filter_subject: impl Into<String>) -> Self {
        self.filter_subject = Some(filter_subject.into());
        self
    }

    /// Start consuming messages from the stream.
    ///
    /// Creates (or reuses) the durable consumer and returns a typed message
    /// stream. Multiple workers may subscribe with the same consumer name to
    /// share the work queue.
    pub async fn subscribe(&self) -> Result<MessageStream<T>> {
        let consumer_config = pull::Config {
            name: Some(self.consumer_name.clone()),
            durable_name: Some(self.consumer_name.clone()),
            description: Some(format!("Durable consumer for {}", self.stream_name)),
            ack_wait: DEFAULT_ACK_WAIT,
            max_deliver: DEFAULT_MAX_DELIVER,
            filter_subject: self.filter_subject.clone().unwrap_or_default(),
            ..Default::default()
        };

        let stream = self
            .jetstream
            .get_stream(&self.stream_name)
            .await
            .map_err(|e| Error::stream_error(&self.stream_name, e.to_string()))?;

        let consumer = stream
            .get_or_create_consumer(&self.consumer_name, consumer_config)
            .await
            .map_err(|e| Error::consumer_error(&self.consumer_name, e.to_string()))?;

        let messages = consumer
            .messages()
            .await
            .map_err(|e| Error::consumer_error(&self.consumer_name, e.to_string()))?;

        tracing::debug!(
            target: TRACING_TARGET_STREAM,
            stream = %self.stream_name,
            consumer = %self.consumer_name,
            "Subscribed to stream"
        );

        Ok(MessageStream {
            inner: messages,
            _marker: PhantomData,
        })
    }

    /// Returns the consumer name.
    #[inline]
    pub fn consumer_name(&self) -> &str {
        &self.consumer_name
    }
}

/// Stream of typed messages from a durable consumer.
pub struct MessageStream<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    inner: pull::Stream,
    _marker: PhantomData<fn() -> T>,
}

impl<T> MessageStream<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    /// Wait for the next message, returning `Ok(None)` on timeout.
    ///
    /// Messages whose payload fails to deserialize are terminated (acked)
    /// and skipped; redelivering a poison message forever would wedge the
    /// work queue.
    pub async fn next_with_timeout(&mut self, timeout: Duration) -> Result<Option<TypedMessage<T>>> {
        loop {
            let next = match tokio::time::timeout(timeout, self.inner.next()).await {
                Ok(next) => next,
                Err(_) => return Ok(None),
            };

            let message = match next {
                Some(Ok(message)) => message,
                Some(Err(e)) => return Err(Error::operation("stream_next", e.to_string())),
                None => {
                    return Err(Error::operation("stream_next", "message stream ended"));
                }
            };

            match serde_json::from_slice::<T>(&message.payload) {
                Ok(payload) => {
                    return Ok(Some(TypedMessage { message, payload }));
                }
                Err(e) => {
                    tracing::warn!(
                        target: TRACING_TARGET_STREAM,
                        subject = %message.subject,
                        error = %e,
                        "Discarding undecodable message"
                    );
                    if let Err(ack_err) = message.ack_with(AckKind::Term).await {
                        return Err(Error::Ack(ack_err.to_string()));
                    }
                }
            }
        }
    }
}

/// A consumed message with its deserialized payload.
pub struct TypedMessage<T> {
    message: Message,
    payload: T,
}

impl<T> TypedMessage<T> {
    /// Returns the deserialized payload.
    #[inline]
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Consumes the message, returning the payload.
    #[inline]
    pub fn into_payload(self) -> T {
        self.payload
    }

    /// Acknowledge the message, removing it from the work queue.
    pub async fn ack(&mut self) -> Result<()> {
        self.message
            .ack()
            .await
            .map_err(|e| Error::Ack(e.to_string()))
    }

    /// Negatively acknowledge the message, requesting redelivery.
    pub async fn nack(&mut self) -> Result<()> {
        self.message
            .ack_with(AckKind::Nak(None))
            .await
            .map_err(|e| Error::Ack(e.to_string()))
    }

    /// Negatively acknowledge the message, requesting redelivery after a delay.
    pub async fn nack_with_delay(&mut self, delay: Duration) -> Result<()> {
        self.message
            .ack_with(AckKind::Nak(Some(delay)))
            .await
            .map_err(|e| Error::Ack(e.to_string()))
    }
}
