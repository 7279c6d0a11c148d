//! Concrete JetStream publisher for serialized messages.

use std::marker::PhantomData;

use async_nats::jetstream::Context;
use serde::Serialize;

use super::ensure_stream;
use crate::{Error, Result, RetryConfig, TRACING_TARGET_STREAM};

/// Publisher writing serialized messages onto a JetStream stream.
#[derive(Debug, Clone)]
pub struct StreamPublisher<T>
where
    T: Serialize + Send + Sync + 'static,
{
    jetstream: Context,
    stream_name: String,
    retry: RetryConfig,
    _marker: PhantomData<fn(T)>,
}

impl<T> StreamPublisher<T>
where
    T: Serialize + Send + Sync + 'static,
{
    /// Create a new publisher, ensuring the stream exists.
    pub(crate) async fn new(
        jetstream: &Context,
        stream_name: &str,
        subject: &str,
        max_age: Option<std::time::Duration>,
    ) -> Result<Self> {
        ensure_stream(jetstream, stream_name, subject, max_age).await?;

        Ok(Self {
            jetstream: jetstream.clone(),
            stream_name: stream_name.to_string(),
            retry: RetryConfig::default(),
            _marker: PhantomData,
        })
    }

    /// Override the retry configuration used for publish operations.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Publish a message to the given subject.
    ///
    /// Transient publish failures are retried according to the configured
    /// [`RetryConfig`].
    pub async fn publish(&self, subject: &str, message: &T) -> Result<()> {
        let payload = serde_json::to_vec(message)?;
        let payload_size = payload.len();

        self.retry
            .retry(|| {
                let payload = payload.clone();
                async move {
                    self.jetstream
                        .publish(subject.to_string(), payload.into())
                        .await
                        .map_err(|e| Error::delivery_failed(subject, e.to_string()))?
                        .await
                        .map_err(|e| Error::operation("stream_publish", e.to_string()))?;
                    Ok(())
                }
            })
            .await?;

        tracing::debug!(
            target: TRACING_TARGET_STREAM,
            stream = %self.stream_name,
            subject = %subject,
            payload_size,
            "Published message"
        );

        Ok(())
    }

    /// Publish multiple messages to the given subject.
    pub async fn publish_batch(&self, subject: &str, messages: &[T]) -> Result<()> {
        let count = messages.len();
        for message in messages {
            self.publish(subject, message).await?;
        }

        tracing::debug!(
            target: TRACING_TARGET_STREAM,
            stream = %self.stream_name,
            count,
            "Published batch of messages"
        );
        Ok(())
    }

    /// Returns the stream name.
    #[inline]
    pub fn stream_name(&self) -> &str {
        &self.stream_name
    }
}
