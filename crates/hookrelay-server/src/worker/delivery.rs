//! Delivery execution worker.
//!
//! Consumes delivery jobs from the work queue, performs the outbound HTTP
//! call and records the outcome on the delivery row. Failures are recorded
//! as data and fed to the retry policy; they never crash the worker.

use std::time::Duration;

use hookrelay_nats::NatsClient;
use hookrelay_postgres::{PgClient, PgConn};
use hookrelay_postgres::model::Delivery;
use hookrelay_postgres::query::{DeliveryRepository, WebhookRepository};
use hookrelay_webhook::{
    DeliveryJob, RetryDecision, RetryPolicy, WebhookContext, WebhookRequest, WebhookService,
};
use jiff::Timestamp;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::Result;

/// Tracing target for delivery worker operations.
const TRACING_TARGET: &str = "hookrelay_server::worker::delivery";

/// Delivery execution worker.
///
/// Multiple workers may run concurrently; they share a durable consumer so
/// the queue distributes jobs between them. Each job is re-validated
/// against the delivery row before execution, making redeliveries
/// idempotent.
pub struct DeliveryWorker {
    pg_client: PgClient,
    nats_client: NatsClient,
    webhook_service: WebhookService,
    retry_policy: RetryPolicy,
}

impl DeliveryWorker {
    /// Creates a new delivery worker.
    pub fn new(
        pg_client: PgClient,
        nats_client: NatsClient,
        webhook_service: WebhookService,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            pg_client,
            nats_client,
            webhook_service,
            retry_policy,
        }
    }

    /// Run the delivery worker until cancelled.
    ///
    /// This method will continuously consume delivery jobs from the queue
    /// and execute them. Logs lifecycle events (start, stop, errors)
    /// internally.
    pub async fn run(&self, cancel: CancellationToken) -> Result<()> {
        tracing::info!(
            target: TRACING_TARGET,
            "Starting delivery worker"
        );

        let result = self.run_inner(cancel).await;

        match &result {
            Ok(()) => {
                tracing::info!(
                    target: TRACING_TARGET,
                    "Delivery worker stopped"
                );
            }
            Err(err) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %err,
                    "Delivery worker failed"
                );
            }
        }

        result
    }

    /// Internal run loop.
    async fn run_inner(&self, cancel: CancellationToken) -> Result<()> {
        let subscriber = self.nats_client.delivery_subscriber::<DeliveryJob>().await?;
        let mut stream = subscriber.subscribe().await?;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(
                        target: TRACING_TARGET,
                        "Delivery worker shutdown requested"
                    );
                    break;
                }
                result = stream.next_with_timeout(Duration::from_secs(5)) => {
                    match result {
                        Ok(Some(mut message)) => {
                            let job = message.payload().clone();

                            if let Err(err) = self.process(&job).await {
                                tracing::error!(
                                    target: TRACING_TARGET,
                                    error = %err,
                                    delivery_id = %job.delivery_id,
                                    webhook_id = %job.webhook_id,
                                    "Failed to process delivery job"
                                );
                                // Nack the message for redelivery
                                if let Err(nack_err) = message.nack().await {
                                    tracing::error!(
                                        target: TRACING_TARGET,
                                        error = %nack_err,
                                        "Failed to nack message"
                                    );
                                }
                            } else {
                                // Ack the processed job
                                if let Err(ack_err) = message.ack().await {
                                    tracing::error!(
                                        target: TRACING_TARGET,
                                        error = %ack_err,
                                        "Failed to ack message"
                                    );
                                }
                            }
                        }
                        Ok(None) => {
                            // Timeout, continue loop
                        }
                        Err(err) => {
                            tracing::error!(
                                target: TRACING_TARGET,
                                error = %err,
                                "Error receiving message from stream"
                            );
                            // Brief pause before retrying
                            tokio::time::sleep(Duration::from_secs(1)).await;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Executes one delivery job.
    ///
    /// Returns `Err` only for infrastructure failures that warrant queue
    /// redelivery; delivery outcomes (success or failure of the endpoint)
    /// are always recorded on the row and return `Ok`.
    async fn process(&self, job: &DeliveryJob) -> Result<()> {
        let mut conn = self.pg_client.get_connection().await?;

        let Some(delivery) = conn.find_delivery_by_id(job.delivery_id).await? else {
            tracing::warn!(
                target: TRACING_TARGET,
                delivery_id = %job.delivery_id,
                "Delivery row missing, dropping job"
            );
            return Ok(());
        };

        if !delivery.is_pending() {
            tracing::debug!(
                target: TRACING_TARGET,
                delivery_id = %delivery.id,
                status = %delivery.status,
                "Delivery already processed, dropping redelivered job"
            );
            return Ok(());
        }

        let Some(webhook) = conn.find_webhook_by_id(delivery.webhook_id).await? else {
            conn.mark_dead(delivery.id, "webhook deleted before delivery")
                .await?;
            return Ok(());
        };

        if !webhook.is_active() {
            conn.mark_dead(delivery.id, "webhook paused before delivery")
                .await?;
            return Ok(());
        }

        let url: Url = match webhook.url.parse() {
            Ok(url) => url,
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    webhook_id = %webhook.id,
                    url = %webhook.url,
                    error = %err,
                    "Webhook has an invalid URL"
                );
                conn.mark_dead(delivery.id, "webhook URL is invalid").await?;
                return Ok(());
            }
        };

        let context: WebhookContext = match serde_json::from_value(delivery.payload.clone()) {
            Ok(context) => context,
            Err(err) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    delivery_id = %delivery.id,
                    error = %err,
                    "Delivery payload is not decodable"
                );
                conn.mark_dead(delivery.id, "delivery payload is not decodable")
                    .await?;
                return Ok(());
            }
        };

        let request = WebhookRequest::new(url, delivery.event_type.to_string(), context)
            .with_request_id(delivery.id)
            .with_secret(webhook.secret.clone())
            .with_headers(webhook.parsed_headers());

        tracing::debug!(
            target: TRACING_TARGET,
            delivery_id = %delivery.id,
            webhook_id = %webhook.id,
            event = %request.event,
            attempt = delivery.attempt_count + 1,
            "Executing delivery"
        );

        match self.webhook_service.deliver(&request).await {
            Ok(response) if response.is_success() => {
                conn.record_attempt_success(
                    delivery.id,
                    response.status_code as i32,
                    response.body.clone(),
                    response.response_time_ms() as i32,
                )
                .await?;

                tracing::info!(
                    target: TRACING_TARGET,
                    delivery_id = %delivery.id,
                    webhook_id = %webhook.id,
                    status_code = response.status_code,
                    "Delivery succeeded"
                );
            }
            Ok(response) => {
                let failed = conn
                    .record_attempt_failure(
                        delivery.id,
                        (response.status_code != 0).then_some(response.status_code as i32),
                        response.body.clone(),
                        response.error.clone(),
                        Some(response.response_time_ms() as i32),
                    )
                    .await?;

                tracing::warn!(
                    target: TRACING_TARGET,
                    delivery_id = %delivery.id,
                    webhook_id = %webhook.id,
                    status_code = response.status_code,
                    "Delivery returned non-success status"
                );

                if let Some(failed) = failed {
                    self.apply_retry_decision(&mut conn, &failed).await?;
                }
            }
            Err(err) => {
                let failed = conn
                    .record_attempt_failure(
                        delivery.id,
                        None,
                        None,
                        Some(err.to_string()),
                        None,
                    )
                    .await?;

                tracing::warn!(
                    target: TRACING_TARGET,
                    delivery_id = %delivery.id,
                    webhook_id = %webhook.id,
                    error = %err,
                    "Delivery failed before a response"
                );

                if let Some(failed) = failed {
                    self.apply_retry_decision(&mut conn, &failed).await?;
                }
            }
        }

        conn.record_webhook_triggered(webhook.id).await?;

        Ok(())
    }

    /// Applies the retry policy to a freshly failed delivery.
    async fn apply_retry_decision(&self, conn: &mut PgConn, failed: &Delivery) -> Result<()> {
        match self.retry_policy.decide(failed.attempt_count as u32) {
            RetryDecision::Retry(backoff) => {
                let due_at = Timestamp::now()
                    .checked_add(jiff::Span::new().seconds(backoff.as_secs() as i64))
                    .unwrap_or_else(|_| Timestamp::MAX);

                conn.schedule_retry(failed.id, due_at).await?;

                tracing::debug!(
                    target: TRACING_TARGET,
                    delivery_id = %failed.id,
                    backoff_secs = backoff.as_secs(),
                    "Retry scheduled"
                );
            }
            RetryDecision::Exhausted => {
                conn.mark_dead(
                    failed.id,
                    format!("retry budget exhausted after {} attempts", failed.attempt_count),
                )
                .await?;

                tracing::warn!(
                    target: TRACING_TARGET,
                    delivery_id = %failed.id,
                    attempts = failed.attempt_count,
                    "Delivery dead, retries exhausted"
                );
            }
        }

        Ok(())
    }
}
