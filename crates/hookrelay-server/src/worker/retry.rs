//! Retry coordinator.
//!
//! Periodically sweeps deliveries whose scheduled retry is due and moves
//! them back onto the work queue. A due retry whose webhook was paused or
//! deleted in the meantime is cancelled and marked dead with a reason.

use std::time::Duration;

use hookrelay_postgres::PgClient;
use hookrelay_postgres::query::{DeliveryRepository, WebhookRepository};
use hookrelay_webhook::DeliveryJob;
use jiff::Timestamp;
use tokio_util::sync::CancellationToken;

use crate::Result;
use crate::service::EventDispatcher;

/// Tracing target for retry coordination.
const TRACING_TARGET: &str = "hookrelay_server::worker::retry";

/// Maximum due retries handled per sweep.
const SWEEP_BATCH_LIMIT: i64 = 100;

/// Retry coordinator sweeping due retries back into the work queue.
pub struct RetryCoordinator {
    pg_client: PgClient,
    dispatcher: EventDispatcher,
    poll_interval: Duration,
}

impl RetryCoordinator {
    /// Creates a new retry coordinator.
    pub fn new(pg_client: PgClient, dispatcher: EventDispatcher, poll_interval: Duration) -> Self {
        Self {
            pg_client,
            dispatcher,
            poll_interval,
        }
    }

    /// Run the coordinator until cancelled.
    ///
    /// Sweep failures are logged and retried on the next tick; the
    /// coordinator never gives up on transient infrastructure errors.
    pub async fn run(&self, cancel: CancellationToken) -> Result<()> {
        tracing::info!(
            target: TRACING_TARGET,
            poll_interval_secs = self.poll_interval.as_secs(),
            "Starting retry coordinator"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(
                        target: TRACING_TARGET,
                        "Retry coordinator shutdown requested"
                    );
                    break;
                }
                _ = tokio::time::sleep(self.poll_interval) => {
                    match self.sweep().await {
                        Ok(0) => {}
                        Ok(requeued) => {
                            tracing::info!(
                                target: TRACING_TARGET,
                                requeued,
                                "Requeued due retries"
                            );
                        }
                        Err(err) => {
                            tracing::error!(
                                target: TRACING_TARGET,
                                error = %err,
                                "Retry sweep failed"
                            );
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Sweeps one batch of due retries.
    ///
    /// Returns the number of deliveries put back onto the work queue.
    pub async fn sweep(&self) -> Result<usize> {
        let mut conn = self.pg_client.get_connection().await?;

        let due = conn
            .list_due_retries(Timestamp::now(), SWEEP_BATCH_LIMIT)
            .await?;

        if due.is_empty() {
            return Ok(0);
        }

        tracing::debug!(
            target: TRACING_TARGET,
            due_count = due.len(),
            "Found due retries"
        );

        let mut requeued = 0usize;

        for delivery in due {
            let webhook = conn.find_webhook_by_id(delivery.webhook_id).await?;

            let webhook = match webhook {
                None => {
                    conn.mark_dead(delivery.id, "webhook deleted before scheduled retry")
                        .await?;
                    continue;
                }
                Some(webhook) if !webhook.is_active() => {
                    conn.mark_dead(delivery.id, "webhook paused before scheduled retry")
                        .await?;
                    continue;
                }
                Some(webhook) => webhook,
            };

            // Guarded transition; a concurrent writer may have moved the row.
            let Some(requeued_delivery) = conn.requeue_retry(delivery.id).await? else {
                continue;
            };

            let job = DeliveryJob::new(
                requeued_delivery.id,
                webhook.id,
                webhook.tenant_id,
            );
            self.dispatcher.enqueue(&job).await?;
            requeued += 1;
        }

        Ok(requeued)
    }
}
