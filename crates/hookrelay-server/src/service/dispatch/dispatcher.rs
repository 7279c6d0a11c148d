//! Event dispatcher for fanning platform events out to webhooks.

use hookrelay_nats::stream::{DeliveryStream, EventPublisher};
use hookrelay_postgres::PgClient;
use hookrelay_postgres::model::NewDelivery;
use hookrelay_postgres::query::{DeliveryRepository, WebhookRepository};
use hookrelay_postgres::types::WebhookEvent;
use hookrelay_webhook::{DeliveryJob, WebhookContext};
use uuid::Uuid;

use crate::{Error, Result};

/// Type alias for the delivery work-queue publisher.
pub type DeliveryPublisher = EventPublisher<DeliveryJob, DeliveryStream>;

/// Tracing target for event dispatch.
const TRACING_TARGET: &str = "hookrelay_server::service::dispatch";

/// Event dispatcher fanning platform events out to subscribed webhooks.
///
/// For each active webhook of the tenant subscribed to the event, the
/// dispatcher creates a `pending` delivery row carrying the immutable
/// payload snapshot and publishes a [`DeliveryJob`] onto the work queue
/// for asynchronous execution.
#[derive(Clone)]
pub struct EventDispatcher {
    pg_client: PgClient,
    publisher: DeliveryPublisher,
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher").finish_non_exhaustive()
    }
}

impl EventDispatcher {
    /// Creates a new dispatcher.
    pub fn new(pg_client: PgClient, publisher: DeliveryPublisher) -> Self {
        Self {
            pg_client,
            publisher,
        }
    }

    /// Dispatches a platform event to all matching webhooks of a tenant.
    ///
    /// Returns the number of deliveries created. Webhooks that are paused,
    /// disabled or deleted never match; dispatch after a pause therefore
    /// creates no new deliveries for that webhook.
    #[tracing::instrument(
        skip(self, metadata),
        fields(tenant_id = %tenant_id, event = %event, resource_id = %resource_id)
    )]
    pub async fn dispatch(
        &self,
        tenant_id: Uuid,
        event: WebhookEvent,
        resource_id: Uuid,
        triggered_by: Option<Uuid>,
        metadata: Option<serde_json::Value>,
    ) -> Result<usize> {
        let mut conn = self.pg_client.get_connection().await?;
        let webhooks = conn.find_webhooks_for_event(tenant_id, event).await?;

        if webhooks.is_empty() {
            tracing::debug!(
                target: TRACING_TARGET,
                "No webhooks subscribed to event"
            );
            return Ok(0);
        }

        tracing::debug!(
            target: TRACING_TARGET,
            webhook_count = webhooks.len(),
            "Found webhooks subscribed to event"
        );

        let mut dispatched = 0usize;

        for webhook in webhooks {
            let mut context = WebhookContext::new(webhook.id, tenant_id, resource_id)
                .with_resource_type(event.category());

            if let Some(account_id) = triggered_by {
                context = context.with_account(account_id);
            }

            if let Some(ref metadata) = metadata {
                context = context.with_metadata(metadata.clone());
            }

            let payload = serde_json::to_value(&context).map_err(|e| {
                Error::internal("dispatch", "Failed to serialize delivery payload").with_source(e)
            })?;

            let delivery = conn
                .create_delivery(NewDelivery {
                    webhook_id: webhook.id,
                    event_type: event,
                    payload,
                })
                .await?;

            let job = DeliveryJob::new(delivery.id, webhook.id, tenant_id);
            self.enqueue(&job).await?;
            dispatched += 1;
        }

        tracing::info!(
            target: TRACING_TARGET,
            dispatched,
            "Published delivery jobs"
        );

        Ok(dispatched)
    }

    /// Publishes an already-created delivery onto the work queue.
    ///
    /// Used for manual retries and by the retry coordinator.
    pub async fn enqueue(&self, job: &DeliveryJob) -> Result<()> {
        self.publisher.publish_to(&job.subject(), job).await?;
        Ok(())
    }
}
