//! Application state and dependency injection.

use hookrelay_nats::NatsClient;
use hookrelay_postgres::PgClient;
use hookrelay_webhook::WebhookService;

use crate::service::{EventDispatcher, ServiceConfig};
use crate::Result;

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    pg_client: PgClient,
    nats_client: NatsClient,
    webhook_service: WebhookService,
    dispatcher: EventDispatcher,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Connects to all external services and loads required resources.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        let pg_client = config.connect_postgres().await?;
        let nats_client = config.connect_nats().await?;
        let publisher = nats_client.delivery_publisher().await?;
        let webhook_service = config.create_webhook_service();
        let dispatcher = EventDispatcher::new(pg_client.clone(), publisher);

        Ok(Self {
            pg_client,
            nats_client,
            webhook_service,
            dispatcher,
        })
    }

    /// Creates state from already-connected components.
    ///
    /// Used by the binary to share clients between the HTTP server and the
    /// background workers, and by tests to inject mock services.
    pub fn from_parts(
        pg_client: PgClient,
        nats_client: NatsClient,
        webhook_service: WebhookService,
        dispatcher: EventDispatcher,
    ) -> Self {
        Self {
            pg_client,
            nats_client,
            webhook_service,
            dispatcher,
        }
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+ $(,)?) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(pg_client: PgClient);
impl_di!(nats_client: NatsClient);
impl_di!(webhook_service: WebhookService);
impl_di!(dispatcher: EventDispatcher);
