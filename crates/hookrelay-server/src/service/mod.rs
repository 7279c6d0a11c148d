//! Service configuration, shared state and the event dispatcher.

mod config;
pub mod dispatch;
mod state;

pub use config::{ServiceConfig, ServiceConfigBuilder};
pub use dispatch::{DeliveryPublisher, EventDispatcher};
pub use state::ServiceState;
