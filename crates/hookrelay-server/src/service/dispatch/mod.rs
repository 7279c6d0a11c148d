//! Event dispatch onto the delivery pipeline.
//!
//! The dispatcher turns one platform event into zero or more delivery rows
//! plus work-queue jobs, without ever blocking on delivery execution.

mod dispatcher;

pub use dispatcher::{DeliveryPublisher, EventDispatcher};
