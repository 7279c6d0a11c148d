//! Router middleware extensions.
//!
//! Middleware is grouped into extension traits so the binary can stack the
//! layers explicitly: security (CORS), observability (request ids and trace
//! spans) and recovery (panic catching and request timeouts).

mod observability;
mod recovery;
mod security;

pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{CorsConfig, RouterSecurityExt};
