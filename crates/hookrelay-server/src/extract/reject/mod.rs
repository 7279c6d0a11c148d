//! Drop-in replacements for axum extractors with structured rejections.
//!
//! The default axum rejections return plain-text bodies; these wrappers
//! translate every rejection into the handler [`Error`] type so that all
//! error responses share the `{success: false, ...}` envelope.
//!
//! [`Error`]: crate::handler::Error

mod enhanced_json;
mod enhanced_path;
mod enhanced_query;
mod validated_json;

pub use enhanced_json::Json;
pub use enhanced_path::Path;
pub use enhanced_query::Query;
pub use validated_json::ValidateJson;
