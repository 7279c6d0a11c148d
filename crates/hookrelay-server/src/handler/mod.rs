//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! Routes are registered through `aide`'s [`ApiRouter`] so that every
//! endpoint is part of the generated OpenAPI document.
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod deliveries;
mod error;
mod events;
mod monitors;
pub mod request;
pub mod response;
mod webhooks;

use aide::axum::ApiRouter;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::response::{ApiResponse, ErrorResponse};
use crate::service::ServiceState;

#[inline]
async fn fallback() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns an [`ApiRouter`] with all routes.
pub fn routes() -> ApiRouter<ServiceState> {
    ApiRouter::new()
        .merge(webhooks::routes())
        .merge(deliveries::routes())
        .merge(events::routes())
        .merge(monitors::routes())
        .fallback(fallback)
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use axum_test::TestServer;

    use super::*;

    #[test]
    fn routes_assemble() {
        // Route registration panics on conflicting paths; building the full
        // router exercises every api_route declaration.
        let _ = routes();
    }

    #[tokio::test]
    async fn error_envelope_over_the_wire() -> anyhow::Result<()> {
        let app = axum::Router::new().fallback(fallback);
        let server = TestServer::new(app)?;

        let response = server.get("/missing/").await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["name"], "not_found");
        assert!(body["message"].is_string());

        Ok(())
    }
}
