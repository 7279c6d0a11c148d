//! Observability middleware: request ids and trace spans.

use axum::Router;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

/// Extension trait applying observability layers to a router.
pub trait RouterObservabilityExt {
    /// Applies request-id generation/propagation and HTTP trace spans.
    fn with_observability(self) -> Self;
}

impl RouterObservabilityExt for Router {
    fn with_observability(self) -> Self {
        // Layers added later wrap earlier ones, so the request id is set
        // before the trace span observes the request.
        self.layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }
}
