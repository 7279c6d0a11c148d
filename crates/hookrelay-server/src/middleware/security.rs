//! Security middleware: CORS.

use axum::Router;
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

/// CORS configuration.
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    /// Allowed origins; empty means any origin.
    pub allowed_origins: Vec<String>,
    /// Whether to allow credentialed requests.
    ///
    /// Only honored together with explicit origins; the CORS specification
    /// forbids credentials with a wildcard origin.
    pub allow_credentials: bool,
}

/// Extension trait applying security layers to a router.
pub trait RouterSecurityExt {
    /// Applies the CORS layer.
    fn with_security(self, cors: CorsConfig) -> Self;
}

impl RouterSecurityExt for Router {
    fn with_security(self, cors: CorsConfig) -> Self {
        let mut layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

        if cors.allowed_origins.is_empty() {
            layer = layer.allow_origin(Any);
        } else {
            let origins: Vec<HeaderValue> = cors
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            layer = layer.allow_origin(origins);

            if cors.allow_credentials {
                layer = layer.allow_credentials(true);
            }
        }

        self.layer(layer)
    }
}
