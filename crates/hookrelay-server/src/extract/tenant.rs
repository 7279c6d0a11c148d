//! Request-scoped tenant context extraction.
//!
//! The service is multi-tenant; every API operation is scoped to a tenant
//! and the acting account. The context is passed explicitly through
//! headers rather than read from ambient state, so handlers and services
//! receive it as a plain value.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::handler::{Error, ErrorKind};

/// Header carrying the tenant identifier.
pub const TENANT_ID_HEADER: &str = "x-tenant-id";

/// Header carrying the acting account identifier.
pub const ACCOUNT_ID_HEADER: &str = "x-account-id";

/// Explicit tenant scope for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantContext {
    /// The tenant all queries are scoped to.
    pub tenant_id: Uuid,
    /// The account performing the request.
    pub account_id: Uuid,
}

impl TenantContext {
    /// Creates a new context.
    pub fn new(tenant_id: Uuid, account_id: Uuid) -> Self {
        Self {
            tenant_id,
            account_id,
        }
    }
}

fn parse_header(parts: &Parts, name: &'static str) -> Result<Uuid, Error<'static>> {
    let Some(value) = parts.headers.get(name) else {
        return Err(ErrorKind::MissingTenantContext
            .with_message(format!("Missing required header: {name}"))
            .into_static());
    };

    let value = value.to_str().map_err(|_| {
        ErrorKind::MissingTenantContext
            .with_message(format!("Header {name} contains invalid characters"))
            .into_static()
    })?;

    Uuid::parse_str(value).map_err(|_| {
        ErrorKind::MissingTenantContext
            .with_message(format!("Header {name} is not a valid UUID"))
            .into_static()
    })
}

impl<S> FromRequestParts<S> for TenantContext
where
    S: Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tenant_id = parse_header(parts, TENANT_ID_HEADER)?;
        let account_id = parse_header(parts, ACCOUNT_ID_HEADER)?;

        Ok(Self {
            tenant_id,
            account_id,
        })
    }
}

impl aide::OperationInput for TenantContext {}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts_with_headers(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/webhooks/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn test_extracts_valid_context() {
        let tenant_id = Uuid::now_v7();
        let account_id = Uuid::now_v7();
        let parts = parts_with_headers(&[
            (TENANT_ID_HEADER, &tenant_id.to_string()),
            (ACCOUNT_ID_HEADER, &account_id.to_string()),
        ]);

        let context = TenantContext::from_request_parts(&mut parts.clone(), &())
            .await
            .unwrap();
        assert_eq!(context.tenant_id, tenant_id);
        assert_eq!(context.account_id, account_id);
    }

    #[tokio::test]
    async fn test_missing_header_is_rejected() {
        let parts = parts_with_headers(&[]);
        let result = TenantContext::from_request_parts(&mut parts.clone(), &()).await;

        let error = result.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MissingTenantContext);
    }

    #[tokio::test]
    async fn test_malformed_uuid_is_rejected() {
        let parts = parts_with_headers(&[
            (TENANT_ID_HEADER, "not-a-uuid"),
            (ACCOUNT_ID_HEADER, &Uuid::now_v7().to_string()),
        ]);
        let result = TenantContext::from_request_parts(&mut parts.clone(), &()).await;

        let error = result.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MissingTenantContext);
        assert!(error.message().unwrap().contains("not a valid UUID"));
    }
}
