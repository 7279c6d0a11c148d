//! Enhanced path parameter extractor with structured rejections.

use axum::extract::FromRequestParts;
use axum::extract::rejection::PathRejection;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::handler::{Error, ErrorKind};

/// Path parameter extractor with structured error envelopes.
#[derive(Debug, Clone, Copy, Default)]
#[must_use]
pub struct Path<T>(pub T);

impl<S, T> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(map_rejection(rejection)),
        }
    }
}

fn map_rejection(rejection: PathRejection) -> Error<'static> {
    match rejection {
        PathRejection::FailedToDeserializePathParams(err) => ErrorKind::BadRequest
            .with_message("Invalid path parameters")
            .with_context(err.body_text())
            .into_static(),
        PathRejection::MissingPathParams(err) => ErrorKind::BadRequest
            .with_message("Missing required path parameters")
            .with_context(err.body_text())
            .into_static(),
        rejection => {
            tracing::error!(error = %rejection, "Unexpected path extraction failure");
            ErrorKind::InternalServerError.into_error()
        }
    }
}

impl<T> aide::OperationInput for Path<T>
where
    axum::extract::Path<T>: aide::OperationInput,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        axum::extract::Path::<T>::operation_input(ctx, operation);
    }
}
