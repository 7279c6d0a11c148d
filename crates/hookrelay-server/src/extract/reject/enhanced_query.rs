//! Enhanced query string extractor with structured rejections.

use axum::extract::FromRequestParts;
use axum::extract::rejection::QueryRejection;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::handler::{Error, ErrorKind};

/// Query string extractor with structured error envelopes.
#[derive(Debug, Clone, Copy, Default)]
#[must_use]
pub struct Query<T>(pub T);

impl<S, T> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(map_rejection(rejection)),
        }
    }
}

fn map_rejection(rejection: QueryRejection) -> Error<'static> {
    match rejection {
        QueryRejection::FailedToDeserializeQueryString(err) => ErrorKind::BadRequest
            .with_message("Invalid query parameters")
            .with_context(err.body_text())
            .into_static(),
        rejection => {
            tracing::error!(error = %rejection, "Unexpected query extraction failure");
            ErrorKind::InternalServerError.into_error()
        }
    }
}

impl<T> aide::OperationInput for Query<T>
where
    axum::extract::Query<T>: aide::OperationInput,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        axum::extract::Query::<T>::operation_input(ctx, operation);
    }
}
