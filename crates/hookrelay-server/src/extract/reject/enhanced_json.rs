//! Enhanced JSON extractor with structured rejections.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::handler::{Error, ErrorKind};

/// JSON extractor/response wrapper with structured error envelopes.
///
/// Deserialization failures map to 422, malformed JSON and missing content
/// types to 400, matching the error taxonomy of the API.
#[derive(Debug, Clone, Copy, Default)]
#[must_use]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(map_rejection(rejection)),
        }
    }
}

fn map_rejection(rejection: JsonRejection) -> Error<'static> {
    match rejection {
        JsonRejection::JsonDataError(err) => ErrorKind::UnprocessableEntity
            .with_message("Request body does not match the expected structure")
            .with_context(err.body_text())
            .into_static(),
        JsonRejection::JsonSyntaxError(err) => ErrorKind::BadRequest
            .with_message("Request body is not valid JSON")
            .with_context(err.body_text())
            .into_static(),
        JsonRejection::MissingJsonContentType(_) => ErrorKind::BadRequest
            .with_message("Expected `application/json` content type")
            .into_static(),
        rejection => {
            tracing::error!(error = %rejection, "Unexpected JSON extraction failure");
            ErrorKind::InternalServerError.into_error()
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

impl<T> aide::OperationInput for Json<T>
where
    axum::Json<T>: aide::OperationInput,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        axum::Json::<T>::operation_input(ctx, operation);
    }
}

impl<T> aide::OperationOutput for Json<T>
where
    axum::Json<T>: aide::OperationOutput,
{
    type Inner = <axum::Json<T> as aide::OperationOutput>::Inner;

    fn operation_response(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Option<aide::openapi::Response> {
        axum::Json::<T>::operation_response(ctx, operation)
    }

    fn inferred_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        axum::Json::<T>::inferred_responses(ctx, operation)
    }
}
