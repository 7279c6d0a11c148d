//! JSON extractor with automatic validation.

use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use super::Json;
use crate::handler::{Error, ErrorKind};

/// JSON extractor that validates the payload after deserialization.
///
/// Validation failures are rejected with 422 before the handler body runs,
/// so handlers only ever observe valid requests.
#[derive(Debug, Clone, Copy, Default)]
#[must_use]
pub struct ValidateJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;

        value.validate().map_err(|errors| {
            ErrorKind::UnprocessableEntity
                .with_message("Request data failed validation")
                .with_context(errors.to_string())
                .into_static()
        })?;

        Ok(Self(value))
    }
}

impl<T> aide::OperationInput for ValidateJson<T>
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

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, header};
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct CreateThing {
        #[validate(length(min = 1))]
        name: String,
    }

    fn json_request(body: &str) -> Request {
        HttpRequest::builder()
            .method("POST")
            .uri("/things/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_payload_passes() {
        let request = json_request(r#"{"name": "ok"}"#);
        let ValidateJson(value) = ValidateJson::<CreateThing>::from_request(request, &())
            .await
            .unwrap();
        assert_eq!(value.name, "ok");
    }

    #[tokio::test]
    async fn test_invalid_payload_is_rejected_with_422() {
        let request = json_request(r#"{"name": ""}"#);
        let error = ValidateJson::<CreateThing>::from_request(request, &())
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UnprocessableEntity);
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected_with_400() {
        let request = json_request("{not json");
        let error = ValidateJson::<CreateThing>::from_request(request, &())
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
    }
}
