//! Uniform success envelope for API responses.

use schemars::JsonSchema;
use serde::Serialize;

/// Standard response envelope: `{success, data?, message?}`.
///
/// Every successful endpoint wraps its payload in this envelope; errors are
/// produced by [`ErrorResponse`] with `success: false`.
///
/// [`ErrorResponse`]: crate::handler::response::ErrorResponse
#[must_use]
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ApiResponse<T> {
    /// Always `true` for successful responses.
    pub success: bool,
    /// The response payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Optional human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Creates a successful response with data.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Creates a successful response with data and a message.
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    /// Creates a successful, data-free response with a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope() {
        let response = ApiResponse::ok(42);
        let encoded = serde_json::to_value(&response).unwrap();

        assert_eq!(encoded["success"], true);
        assert_eq!(encoded["data"], 42);
        assert!(encoded.get("message").is_none());
    }

    #[test]
    fn test_message_only_envelope() {
        let response = ApiResponse::message("deleted");
        let encoded = serde_json::to_value(&response).unwrap();

        assert_eq!(encoded["success"], true);
        assert!(encoded.get("data").is_none());
        assert_eq!(encoded["message"], "deleted");
    }
}
