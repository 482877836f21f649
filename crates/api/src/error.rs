//! JSON error responses.
//!
//! Every error body has the shape `{ "error": <code>, "message": <text> }`.
//! Internal errors are logged and returned with a generic message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use hazina_shared::AppError;

/// Builds an error response from a status code, error code, and message.
///
/// 5xx responses log the real message and return a generic one.
pub fn error_response(status: u16, code: &str, message: &str) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = if status.is_server_error() {
        error!(code, message, "request failed");
        "An error occurred"
    } else {
        message
    };

    (
        status,
        Json(json!({
            "error": code,
            "message": message,
        })),
    )
        .into_response()
}

/// Builds an error response from an `AppError`.
pub fn app_error_response(e: &AppError) -> Response {
    error_response(e.status_code(), e.error_code(), &e.to_string())
}

/// Shortcut for request validation failures.
pub fn validation_error(message: impl Into<String>) -> Response {
    app_error_response(&AppError::Validation(message.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_is_400() {
        let response = validation_error("bad amount");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unknown_status_falls_back_to_500() {
        let response = error_response(999, "WEIRD", "odd");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
