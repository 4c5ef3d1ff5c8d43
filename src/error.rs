//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and plain-text bodies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and message.
///
/// # Error Categories
///
/// - **Validation Errors**: Invalid query parameters
/// - **Authentication Errors**: Missing, malformed or unverifiable bearer tokens
/// - **Routing Errors**: Unsupported HTTP method
/// - **Limit Errors**: Oversized request headers
/// - **Internal Errors**: Anything the client cannot fix
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String is sent to the client as-is.
    #[error("{0}")]
    InvalidRequest(String),

    /// Authorization header is missing, malformed, or the token failed verification.
    ///
    /// Returns HTTP 401 Unauthorized. The cause is never surfaced to the client.
    #[error("Invalid Authorization header")]
    Unauthorized,

    /// The route exists but does not accept this method.
    ///
    /// Returns HTTP 405 Method Not Allowed.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Request headers exceed the configured cap.
    ///
    /// Returns HTTP 431 Request Header Fields Too Large.
    #[error("Request header fields too large")]
    HeadersTooLarge,

    /// Something failed on our side (e.g. response encoding).
    ///
    /// Returns HTTP 500 Internal Server Error. The String is logged, not sent.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convert AppError into an HTTP response.
///
/// # Status Code Mapping
///
/// - `InvalidRequest` → 400 Bad Request
/// - `Unauthorized` → 401 Unauthorized
/// - `MethodNotAllowed` → 405 Method Not Allowed
/// - `HeadersTooLarge` → 431 Request Header Fields Too Large
/// - `Internal` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, self.to_string()),
            AppError::HeadersTooLarge => (
                StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE,
                self.to_string(),
            ),
            AppError::Internal(ref detail) => {
                tracing::error!("{}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        // String bodies are sent as text/plain; charset=utf-8
        (status, message).into_response()
    }
}
