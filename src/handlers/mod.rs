//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (query params, auth context)
//! 2. Generates the payload
//! 3. Returns HTTP response (JSON, status code)

use crate::error::AppError;

/// Random data endpoints
pub mod data;

/// Liveness endpoint
pub mod health;

/// Fallback for known paths hit with an unsupported method.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
