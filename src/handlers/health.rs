//! Health check endpoint for service monitoring.

use axum::http::StatusCode;

/// Health check handler.
///
/// Always returns an empty 200 OK. It is mounted outside the auth
/// middleware, so Authorization headers are ignored.
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
