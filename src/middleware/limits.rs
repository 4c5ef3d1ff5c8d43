//! Connection-level limits applied to every route.

use crate::{config::MAX_HEADER_BYTES, error::AppError};
use axum::{extract::Request, middleware::Next, response::Response};

/// Reject requests whose header names and values together exceed
/// [`MAX_HEADER_BYTES`] with 431.
pub async fn header_limit(request: Request, next: Next) -> Result<Response, AppError> {
    let total: usize = request
        .headers()
        .iter()
        .map(|(name, value)| name.as_str().len() + value.len())
        .sum();

    if total > MAX_HEADER_BYTES {
        tracing::warn!("Rejected {}: {} header bytes", request.uri(), total);
        return Err(AppError::HeadersTooLarge);
    }

    Ok(next.run(request).await)
}
