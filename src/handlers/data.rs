//! Random data HTTP handlers.
//!
//! This module implements the protected data endpoints:
//! - GET /data - One random record
//! - GET /data-massive - Array of random records

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::record::{BulkParams, DataResponse},
    services::generator,
};
use axum::{
    Extension, Json,
    extract::Query,
    http::header,
    response::{IntoResponse, Response},
};

/// Serve a single random record.
///
/// # Endpoint
///
/// `GET /data`
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "timestamp": "2025-12-21T19:00:00.123456789Z",
///   "random_value": 421
/// }
/// ```
pub async fn get_data(Extension(auth): Extension<AuthContext>) -> Json<DataResponse> {
    let record = generator::single_record();

    tracing::info!(
        "Served /data request: Timestamp={}, RandomValue={}, Subject={:?}",
        record.timestamp.to_rfc3339(),
        record.random_value,
        auth.subject
    );

    Json(record)
}

/// Serve `size` random records.
///
/// # Endpoint
///
/// `GET /data-massive?size=N`
///
/// # Query Parameters
///
/// - `size` - optional non-negative integer, defaults to 100
///
/// # Response
///
/// - **Success (200 OK)**: JSON array with exactly `size` records
/// - **Error (400)**: `size` is not an integer or is negative
/// - **Error (500)**: the array could not be allocated or encoded
///
/// Repeated `size` parameters use the first occurrence.
///
/// The whole array is encoded before anything is written, so a 500 never
/// follows a partial body.
pub async fn get_data_massive(
    Extension(auth): Extension<AuthContext>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let params = BulkParams::from(pairs);
    let size = generator::parse_size(params.size.as_deref())?;
    let items = generator::bulk_records(size)?;

    let body = serde_json::to_vec(&items).map_err(|e| {
        AppError::Internal(format!("Error marshaling JSON for /data-massive: {}", e))
    })?;

    tracing::info!(
        "Served /data-massive request: Records={}, Bytes={}, Subject={:?}",
        items.len(),
        body.len(),
        auth.subject
    );

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
