//! Random payload models returned by the data endpoints.
//!
//! This module defines:
//! - `DataResponse`: Single record returned by `GET /data`
//! - `MassiveDataItem`: One element of the array returned by `GET /data-massive`
//! - `BulkParams`: Query string accepted by `GET /data-massive`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Single pseudo-random record.
///
/// # JSON Example
///
/// ```json
/// {
///   "timestamp": "2025-12-21T19:00:00.123456789Z",
///   "random_value": 421
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse {
    /// Moment the record was generated
    pub timestamp: DateTime<Utc>,

    /// Integer in `[0, 1000)`
    pub random_value: u32,
}

/// One record of a bulk response.
///
/// # JSON Example
///
/// ```json
/// {
///   "timestamp": "2025-12-21T19:00:00.123456789Z",
///   "random_number_1": 17,
///   "random_number_2": 9981,
///   "random_number_3": 4410,
///   "random_number_4": 0,
///   "random_text": "aZ3 kq9Lm0PxT7 bQw2e"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MassiveDataItem {
    /// Moment this particular record was generated
    pub timestamp: DateTime<Utc>,

    /// Integers in `[0, 10000)`
    pub random_number_1: u32,
    pub random_number_2: u32,
    pub random_number_3: u32,
    pub random_number_4: u32,

    /// Fixed-length text over `a-z`, `A-Z`, `0-9` and space
    pub random_text: String,
}

/// Query parameters for `GET /data-massive`.
///
/// `size` is kept as raw text so that parse failures produce our own
/// error messages rather than the extractor's rejection.
#[derive(Debug, Default)]
pub struct BulkParams {
    pub size: Option<String>,
}

/// Build from the decoded query pairs; the first `size` wins.
impl From<Vec<(String, String)>> for BulkParams {
    fn from(pairs: Vec<(String, String)>) -> Self {
        let size = pairs
            .into_iter()
            .find(|(key, _)| key == "size")
            .map(|(_, value)| value);

        Self { size }
    }
}
