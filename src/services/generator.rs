//! Pseudo-random payload generation.
//!
//! Every call seeds a fresh generator from the wall clock in nanoseconds.
//! This is not cryptographically secure, and two requests landing in the
//! same clock tick will observe identical sequences.

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::error::AppError;
use crate::models::record::{DataResponse, MassiveDataItem};

/// Number of bulk records produced when `size` is not given.
pub const DEFAULT_BULK_SIZE: usize = 100;

/// Length of every `random_text` field.
pub const RANDOM_TEXT_LEN: usize = 20;

/// Exclusive upper bound of `DataResponse::random_value`.
pub const SINGLE_VALUE_BOUND: u32 = 1000;

/// Exclusive upper bound of the four bulk integers.
pub const BULK_VALUE_BOUND: u32 = 10_000;

/// Alphabet `random_text` is drawn from.
pub const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 ";

/// Build a generator seeded from the given instant.
fn seeded_rng(at: DateTime<Utc>) -> StdRng {
    // Out-of-range instants (beyond year 2262) fall back to seed 0
    let nanos = at.timestamp_nanos_opt().unwrap_or_default();
    StdRng::seed_from_u64(nanos as u64)
}

/// Generate the record served by `GET /data`.
pub fn single_record() -> DataResponse {
    let now = Utc::now();
    let mut rng = seeded_rng(now);

    DataResponse {
        timestamp: now,
        random_value: rng.random_range(0..SINGLE_VALUE_BOUND),
    }
}

/// Generate `count` independent bulk records.
///
/// No upper bound is applied. Storage for all `count` records is reserved
/// first; a count the allocator cannot satisfy is an internal error rather
/// than a panic or abort.
pub fn bulk_records(count: usize) -> Result<Vec<MassiveDataItem>, AppError> {
    let mut rng = seeded_rng(Utc::now());
    let mut items = Vec::new();
    items.try_reserve_exact(count).map_err(|e| {
        AppError::Internal(format!("Cannot allocate {} bulk records: {}", count, e))
    })?;

    for _ in 0..count {
        items.push(MassiveDataItem {
            timestamp: Utc::now(),
            random_number_1: rng.random_range(0..BULK_VALUE_BOUND),
            random_number_2: rng.random_range(0..BULK_VALUE_BOUND),
            random_number_3: rng.random_range(0..BULK_VALUE_BOUND),
            random_number_4: rng.random_range(0..BULK_VALUE_BOUND),
            random_text: random_text(RANDOM_TEXT_LEN, &mut rng),
        });
    }

    Ok(items)
}

/// Sample `len` characters uniformly from [`CHARSET`].
pub fn random_text<R: Rng>(len: usize, rng: &mut R) -> String {
    (0..len)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// Interpret the raw `size` query value.
///
/// # Rules
///
/// - Absent or empty → [`DEFAULT_BULK_SIZE`]
/// - Must be a base-10 integer (an optional sign is accepted)
/// - Must not be negative
pub fn parse_size(raw: Option<&str>) -> Result<usize, AppError> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(DEFAULT_BULK_SIZE),
    };

    let size: i64 = raw.parse().map_err(|e| {
        tracing::warn!("Invalid 'size' parameter {:?}: {}", raw, e);
        AppError::InvalidRequest("Invalid 'size' parameter. Must be an integer.".to_string())
    })?;

    if size < 0 {
        tracing::warn!("Invalid 'size' parameter: {} (negative)", size);
        return Err(AppError::InvalidRequest(
            "Invalid 'size' parameter. Must be a non-negative integer.".to_string(),
        ));
    }

    usize::try_from(size).map_err(|_| {
        AppError::InvalidRequest("Invalid 'size' parameter. Must be an integer.".to_string())
    })
}
