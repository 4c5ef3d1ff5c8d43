//! Data models returned to API clients.
//!
//! None of these outlive a single request.

/// Random record payloads
pub mod record;
