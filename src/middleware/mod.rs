//! HTTP middleware components.
//!
//! Middleware are functions that run before route handlers.
//! They can:
//! - Authenticate requests
//! - Enforce request limits
//! - Short-circuit requests (reject unauthorized)

/// Bearer token authentication middleware
pub mod auth;

/// Header size cap
pub mod limits;
