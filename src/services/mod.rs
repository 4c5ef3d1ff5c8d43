//! Request-independent logic used by the handlers and middleware.

/// Random payload generation
pub mod generator;

/// Key set fetching and bearer token verification
pub mod jwks;
