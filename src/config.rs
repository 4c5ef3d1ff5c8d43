//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;
use std::time::Duration;

/// Maximum time allowed to read a request body.
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum time allowed to produce and write a response.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum total size of request header names and values (1 MiB).
pub const MAX_HEADER_BYTES: usize = 1 << 20;

/// Extra read buffer beyond [`MAX_HEADER_BYTES`] for the request line and
/// header framing, so the exact cap is decided by the header limit middleware.
pub const HEADER_BUF_SLACK: usize = 8 * 1024;

/// Maximum number of request headers parsed per request.
pub const MAX_HEADER_COUNT: usize = 4096;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `JWKS_URL` (required): URL the JSON Web Key Set is fetched from
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 8080
/// - `JWT_ISSUER` (optional): expected `iss` claim of bearer tokens
/// - `JWT_AUDIENCE` (optional): expected `aud` claim of bearer tokens
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub jwks_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default)]
    pub jwt_issuer: Option<String>,

    #[serde(default)]
    pub jwt_audience: Option<String>,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    8080
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `JWKS_URL` is missing
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        // Field names are automatically converted: jwks_url -> JWKS_URL
        envy::from_env::<Config>()
    }

    /// Configuration pointing at the given key set URL with every optional value unset.
    pub fn with_jwks_url(jwks_url: impl Into<String>) -> Self {
        Self {
            jwks_url: jwks_url.into(),
            server_port: default_port(),
            jwt_issuer: None,
            jwt_audience: None,
        }
    }
}
