//! Random Data Service
//!
//! A small REST API that serves pseudo-random JSON records. Two data routes
//! are protected by bearer tokens verified against a remote JSON Web Key Set;
//! a health route is public.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Authentication**: JWT verified against a JWKS fetched per request
//! - **Format**: JSON responses, plain-text errors
//!
//! # Routes
//!
//! - `GET /data` (auth) - one record
//! - `GET /data-massive?size=N` (auth) - N records, default 100
//! - `GET /health` - empty 200

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod server;
pub mod services;

use std::sync::Arc;

use axum::{Router, http::StatusCode, middleware as axum_middleware, routing::get};
use tower_http::{
    timeout::{RequestBodyTimeoutLayer, TimeoutLayer},
    trace::TraceLayer,
};

use crate::config::{Config, READ_TIMEOUT, WRITE_TIMEOUT};
use crate::services::jwks::KeySetVerifier;

/// State shared with every handler and middleware via `State` extraction.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub verifier: KeySetVerifier,
}

impl AppState {
    /// Build state from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client used for key set fetches cannot be built.
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let verifier = KeySetVerifier::new(&config)?;

        Ok(Self {
            config: Arc::new(config),
            verifier,
        })
    }
}

/// Build the application router with all routes and middleware attached.
///
/// Protected routes check the method before authenticating, so a POST to
/// `/data` is a 405 whether or not it carries a token. `get` also answers
/// HEAD, so HEAD is routed to the 405 handler explicitly.
pub fn build_router(state: AppState) -> Router {
    let auth = axum_middleware::from_fn_with_state(state.clone(), middleware::auth::auth_middleware);

    Router::new()
        // Public routes (no authentication required)
        .route("/health", get(handlers::health::health_check))
        // Authenticated routes
        .route(
            "/data",
            get(handlers::data::get_data)
                .route_layer(auth.clone())
                .head(handlers::method_not_allowed)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/data-massive",
            get(handlers::data::get_data_massive)
                .route_layer(auth)
                .head(handlers::method_not_allowed)
                .fallback(handlers::method_not_allowed),
        )
        // Uniform limits, innermost first
        .layer(axum_middleware::from_fn(middleware::limits::header_limit))
        .layer(RequestBodyTimeoutLayer::new(READ_TIMEOUT))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            WRITE_TIMEOUT,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
