//! Random Data Service - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Build shared state (key set verifier)
//! 3. Build HTTP router with routes and middleware
//! 4. Start server on configured port

use randdata_service::{AppState, build_router, config::Config, server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded, key set URL: {}", config.jwks_url);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let state = AppState::new(config)?;
    let app = build_router(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Could not start server on {}: {}", addr, e);
            return Err(e.into());
        }
    };
    tracing::info!("Starting HTTP server on {} with custom timeouts", addr);

    server::serve(listener, app).await?;

    Ok(())
}
