//! Connection accept loop.
//!
//! `axum::serve` does not expose hyper's connection settings, so connections
//! are driven by hyper's HTTP/1 builder directly. This is what lets the
//! header cap and the header read timeout from [`crate::config`] apply on a
//! real socket.

use std::time::Duration;

use axum::Router;
use hyper::server::conn::http1;
use hyper_util::{
    rt::{TokioIo, TokioTimer},
    service::TowerToHyperService,
};
use tokio::net::TcpListener;

use crate::config::{HEADER_BUF_SLACK, MAX_HEADER_BYTES, MAX_HEADER_COUNT, READ_TIMEOUT};

/// HTTP/1 connection settings shared by every connection.
fn connection_builder() -> http1::Builder {
    let mut builder = http1::Builder::new();
    builder
        .timer(TokioTimer::new())
        .header_read_timeout(READ_TIMEOUT)
        // Room for the request line on top of the header block itself
        .max_buf_size(MAX_HEADER_BYTES + HEADER_BUF_SLACK)
        .max_headers(MAX_HEADER_COUNT);
    builder
}

/// Accept connections forever, serving each on its own tokio task.
///
/// Accept failures (e.g. out of file descriptors) are logged and retried
/// after a short pause; they never stop the loop.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("Failed to accept connection: {}", e);
                tokio::time::sleep(Duration::from_secs(1)).await;
                continue;
            }
        };

        let io = TokioIo::new(stream);
        let service = TowerToHyperService::new(app.clone());

        tokio::spawn(async move {
            if let Err(e) = connection_builder().serve_connection(io, service).await {
                tracing::debug!("Connection from {} ended with error: {}", peer, e);
            }
        });
    }
}
