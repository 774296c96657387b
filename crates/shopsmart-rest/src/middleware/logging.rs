//! Request logging middleware.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn};

/// Logs method, URI, status and duration of every request.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_millis();

    if status.is_server_error() {
        warn!(target: "http", %method, %uri, status = status.as_u16(), duration_ms = %duration_ms, "HTTP request failed");
    } else {
        info!(target: "http", %method, %uri, status = status.as_u16(), duration_ms = %duration_ms, "HTTP request completed");
    }

    response
}
