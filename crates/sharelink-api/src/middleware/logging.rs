//! Request/response logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;

/// Logs request method, path, status, and duration.
///
/// Public share tokens are bearer credentials, so only the route prefix of
/// `/api/s/{token}` is logged.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = redact_share_token(request.uri().path());
    let start = Instant::now();

    let response = next.run(request).await;

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "HTTP request"
    );

    response
}

fn redact_share_token(path: &str) -> String {
    match path.strip_prefix("/api/s/") {
        Some(rest) if !rest.is_empty() => "/api/s/***".to_string(),
        _ => path.to_string(),
    }
}
