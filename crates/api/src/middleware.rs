use std::time::Instant;

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

/// Raw credential carried by the `Authorization` header, if any.
///
/// - no header: `None`
/// - `Bearer <key>`: `Some(key)` (trimmed, possibly empty)
/// - anything else (other scheme, non-UTF-8): `Some("")`, which never resolves
pub fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::AUTHORIZATION)?;

    let Ok(value) = raw.to_str() else {
        return Some(String::new());
    };
    let value = value.trim();

    // Trailing whitespace is stripped before we see it, so "Bearer " arrives as "Bearer".
    if value == "Bearer" {
        return Some(String::new());
    }

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .unwrap_or_default();

    Some(token.to_string())
}

/// One log line per request: method, path, status, latency.
pub async fn trace_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request completed"
    );
    response
}
