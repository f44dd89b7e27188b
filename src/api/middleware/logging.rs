//! Request/response logging middleware

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Logs each request and echoes its request id on the response.
/// No span is opened here; `TraceLayer` owns the request span.
pub async fn logging_middleware(mut request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = extract_path(&request);
    let request_id = ensure_request_id(&mut request);
    let headers_log = loggable_headers(&request);

    info!(
        method = %method,
        path = %path,
        request_id = %request_id,
        headers = %headers_log,
        "Incoming request"
    );

    let mut response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_server_error() {
        warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = duration.as_millis() as u64,
            request_id = %request_id,
            "Request failed"
        );
    } else {
        info!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = duration.as_millis() as u64,
            request_id = %request_id,
            "Request completed"
        );
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

fn extract_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

/// Reuse the caller's id or generate one and attach it to the request
fn ensure_request_id(request: &mut Request<Body>) -> String {
    if let Some(id) = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
    {
        return id.to_string();
    }

    let id = uuid::Uuid::new_v4().to_string();
    if let Ok(value) = HeaderValue::from_str(&id) {
        request.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    id
}

fn loggable_headers(request: &Request<Body>) -> String {
    request
        .headers()
        .iter()
        .filter(|(name, _)| should_log_header(name.as_str()))
        .map(|(name, value)| format!("{}={}", name, value.to_str().unwrap_or("[invalid]")))
        .collect::<Vec<_>>()
        .join(", ")
}

fn should_log_header(name: &str) -> bool {
    matches!(
        name,
        "content-type" | "content-length" | "accept" | "user-agent" | "x-forwarded-for" | "x-real-ip"
    )
}
