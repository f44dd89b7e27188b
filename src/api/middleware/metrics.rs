//! HTTP metrics middleware for recording request/response metrics

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::infrastructure::observability::record_http_request;

/// Path label for requests that matched no route
pub const UNMATCHED_PATH: &str = "unmatched";

/// Middleware to record HTTP request metrics
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = extract_path(&request);

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status().as_u16();

    record_http_request(method.as_str(), &path, status, duration);

    response
}

/// Route template of the request; raw URIs would make the label unbounded
fn extract_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH.to_string())
}
