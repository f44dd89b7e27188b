use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::{
    logging_middleware, metrics_middleware, security_headers_middleware, MAX_BODY_SIZE,
};
use super::state::AppState;
use super::types::ApiError;
use super::ui;
use super::v1;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Create the full router: HTML pages, JSON API, probes and metrics
pub fn create_router(state: AppState, metrics: Option<PrometheusMetrics>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .merge(ui::create_ui_router())
        .nest("/v1", v1::create_v1_router())
        .fallback(not_found)
        .with_state(state);

    if let Some(m) = metrics {
        router = router.merge(create_metrics_router(m));
    }

    router
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}

async fn not_found() -> ApiError {
    ApiError::not_found("No route for this path")
}
