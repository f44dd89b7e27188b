//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;
use crate::domain::ModelBundle;

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
    path: String,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Install the global Prometheus recorder
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("parts_forecast_build_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!(path = %config.path, "Prometheus metrics initialized");

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
                path: config.path.clone(),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    let path = metrics.path.clone();

    Router::new()
        .route(&path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric.
///
/// `path` must be a route template or another bounded label, never a raw URI.
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// How a prediction request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionOutcome {
    Success,
    /// Input did not fit the schema
    Rejected,
    Error,
}

impl PredictionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Rejected => "rejected",
            Self::Error => "error",
        }
    }
}

/// Record one prediction; `value` is only observed on success
pub fn record_prediction(
    surface: &'static str,
    outcome: PredictionOutcome,
    value: Option<f64>,
    duration: Duration,
) {
    let labels = [("surface", surface), ("outcome", outcome.as_str())];

    counter!("predictions_total", &labels).increment(1);
    histogram!("prediction_duration_seconds", &labels).record(duration.as_secs_f64());

    if let Some(value) = value {
        histogram!("prediction_value", "surface" => surface).record(value);
    }
}

/// Publish which model is being served
pub fn record_model_info(bundle: &ModelBundle) {
    let schema = bundle.schema();
    let fingerprint = schema.fingerprint();

    gauge!(
        "parts_forecast_model_info",
        "target" => schema.target().to_string(),
        "encoding" => schema.encoding().to_string(),
        "fingerprint" => fingerprint[..12.min(fingerprint.len())].to_string()
    )
    .set(1.0);
    gauge!("parts_forecast_model_features").set(schema.n_features() as f64);

    if let Some(metadata) = bundle.metadata() {
        gauge!("parts_forecast_model_test_r2").set(metadata.test_metrics.r2);
    }
}
