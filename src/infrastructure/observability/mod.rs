//! Observability infrastructure - Prometheus metrics

mod config;
mod metrics;

pub use config::MetricsConfig;
pub use metrics::{
    create_metrics_router, init_metrics, record_http_request, record_model_info,
    record_prediction, PredictionOutcome, PrometheusMetrics,
};
