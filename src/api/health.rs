//! Health check endpoints

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::api::types::Json;
use serde::Serialize;

use super::state::AppState;

/// Detailed health response with component status
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Health check status
#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Individual component health check
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Simple health check - returns 200 if the service is running
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check: the served bundle still validates and its files are on disk
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let checks = vec![check_bundle(&state), check_artifact_files(&state).await];

    let overall_status = if checks.iter().any(|c| c.status == HealthStatus::Unhealthy) {
        HealthStatus::Unhealthy
    } else if checks.iter().any(|c| c.status == HealthStatus::Degraded) {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    };

    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(checks),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let status_code = match overall_status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// Liveness check - simple check to verify the service is running
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

fn check_bundle(state: &AppState) -> HealthCheck {
    let start = Instant::now();
    let bundle = state.prediction_service.bundle();

    let (status, message) = match bundle.validate() {
        Ok(()) => (HealthStatus::Healthy, None),
        Err(e) => (HealthStatus::Unhealthy, Some(e.to_string())),
    };

    HealthCheck {
        name: "model_bundle".to_string(),
        status,
        message,
        latency_ms: Some(start.elapsed().as_millis() as u64),
    }
}

/// Files removed after startup do not affect serving, so this only degrades
async fn check_artifact_files(state: &AppState) -> HealthCheck {
    let start = Instant::now();

    let (status, message) = match state.artifact_repository.missing().await {
        Ok(missing) if missing.is_empty() => (HealthStatus::Healthy, None),
        Ok(missing) => (
            HealthStatus::Degraded,
            Some(format!("Missing files: {}", missing.join(", "))),
        ),
        Err(e) => (HealthStatus::Degraded, Some(e.to_string())),
    };

    HealthCheck {
        name: "artifact_files".to_string(),
        status,
        message,
        latency_ms: Some(start.elapsed().as_millis() as u64),
    }
}
