//! Schema endpoint handler

use axum::extract::State;

use crate::api::state::AppState;
use crate::api::types::{Json, SchemaResponse};

/// GET /v1/schema
pub async fn get_schema(State(state): State<AppState>) -> Json<SchemaResponse> {
    let service = &state.prediction_service;
    Json(SchemaResponse::from_bundle(&service.bundle(), service.options()))
}
