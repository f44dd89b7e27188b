//! Model info endpoint handler

use axum::extract::State;

use crate::api::state::AppState;
use crate::api::types::{Json, ModelResponse};

/// GET /v1/model
pub async fn get_model(State(state): State<AppState>) -> Json<ModelResponse> {
    Json(ModelResponse::from_bundle(&state.prediction_service.bundle()))
}
