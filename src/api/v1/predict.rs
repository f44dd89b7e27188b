//! Prediction endpoint handler

use axum::extract::State;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, PredictRequest, PredictResponse};

/// POST /v1/predict
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    debug!(inputs = request.inputs.len(), "Predicting from JSON request");

    let prediction = state
        .prediction_service
        .predict(request.inputs, "api")
        .await
        .map_err(ApiError::from)?;

    let bundle = state.prediction_service.bundle();
    Ok(Json(PredictResponse::from_prediction(&prediction, &bundle)))
}
