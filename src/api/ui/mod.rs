//! Server-rendered HTML pages

pub mod render;

use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Form, Router,
};
use tracing::debug;

use super::state::AppState;
use super::types::ApiError;
use crate::domain::{InputValue, RawInput};
use render::FormOutcome;

/// Create the HTML router
pub fn create_ui_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(submit))
        .route("/about", get(about))
}

/// GET /
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let bundle = state.prediction_service.bundle();
    Html(render::prediction_page(bundle.schema(), &BTreeMap::new(), None))
}

/// POST /predict
pub async fn submit(
    State(state): State<AppState>,
    Form(values): Form<BTreeMap<String, String>>,
) -> (StatusCode, Html<String>) {
    let bundle = state.prediction_service.bundle();

    // blank fields are left out so the missing-value policy applies
    let input: RawInput = values
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(name, value)| (name.clone(), InputValue::Text(value.clone())))
        .collect();

    let (status, outcome) = match state.prediction_service.predict(input, "ui").await {
        Ok(prediction) => (StatusCode::OK, FormOutcome::Prediction(prediction.value)),
        Err(err) => {
            let api_err = ApiError::from(err);
            debug!(status = %api_err.status, "Form prediction failed");
            (api_err.status, FormOutcome::Error(api_err.message().to_string()))
        }
    };

    let page = render::prediction_page(bundle.schema(), &values, Some(&outcome));
    (status, Html(page))
}

/// GET /about
pub async fn about(State(state): State<AppState>) -> Html<String> {
    Html(render::about_page(&state.prediction_service.bundle()))
}
