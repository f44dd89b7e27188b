//! Parts-per-hour predictor
//!
//! Trains a linear regression on manufacturing machine parameters and
//! serves predictions through:
//! - an HTML form and about page
//! - a JSON API (`/v1/predict`, `/v1/schema`, `/v1/model`)
//! - one-shot CLI commands (`predict`, `inspect`)
//!
//! Training and serving share one persisted feature schema, so a request is
//! encoded exactly like the rows the model was fitted on.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::{ArtifactRepository, DomainError};
use infrastructure::artifact::FileArtifactRepository;
use infrastructure::observability::record_model_info;
use infrastructure::services::PredictionService;
use tracing::info;

/// Load the artifacts named by the configuration and build the state
pub async fn create_app_state(config: &AppConfig) -> Result<AppState, DomainError> {
    let repository = Arc::new(FileArtifactRepository::new(config.artifacts.dir.clone()));
    let bundle = Arc::new(repository.load().await?);

    record_model_info(&bundle);

    let options = config.serving.projection_options();
    info!(
        features = bundle.schema().n_features(),
        missing_values = ?options.missing_values,
        unknown_categories = ?options.unknown_categories,
        "Model bundle loaded"
    );

    let service = PredictionService::new(bundle, options);

    Ok(AppState::new(Arc::new(service), repository))
}
