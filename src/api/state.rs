//! Application state for shared services

use std::sync::Arc;

use crate::domain::{
    ArtifactRepository, DomainError, ModelBundle, Prediction, ProjectionOptions, RawInput,
};
use crate::infrastructure::services::PredictionService;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub prediction_service: Arc<dyn PredictionServiceTrait>,
    pub artifact_repository: Arc<dyn ArtifactRepository>,
}

impl AppState {
    pub fn new(
        prediction_service: Arc<dyn PredictionServiceTrait>,
        artifact_repository: Arc<dyn ArtifactRepository>,
    ) -> Self {
        Self {
            prediction_service,
            artifact_repository,
        }
    }
}

/// Trait for prediction service operations
#[async_trait::async_trait]
pub trait PredictionServiceTrait: Send + Sync {
    /// The bundle loaded at startup
    fn bundle(&self) -> Arc<ModelBundle>;
    fn options(&self) -> ProjectionOptions;
    async fn predict(
        &self,
        input: RawInput,
        surface: &'static str,
    ) -> Result<Prediction, DomainError>;
}

#[async_trait::async_trait]
impl PredictionServiceTrait for PredictionService {
    fn bundle(&self) -> Arc<ModelBundle> {
        Arc::clone(PredictionService::bundle(self))
    }

    fn options(&self) -> ProjectionOptions {
        PredictionService::options(self)
    }

    async fn predict(
        &self,
        input: RawInput,
        surface: &'static str,
    ) -> Result<Prediction, DomainError> {
        PredictionService::predict(self, &input, surface)
    }
}
