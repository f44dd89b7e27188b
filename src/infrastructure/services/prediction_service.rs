//! Prediction service - serves one immutable model bundle

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::domain::{DomainError, ModelBundle, Prediction, ProjectionOptions, RawInput};
use crate::infrastructure::observability::{record_prediction, PredictionOutcome};

/// Predicts with a loaded bundle and the configured projection policies
#[derive(Debug, Clone)]
pub struct PredictionService {
    bundle: Arc<ModelBundle>,
    options: ProjectionOptions,
}

impl PredictionService {
    pub fn new(bundle: Arc<ModelBundle>, options: ProjectionOptions) -> Self {
        Self { bundle, options }
    }

    pub fn bundle(&self) -> &Arc<ModelBundle> {
        &self.bundle
    }

    pub fn options(&self) -> ProjectionOptions {
        self.options
    }

    /// Predict one input; `surface` labels the metrics (`ui`, `api`, `cli`)
    pub fn predict(
        &self,
        input: &RawInput,
        surface: &'static str,
    ) -> Result<Prediction, DomainError> {
        let start = Instant::now();
        let result = self.bundle.predict(input, &self.options);
        let duration = start.elapsed();

        match &result {
            Ok(prediction) => {
                debug!(
                    surface,
                    value = prediction.value,
                    inputs = input.len(),
                    "Prediction computed"
                );
                record_prediction(
                    surface,
                    PredictionOutcome::Success,
                    Some(prediction.value),
                    duration,
                );
            }
            Err(err) => {
                let outcome = outcome_for(err);
                if outcome == PredictionOutcome::Error {
                    warn!(surface, error = %err, "Prediction failed");
                } else {
                    debug!(surface, error = %err, "Prediction input rejected");
                }
                record_prediction(surface, outcome, None, duration);
            }
        }

        result
    }
}

fn outcome_for(err: &DomainError) -> PredictionOutcome {
    match err {
        DomainError::Validation { .. }
        | DomainError::Schema { .. }
        | DomainError::UnknownCategory { .. } => PredictionOutcome::Rejected,
        _ => PredictionOutcome::Error,
    }
}
