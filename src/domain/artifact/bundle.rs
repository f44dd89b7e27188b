//! Model bundle: schema, scaler and model that belong together

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::files::{ArtifactSet, ModelArtifact, ScalerArtifact};
use crate::domain::preprocessing::StandardScaler;
use crate::domain::regression::{FittedLinearRegression, RegressionMetrics};
use crate::domain::schema::{FeatureSchema, ProjectionOptions, RawInput};
use crate::domain::DomainError;

/// Facts about the training run that produced a bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub trained_at: DateTime<Utc>,
    pub dataset: String,
    pub n_rows: usize,
    pub n_dropped_rows: usize,
    pub test_size: f64,
    pub random_state: u64,
    pub schema_fingerprint: String,
    pub train_metrics: RegressionMetrics,
    pub test_metrics: RegressionMetrics,
}

/// Result of one prediction
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub value: f64,
    /// Encoded (unscaled) feature vector, in schema order
    pub features: Vec<f64>,
}

/// Immutable, validated set of artifacts used for inference
#[derive(Debug, Clone, PartialEq)]
pub struct ModelBundle {
    schema: FeatureSchema,
    scaler: StandardScaler,
    model: FittedLinearRegression,
    metadata: Option<TrainingMetadata>,
}

impl ModelBundle {
    /// Pair the artifacts, failing if they were not fitted together
    pub fn new(
        schema: FeatureSchema,
        scaler: StandardScaler,
        model: FittedLinearRegression,
        metadata: Option<TrainingMetadata>,
    ) -> Result<Self, DomainError> {
        let bundle = Self {
            schema,
            scaler,
            model,
            metadata,
        };
        bundle.validate()?;
        Ok(bundle)
    }

    /// Cross-check parsed artifact files and build the bundle
    pub fn from_artifacts(set: ArtifactSet) -> Result<Self, DomainError> {
        set.schema.validate()?;

        let fingerprint = set.schema.fingerprint();
        let expected_names = set.schema.feature_names();

        if set.feature_names != expected_names {
            return Err(DomainError::artifact(format!(
                "feature_names.json lists {} features that do not match the {} produced by schema.json",
                set.feature_names.len(),
                expected_names.len()
            )));
        }

        if set.scaler.schema_fingerprint != fingerprint {
            return Err(DomainError::artifact(
                "scaler.json was fitted against a different schema",
            ));
        }

        if set.model.schema_fingerprint != fingerprint {
            return Err(DomainError::artifact(
                "model.json was fitted against a different schema",
            ));
        }

        Self::new(set.schema, set.scaler.scaler, set.model.model, set.metadata)
    }

    /// Split the bundle into its persisted artifact files
    pub fn to_artifacts(&self) -> ArtifactSet {
        let fingerprint = self.schema.fingerprint();

        ArtifactSet {
            schema: self.schema.clone(),
            feature_names: self.schema.feature_names(),
            scaler: ScalerArtifact {
                schema_fingerprint: fingerprint.clone(),
                scaler: self.scaler.clone(),
            },
            model: ModelArtifact {
                schema_fingerprint: fingerprint,
                model: self.model.clone(),
            },
            metadata: self.metadata.clone(),
        }
    }

    /// Check the schema/scaler/model pairing invariants
    pub fn validate(&self) -> Result<(), DomainError> {
        self.schema.validate()?;
        self.scaler.validate()?;
        self.model.validate()?;

        let n_features = self.schema.n_features();

        if self.scaler.n_features() != n_features {
            return Err(DomainError::artifact(format!(
                "Scaler was fitted on {} features but the schema has {}",
                self.scaler.n_features(),
                n_features
            )));
        }

        if self.model.n_features() != n_features {
            return Err(DomainError::artifact(format!(
                "Model has {} coefficients but the schema has {} features",
                self.model.n_features(),
                n_features
            )));
        }

        if let Some(metadata) = &self.metadata {
            if metadata.schema_fingerprint != self.schema.fingerprint() {
                return Err(DomainError::artifact(
                    "Training metadata belongs to a different schema",
                ));
            }
        }

        Ok(())
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn model(&self) -> &FittedLinearRegression {
        &self.model
    }

    pub fn metadata(&self) -> Option<&TrainingMetadata> {
        self.metadata.as_ref()
    }

    /// Project, scale and predict one raw input
    pub fn predict(
        &self,
        input: &RawInput,
        options: &ProjectionOptions,
    ) -> Result<Prediction, DomainError> {
        let features = self.schema.project(input, options)?;
        let scaled = self.scaler.transform_row(&features)?;
        let value = self.model.predict_row(&scaled)?;

        if !value.is_finite() {
            return Err(DomainError::internal(format!(
                "Model produced a non-finite prediction ({})",
                value
            )));
        }

        Ok(Prediction { value, features })
    }
}
