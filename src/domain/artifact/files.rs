//! On-disk artifact layout.
//!
//! The scaler and model files each record the fingerprint of the schema
//! they were fitted against, so a stale file from another training run
//! is detected at load time instead of producing silent mispredictions.

use serde::{Deserialize, Serialize};

use super::bundle::TrainingMetadata;
use crate::domain::preprocessing::StandardScaler;
use crate::domain::regression::FittedLinearRegression;
use crate::domain::schema::FeatureSchema;

pub const SCHEMA_FILE: &str = "schema.json";
pub const FEATURE_NAMES_FILE: &str = "feature_names.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const MODEL_FILE: &str = "model.json";
pub const METADATA_FILE: &str = "metadata.json";

/// Files that must exist before serving
pub const REQUIRED_FILES: &[&str] = &[SCHEMA_FILE, FEATURE_NAMES_FILE, SCALER_FILE, MODEL_FILE];

/// Contents of `scaler.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerArtifact {
    pub schema_fingerprint: String,
    pub scaler: StandardScaler,
}

/// Contents of `model.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub schema_fingerprint: String,
    pub model: FittedLinearRegression,
}

/// Every artifact file, parsed but not yet cross-checked
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactSet {
    pub schema: FeatureSchema,
    pub feature_names: Vec<String>,
    pub scaler: ScalerArtifact,
    pub model: ModelArtifact,
    pub metadata: Option<TrainingMetadata>,
}
