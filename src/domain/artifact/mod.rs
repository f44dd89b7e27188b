//! Persisted training artifacts and the bundle that pairs them

mod bundle;
mod files;
mod repository;

pub use bundle::{ModelBundle, Prediction, TrainingMetadata};
pub use files::{
    ArtifactSet, ModelArtifact, ScalerArtifact, FEATURE_NAMES_FILE, METADATA_FILE, MODEL_FILE,
    REQUIRED_FILES, SCALER_FILE, SCHEMA_FILE,
};
pub use repository::{in_memory::InMemoryArtifactRepository, ArtifactRepository};

#[cfg(test)]
pub use repository::MockArtifactRepository;

#[cfg(test)]
pub(crate) use bundle::tests::{sample_bundle, sample_schema};
