//! Domain layer - Core business logic and entities

pub mod artifact;
pub mod dataset;
pub mod error;
pub mod preprocessing;
pub mod regression;
pub mod schema;
pub mod training;

pub use artifact::{
    ArtifactRepository, ArtifactSet, InMemoryArtifactRepository, ModelBundle, Prediction,
    TrainingMetadata,
};
pub use dataset::{ColumnKind, RawTable};
pub use error::DomainError;
pub use preprocessing::{CategoryDomain, StandardScaler};
pub use regression::{FittedLinearRegression, LinearRegression, RegressionMetrics};
pub use schema::{
    ColumnRule, ColumnSpec, EncodingStrategy, FeatureSchema, InputValue, MissingValuePolicy,
    ProjectionOptions, RawInput, UnknownCategoryPolicy,
};
pub use training::{Trainer, TrainingPlan};
