//! Feature schema: the persisted encoding contract shared by training
//! and serving

mod entity;
mod projection;
mod validation;

pub use entity::{ColumnRule, ColumnSpec, EncodingStrategy, FeatureSchema};
pub use projection::{
    InputValue, MissingValuePolicy, ProjectionOptions, RawInput, UnknownCategoryPolicy,
};
pub use validation::{validate_column_name, SchemaValidationError, MAX_COLUMN_NAME_LENGTH};
