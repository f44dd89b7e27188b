//! API request, response and error types

pub mod error;
pub mod json;
pub mod prediction;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use prediction::{
    FeatureCoefficient, ModelResponse, PredictRequest, PredictResponse, SchemaResponse,
    PREDICTION_UNIT,
};
