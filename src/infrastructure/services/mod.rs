//! Application services

mod prediction_service;
mod training_service;

pub use prediction_service::PredictionService;
pub use training_service::{TrainingReport, TrainingService};
