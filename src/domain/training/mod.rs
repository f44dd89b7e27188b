//! Training pipeline: raw table to validated model bundle

mod plan;
mod trainer;

pub use plan::{TrainingPlan, DEFAULT_TARGET};
pub use trainer::Trainer;
