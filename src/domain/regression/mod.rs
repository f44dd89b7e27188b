//! Ordinary least squares regression, evaluation and data splitting

mod linear;
mod metrics;
mod split;

pub use linear::{FittedLinearRegression, LinearRegression};
pub use metrics::RegressionMetrics;
pub use split::{train_test_split, TrainTestSplit};
