//! Fitted preprocessing steps: imputation, categorical domains, scaling

mod encoder;
mod imputer;
mod scaler;

pub use encoder::CategoryDomain;
pub use imputer::{mean_of, most_frequent};
pub use scaler::StandardScaler;
