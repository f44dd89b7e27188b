//! Standard scaler (z-score normalisation)
//!
//! `z = (x - mean) / scale` where `scale` is the population standard
//! deviation of the training column. Constant columns get a scale of 1.0
//! so they map to zero instead of dividing by zero.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Fitted per-feature mean and scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
    n_features: usize,
}

impl StandardScaler {
    /// Fit on a samples x features matrix
    pub fn fit(data: &DMatrix<f64>) -> Result<Self, DomainError> {
        let (rows, cols) = data.shape();

        if rows == 0 {
            return Err(DomainError::training("Cannot fit scaler on empty data"));
        }

        let mut mean = Vec::with_capacity(cols);
        let mut scale = Vec::with_capacity(cols);

        for column in data.column_iter() {
            let m = column.iter().sum::<f64>() / rows as f64;
            let variance = column.iter().map(|v| (v - m).powi(2)).sum::<f64>() / rows as f64;
            let std = variance.sqrt();

            mean.push(m);
            scale.push(if std == 0.0 || !std.is_finite() { 1.0 } else { std });
        }

        Ok(Self {
            mean,
            scale,
            n_features: cols,
        })
    }

    /// Rebuild from persisted parameters
    pub fn from_parts(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, DomainError> {
        if mean.len() != scale.len() {
            return Err(DomainError::artifact(format!(
                "Scaler has {} means but {} scales",
                mean.len(),
                scale.len()
            )));
        }

        let n_features = mean.len();
        let scaler = Self {
            mean,
            scale,
            n_features,
        };
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Check the persisted parameters are consistent and usable.
    /// Deserialized scalers only pass through here, never `from_parts`.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.mean.len() != self.n_features || self.scale.len() != self.n_features {
            return Err(DomainError::artifact(format!(
                "Scaler declares {} features but stores {} means and {} scales",
                self.n_features,
                self.mean.len(),
                self.scale.len()
            )));
        }

        if let Some(j) = self.scale.iter().position(|s| *s == 0.0 || !s.is_finite()) {
            return Err(DomainError::artifact(format!(
                "Scaler has a zero or non-finite scale for feature {}",
                j
            )));
        }

        if let Some(j) = self.mean.iter().position(|m| !m.is_finite()) {
            return Err(DomainError::artifact(format!(
                "Scaler has a non-finite mean for feature {}",
                j
            )));
        }

        Ok(())
    }

    /// Scale a single feature vector
    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>, DomainError> {
        if row.len() != self.n_features {
            return Err(DomainError::validation(format!(
                "Scaler expects {} features, got {}",
                self.n_features,
                row.len()
            )));
        }

        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| (x - m) / s)
            .collect())
    }

    /// Scale every row of a matrix
    pub fn transform(&self, data: &DMatrix<f64>) -> Result<DMatrix<f64>, DomainError> {
        if data.ncols() != self.n_features {
            return Err(DomainError::validation(format!(
                "Scaler expects {} features, got {}",
                self.n_features,
                data.ncols()
            )));
        }

        let mut scaled = data.clone();
        for (j, mut column) in scaled.column_iter_mut().enumerate() {
            let (m, s) = (self.mean[j], self.scale[j]);
            column.apply(|v| *v = (*v - m) / s);
        }

        Ok(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_population_std() {
        let data = DMatrix::from_row_slice(4, 2, &[1.0, 10.0, 2.0, 10.0, 3.0, 10.0, 4.0, 10.0]);
        let scaler = StandardScaler::fit(&data).unwrap();

        assert_eq!(scaler.n_features(), 2);
        assert_eq!(scaler.mean(), &[2.5, 10.0]);
        assert!((scaler.scale()[0] - 1.25_f64.sqrt()).abs() < 1e-12);
        // constant column keeps unit scale
        assert_eq!(scaler.scale()[1], 1.0);
    }

    #[test]
    fn test_transform_centres_columns() {
        let data = DMatrix::from_row_slice(3, 1, &[1.0, 2.0, 3.0]);
        let scaler = StandardScaler::fit(&data).unwrap();
        let scaled = scaler.transform(&data).unwrap();

        let sum: f64 = scaled.iter().sum();
        assert!(sum.abs() < 1e-12);
        assert!((scaled[(2, 0)] - 1.5_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_transform_row_matches_matrix() {
        let data = DMatrix::from_row_slice(3, 2, &[1.0, 5.0, 2.0, 7.0, 6.0, 9.0]);
        let scaler = StandardScaler::fit(&data).unwrap();
        let scaled = scaler.transform(&data).unwrap();
        let row = scaler.transform_row(&[2.0, 7.0]).unwrap();

        assert_eq!(row[0], scaled[(1, 0)]);
        assert_eq!(row[1], scaled[(1, 1)]);
    }

    #[test]
    fn test_transform_row_rejects_wrong_width() {
        let data = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let scaler = StandardScaler::fit(&data).unwrap();
        assert!(scaler.transform_row(&[1.0]).is_err());
    }

    #[test]
    fn test_fit_empty_fails() {
        let data = DMatrix::<f64>::zeros(0, 3);
        assert!(StandardScaler::fit(&data).is_err());
    }

    #[test]
    fn test_from_parts_validates() {
        assert!(StandardScaler::from_parts(vec![0.0], vec![1.0, 2.0]).is_err());
        assert!(StandardScaler::from_parts(vec![0.0], vec![0.0]).is_err());
        let scaler = StandardScaler::from_parts(vec![1.0, 2.0], vec![1.0, 2.0]).unwrap();
        assert_eq!(scaler.n_features(), 2);
        assert!(scaler.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_deserialized_zero_scale() {
        let scaler: StandardScaler = serde_json::from_str(
            r#"{"mean": [1.0, 2.0], "scale": [0.0, 2.0], "n_features": 2}"#,
        )
        .unwrap();

        let err = scaler.validate().unwrap_err();
        assert!(matches!(err, DomainError::Artifact { .. }));
        assert!(err.to_string().contains("feature 0"));
    }
}
