//! Linear regression fitted by least squares.
//!
//! Features and target are centred first and the intercept is recovered as `mean(y) - mean(X) · w`. The least-squares
//! system is solved through an SVD, which also yields the minimum-norm
//! solution when columns are collinear (e.g. a full set of one-hot
//! indicators). The solve is deterministic: identical inputs give
//! bit-identical coefficients.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Singular values below this (relative to the largest) are treated as zero
const RANK_TOLERANCE: f64 = 1e-10;

/// Ordinary least squares estimator with an intercept
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearRegression;

impl LinearRegression {
    pub fn new() -> Self {
        Self
    }

    /// Fit on a samples x features matrix and a target vector
    pub fn fit(
        &self,
        x: &DMatrix<f64>,
        y: &DVector<f64>,
    ) -> Result<FittedLinearRegression, DomainError> {
        let (rows, cols) = x.shape();

        if rows == 0 {
            return Err(DomainError::training("Cannot fit regression on empty data"));
        }

        if rows != y.len() {
            return Err(DomainError::training(format!(
                "Feature matrix has {} rows but target has {} values",
                rows,
                y.len()
            )));
        }

        if cols == 0 {
            return Err(DomainError::training("Cannot fit regression without features"));
        }

        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(DomainError::training("Training data contains non-finite values"));
        }

        let x_offset: Vec<f64> = x
            .column_iter()
            .map(|c| c.iter().sum::<f64>() / rows as f64)
            .collect();
        let y_offset = y.iter().sum::<f64>() / rows as f64;

        let mut x_centred = x.clone();
        for (j, mut column) in x_centred.column_iter_mut().enumerate() {
            let offset = x_offset[j];
            column.apply(|v| *v -= offset);
        }
        let y_centred = y.map(|v| v - y_offset);

        let coefficients = solve_least_squares(x_centred, &y_centred)?;

        let intercept = y_offset
            - x_offset
                .iter()
                .zip(coefficients.iter())
                .map(|(m, w)| m * w)
                .sum::<f64>();

        Ok(FittedLinearRegression {
            coefficients: coefficients.iter().copied().collect(),
            intercept,
        })
    }
}

fn solve_least_squares(
    x: DMatrix<f64>,
    y: &DVector<f64>,
) -> Result<DVector<f64>, DomainError> {
    let svd = x.svd(true, true);
    let largest = svd.singular_values.max();
    let eps = if largest > 0.0 { largest * RANK_TOLERANCE } else { RANK_TOLERANCE };

    svd.solve(y, eps)
        .map_err(|e| DomainError::training(format!("Least squares solve failed: {}", e)))
}

/// Fitted coefficients and intercept; read-only after training
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedLinearRegression {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl FittedLinearRegression {
    /// Rebuild from persisted parameters
    pub fn from_parts(coefficients: Vec<f64>, intercept: f64) -> Result<Self, DomainError> {
        let model = Self {
            coefficients,
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    /// Check every parameter is finite
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.coefficients.iter().any(|c| !c.is_finite()) || !self.intercept.is_finite() {
            return Err(DomainError::artifact("Model contains non-finite parameters"));
        }
        Ok(())
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Predict one already-scaled feature vector
    pub fn predict_row(&self, row: &[f64]) -> Result<f64, DomainError> {
        if row.len() != self.coefficients.len() {
            return Err(DomainError::validation(format!(
                "Model expects {} features, got {}",
                self.coefficients.len(),
                row.len()
            )));
        }

        Ok(self.intercept
            + row
                .iter()
                .zip(&self.coefficients)
                .map(|(x, w)| x * w)
                .sum::<f64>())
    }

    /// Predict every row of a matrix
    pub fn predict(&self, x: &DMatrix<f64>) -> Result<DVector<f64>, DomainError> {
        if x.ncols() != self.coefficients.len() {
            return Err(DomainError::validation(format!(
                "Model expects {} features, got {}",
                self.coefficients.len(),
                x.ncols()
            )));
        }

        let weights = DVector::from_column_slice(&self.coefficients);
        Ok((x * weights).add_scalar(self.intercept))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-8
    }

    #[test]
    fn test_recovers_exact_linear_relation() {
        // y = 3 + 2*a - 1*b
        let x = DMatrix::from_row_slice(
            5,
            2,
            &[1.0, 0.0, 2.0, 1.0, 3.0, 5.0, 4.0, 2.0, 5.0, 7.0],
        );
        let y = DVector::from_iterator(5, x.row_iter().map(|r| 3.0 + 2.0 * r[0] - r[1]));

        let model = LinearRegression::new().fit(&x, &y).unwrap();

        assert!(approx(model.coefficients()[0], 2.0));
        assert!(approx(model.coefficients()[1], -1.0));
        assert!(approx(model.intercept(), 3.0));
    }

    #[test]
    fn test_collinear_columns_still_solve() {
        // second column duplicates the first
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0]);
        let y = DVector::from_column_slice(&[2.0, 4.0, 6.0, 8.0]);

        let model = LinearRegression::new().fit(&x, &y).unwrap();
        let predictions = model.predict(&x).unwrap();

        for (p, t) in predictions.iter().zip(y.iter()) {
            assert!(approx(*p, *t));
        }
        // minimum-norm solution splits the weight evenly
        assert!(approx(model.coefficients()[0], model.coefficients()[1]));
    }

    #[test]
    fn test_fit_is_deterministic() {
        let x = DMatrix::from_row_slice(
            6,
            3,
            &[
                0.3, 1.2, -0.7, 1.1, 0.4, 0.2, -0.5, 2.2, 1.3, 0.9, -1.4, 0.8, 2.0, 0.1, -0.3, 1.7,
                0.6, 0.5,
            ],
        );
        let y = DVector::from_column_slice(&[1.0, 2.5, 0.7, 3.1, 2.2, 1.9]);

        let first = LinearRegression::new().fit(&x, &y).unwrap();
        let second = LinearRegression::new().fit(&x, &y).unwrap();

        let bits = |m: &FittedLinearRegression| -> Vec<u64> {
            m.coefficients().iter().map(|c| c.to_bits()).collect()
        };
        assert_eq!(bits(&first), bits(&second));
        assert_eq!(first.intercept().to_bits(), second.intercept().to_bits());
    }

    #[test]
    fn test_predict_row_matches_matrix_predict() {
        let model = FittedLinearRegression::from_parts(vec![0.5, -2.0], 10.0).unwrap();
        let x = DMatrix::from_row_slice(1, 2, &[4.0, 1.0]);

        assert!(approx(model.predict_row(&[4.0, 1.0]).unwrap(), 10.0));
        assert!(approx(model.predict(&x).unwrap()[0], 10.0));
    }

    #[test]
    fn test_predict_row_rejects_wrong_width() {
        let model = FittedLinearRegression::from_parts(vec![1.0, 1.0], 0.0).unwrap();
        assert!(model.predict_row(&[1.0]).is_err());
    }

    #[test]
    fn test_fit_rejects_shape_mismatch() {
        let x = DMatrix::from_row_slice(2, 1, &[1.0, 2.0]);
        let y = DVector::from_column_slice(&[1.0]);
        assert!(LinearRegression::new().fit(&x, &y).is_err());
    }

    #[test]
    fn test_from_parts_rejects_nan() {
        assert!(FittedLinearRegression::from_parts(vec![f64::NAN], 0.0).is_err());
    }
}
