//! Regression evaluation metrics

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Goodness-of-fit summary for one evaluation split
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub r2: f64,
    pub mae: f64,
    pub rmse: f64,
    pub n_samples: usize,
}

impl RegressionMetrics {
    /// Compare predictions against ground truth.
    ///
    /// R² of a constant target is 1.0 for a perfect fit and 0.0 otherwise.
    pub fn evaluate(y_true: &[f64], y_pred: &[f64]) -> Result<Self, DomainError> {
        if y_true.len() != y_pred.len() {
            return Err(DomainError::validation(format!(
                "Cannot evaluate {} predictions against {} targets",
                y_pred.len(),
                y_true.len()
            )));
        }

        if y_true.is_empty() {
            return Err(DomainError::validation("Cannot evaluate an empty split"));
        }

        let n = y_true.len() as f64;
        let mean = y_true.iter().sum::<f64>() / n;

        let mut abs_error = 0.0;
        let mut ss_res = 0.0;
        let mut ss_tot = 0.0;

        for (t, p) in y_true.iter().zip(y_pred) {
            let residual = t - p;
            abs_error += residual.abs();
            ss_res += residual * residual;
            ss_tot += (t - mean) * (t - mean);
        }

        let r2 = if ss_tot == 0.0 {
            if ss_res == 0.0 { 1.0 } else { 0.0 }
        } else {
            1.0 - ss_res / ss_tot
        };

        Ok(Self {
            r2,
            mae: abs_error / n,
            rmse: (ss_res / n).sqrt(),
            n_samples: y_true.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_fit() {
        let y = [1.0, 2.0, 3.0];
        let metrics = RegressionMetrics::evaluate(&y, &y).unwrap();

        assert_eq!(metrics.r2, 1.0);
        assert_eq!(metrics.mae, 0.0);
        assert_eq!(metrics.rmse, 0.0);
        assert_eq!(metrics.n_samples, 3);
    }

    #[test]
    fn test_known_errors() {
        let metrics = RegressionMetrics::evaluate(&[1.0, 2.0, 3.0, 4.0], &[2.0, 2.0, 3.0, 2.0]).unwrap();

        // residuals: -1, 0, 0, 2
        assert!((metrics.mae - 0.75).abs() < 1e-12);
        assert!((metrics.rmse - 1.25_f64.sqrt()).abs() < 1e-12);
        // ss_res = 5, ss_tot = 5
        assert!(metrics.r2.abs() < 1e-12);
    }

    #[test]
    fn test_constant_target() {
        let metrics = RegressionMetrics::evaluate(&[5.0, 5.0], &[4.0, 6.0]).unwrap();
        assert_eq!(metrics.r2, 0.0);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(RegressionMetrics::evaluate(&[1.0], &[1.0, 2.0]).is_err());
        assert!(RegressionMetrics::evaluate(&[], &[]).is_err());
    }
}
