//! Ordinary least-squares multiple linear regression.
//!
//! The model always carries an intercept: for `k` independent series the
//! design matrix is `n × (k + 1)` with a leading column of ones. It is solved
//! by Householder QR (`X = QR`, `R β = Qᵀ y`).

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// |R_ii| below this fraction of the largest diagonal entry means the
/// design matrix is rank deficient.
const RANK_TOLERANCE: f64 = 1e-10;

/// Result of an OLS fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OlsFit {
    /// Intercept followed by one slope per independent series.
    pub parameters: Vec<f64>,
    pub r_squared: f64,
    pub adjusted_r_squared: f64,
    /// Σ (y − ŷ)²
    pub residual_sum_of_squares: f64,
    /// Σ (y − ȳ)²
    pub total_sum_of_squares: f64,
    pub observations: usize,
}

impl OlsFit {
    pub fn intercept(&self) -> f64 {
        self.parameters[0]
    }

    pub fn slopes(&self) -> &[f64] {
        &self.parameters[1..]
    }

    /// Fitted value for one row of independent values.
    pub fn predict(&self, x: &[f64]) -> f64 {
        self.intercept()
            + self
                .slopes()
                .iter()
                .zip(x.iter())
                .map(|(b, v)| b * v)
                .sum::<f64>()
    }
}

/// Fit `y ~ 1 + x[0] + x[1] + ...`.
///
/// `x` holds one series per independent variable, each as long as `y`.
pub fn fit(y: &[f64], x: &[Vec<f64>]) -> ModelResult<OlsFit> {
    let n = y.len();
    let p = x.len() + 1;
    debug_assert!(x.iter().all(|col| col.len() == n));

    if n <= p {
        return Err(ModelError::InsufficientObservations {
            observations: n,
            parameters: p,
        });
    }

    let mean_y = y.iter().sum::<f64>() / n as f64;
    let total_sum_of_squares: f64 = y.iter().map(|v| (v - mean_y).powi(2)).sum();
    if total_sum_of_squares == 0.0 {
        return Err(ModelError::ConstantDependent);
    }

    let design = DMatrix::from_fn(n, p, |row, col| if col == 0 { 1.0 } else { x[col - 1][row] });
    let response = DVector::from_column_slice(y);

    let qr = design.clone().qr();
    let r = qr.r();
    let largest = r.diagonal().amax();
    if largest == 0.0 || r.diagonal().iter().any(|d| d.abs() <= RANK_TOLERANCE * largest) {
        return Err(ModelError::SingularDesign);
    }

    let qty = qr.q().transpose() * &response;
    let beta = r
        .solve_upper_triangular(&qty)
        .ok_or(ModelError::SingularDesign)?;

    let residuals = &response - &design * &beta;
    let residual_sum_of_squares = residuals.norm_squared();

    let r_squared = 1.0 - residual_sum_of_squares / total_sum_of_squares;
    let adjusted_r_squared = 1.0
        - (residual_sum_of_squares * (n - 1) as f64) / (total_sum_of_squares * (n - p) as f64);

    Ok(OlsFit {
        parameters: beta.iter().copied().collect(),
        r_squared,
        adjusted_r_squared,
        residual_sum_of_squares,
        total_sum_of_squares,
        observations: n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn recovers_exact_plane() {
        // y = 3 + 2 a - 0.5 b
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let b = vec![2.0, 1.0, 4.0, 3.0, 6.0, 5.0];
        let y: Vec<f64> = a.iter().zip(&b).map(|(a, b)| 3.0 + 2.0 * a - 0.5 * b).collect();

        let fit = fit(&y, &[a, b]).unwrap();
        assert_abs_diff_eq!(fit.intercept(), 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.slopes()[0], 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.slopes()[1], -0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.r_squared, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.adjusted_r_squared, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.predict(&[10.0, 4.0]), 21.0, epsilon = 1e-9);
    }

    #[test]
    fn simple_regression_matches_closed_form() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![2.0, 4.0, 5.0, 4.0, 5.0];
        let fit = fit(&y, &[x]).unwrap();

        // slope = Sxy / Sxx = 6 / 10, intercept = 4 - 0.6 * 3
        assert_abs_diff_eq!(fit.slopes()[0], 0.6, epsilon = 1e-10);
        assert_abs_diff_eq!(fit.intercept(), 2.2, epsilon = 1e-10);
        // R² is r² for one regressor: 36 / 60
        assert_abs_diff_eq!(fit.r_squared, 0.6, epsilon = 1e-10);
        assert_abs_diff_eq!(fit.adjusted_r_squared, 1.0 - 0.4 * 4.0 / 3.0, epsilon = 1e-10);
        assert_abs_diff_eq!(fit.total_sum_of_squares, 6.0, epsilon = 1e-10);
        assert_abs_diff_eq!(fit.residual_sum_of_squares, 2.4, epsilon = 1e-10);
    }

    #[test]
    fn rejects_degenerate_problems() {
        let x = vec![1.0, 2.0, 3.0];
        assert_eq!(
            fit(&[1.0, 2.0], &[vec![1.0, 2.0]]),
            Err(ModelError::InsufficientObservations {
                observations: 2,
                parameters: 2
            })
        );
        assert_eq!(
            fit(&[5.0, 5.0, 5.0], &[x]),
            Err(ModelError::ConstantDependent)
        );

        let y = vec![1.0, 3.0, 2.0, 5.0];
        let a = vec![1.0, 2.0, 3.0, 4.0];
        let b: Vec<f64> = a.iter().map(|v| v * 2.0).collect();
        assert_eq!(fit(&y, &[a, b]), Err(ModelError::SingularDesign));
    }
}
