//! Coefficient inference calculations.
//!
//! Maximum-likelihood estimates are asymptotically normal, so tests and
//! intervals use the standard normal rather than a t-distribution.

use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, Normal};

/// Computes inference statistics for estimated coefficients.
pub struct CoefficientInference;

impl CoefficientInference {
    /// Standard errors from the diagonal of the parameter covariance matrix.
    ///
    /// SE(θ_k) = sqrt(cov_{kk}); a negative diagonal entry (numerically
    /// broken covariance) yields NaN rather than a panic.
    pub fn standard_errors(covariance: &Mat<f64>) -> Col<f64> {
        let n = covariance.nrows();
        Col::from_fn(n, |k| {
            let var = covariance[(k, k)];
            if var >= 0.0 {
                var.sqrt()
            } else {
                f64::NAN
            }
        })
    }

    /// z-statistics: θ_k / SE(θ_k).
    pub fn z_statistics(estimates: &Col<f64>, std_errors: &Col<f64>) -> Col<f64> {
        let n = estimates.nrows();
        Col::from_fn(n, |k| {
            if std_errors[k].is_nan() || std_errors[k] == 0.0 {
                f64::NAN
            } else {
                estimates[k] / std_errors[k]
            }
        })
    }

    /// Two-sided p-values from z-statistics: 2 * P(|Z| > |z_k|).
    pub fn p_values(z_statistics: &Col<f64>) -> Col<f64> {
        let normal = Normal::new(0.0, 1.0).expect("valid standard normal parameters");
        let n = z_statistics.nrows();
        Col::from_fn(n, |k| {
            if z_statistics[k].is_nan() {
                f64::NAN
            } else {
                2.0 * (1.0 - normal.cdf(z_statistics[k].abs()))
            }
        })
    }

    /// Normal-approximation confidence intervals at the given level.
    pub fn confidence_intervals(
        estimates: &Col<f64>,
        std_errors: &Col<f64>,
        level: f64,
    ) -> (Col<f64>, Col<f64>) {
        let normal = Normal::new(0.0, 1.0).expect("valid standard normal parameters");
        let alpha = 1.0 - level;
        let z = normal.inverse_cdf(1.0 - alpha / 2.0);

        let n = estimates.nrows();
        let lower = Col::from_fn(n, |k| estimates[k] - z * std_errors[k]);
        let upper = Col::from_fn(n, |k| estimates[k] + z * std_errors[k]);
        (lower, upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_errors_from_diagonal() {
        let cov = Mat::from_fn(2, 2, |i, j| if i == j { 0.04 } else { 0.01 });
        let se = CoefficientInference::standard_errors(&cov);
        assert!((se[0] - 0.2).abs() < 1e-12);
        assert!((se[1] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_negative_variance_yields_nan() {
        let cov = Mat::from_fn(1, 1, |_, _| -1.0);
        let se = CoefficientInference::standard_errors(&cov);
        assert!(se[0].is_nan());
    }

    #[test]
    fn test_z_statistics() {
        let estimates = Col::from_fn(2, |k| if k == 0 { -0.4 } else { 1.0 });
        let se = Col::from_fn(2, |k| if k == 0 { 0.2 } else { 0.0 });

        let z = CoefficientInference::z_statistics(&estimates, &se);
        assert!((z[0] - -2.0).abs() < 1e-12);
        assert!(z[1].is_nan()); // zero SE
    }

    #[test]
    fn test_p_values_two_sided() {
        let z = Col::from_fn(1, |_| 1.959963984540054);
        let p = CoefficientInference::p_values(&z);
        assert!((p[0] - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_intervals_95() {
        let estimates = Col::from_fn(1, |_| 1.0);
        let se = Col::from_fn(1, |_| 0.5);

        let (lower, upper) = CoefficientInference::confidence_intervals(&estimates, &se, 0.95);
        assert!((lower[0] - (1.0 - 1.959963984540054 * 0.5)).abs() < 1e-9);
        assert!((upper[0] - (1.0 + 1.959963984540054 * 0.5)).abs() < 1e-9);
    }
}
