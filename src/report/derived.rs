//! Derived quantities from estimated coefficients.

use crate::core::EstimationResult;
use thiserror::Error;

/// Errors raised while computing derived quantities.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),
    #[error("cannot divide by {denominator}: its estimate is exactly zero (numerator {numerator})")]
    DivideByZero {
        numerator: String,
        denominator: String,
    },
}

/// Ratio of two estimated coefficients.
///
/// Fails if either name is unknown, or if the denominator estimate is
/// exactly zero.
pub fn coefficient_ratio(
    result: &EstimationResult,
    numerator: &str,
    denominator: &str,
) -> Result<f64, ReportError> {
    let num = result
        .value(numerator)
        .ok_or_else(|| ReportError::UnknownParameter(numerator.to_string()))?;
    let den = result
        .value(denominator)
        .ok_or_else(|| ReportError::UnknownParameter(denominator.to_string()))?;
    if den == 0.0 {
        return Err(ReportError::DivideByZero {
            numerator: numerator.to_string(),
            denominator: denominator.to_string(),
        });
    }
    Ok(num / den)
}

/// Value of time: the ratio of the time coefficient to the cost
/// coefficient, the willingness to pay (in cost units) to save one time
/// unit. Both coefficients are normally negative, making the ratio
/// positive.
pub fn value_of_time(
    result: &EstimationResult,
    time_parameter: &str,
    cost_parameter: &str,
) -> Result<f64, ReportError> {
    coefficient_ratio(result, time_parameter, cost_parameter)
}
