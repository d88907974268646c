//! Core traits for maximum-likelihood estimators.

use crate::core::{
    ChoiceDataset, DataError, EstimationResult, OptionsError, ParamError, ParameterSet, SpecError,
    UtilitySpec,
};
use thiserror::Error;

/// Errors that can occur while setting up or running an estimation.
///
/// Optimizer non-convergence is not an error: it is reported through
/// [`crate::core::ConvergenceStatus`] on an otherwise complete result, with
/// the last iterate and gradient norm attached.
#[derive(Debug, Error)]
pub enum EstimationError {
    #[error("invalid data: {0}")]
    Data(#[from] DataError),

    #[error("invalid specification: {0}")]
    Specification(#[from] SpecError),

    #[error("invalid parameters: {0}")]
    Parameters(#[from] ParamError),

    #[error("invalid options: {0}")]
    InvalidOptions(#[from] OptionsError),

    #[error("insufficient observations: need at least {needed}, got {got}")]
    InsufficientObservations { needed: usize, got: usize },

    #[error("numerical error: {0}")]
    NumericalError(String),
}

/// An estimator that can be fit to choice data.
///
/// Follows the fit-then-query pattern: fitting consumes nothing and returns
/// a fitted model holding the immutable estimation result.
pub trait Estimator {
    /// The type of the fitted model.
    type Fitted: FittedModel;

    /// Fit the model.
    ///
    /// # Arguments
    /// * `data` - choice observations
    /// * `spec` - utility and availability declarations per alternative
    /// * `params` - model parameters with starting values and fixed flags
    fn fit(
        &self,
        data: &ChoiceDataset,
        spec: &UtilitySpec,
        params: &ParameterSet,
    ) -> Result<Self::Fitted, EstimationError>;
}

/// A fitted discrete-choice model.
pub trait FittedModel {
    /// Access the estimation result.
    fn result(&self) -> &EstimationResult;

    /// Log-likelihood at the final iterate (convenience method).
    fn log_likelihood(&self) -> f64 {
        self.result().log_likelihood
    }

    /// McFadden rho-squared (convenience method).
    fn rho_squared(&self) -> f64 {
        self.result().rho_squared
    }

    /// Whether the optimizer converged (convenience method).
    fn converged(&self) -> bool {
        self.result().converged()
    }
}
