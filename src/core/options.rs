//! Estimation options and configuration.

use thiserror::Error;

/// Configuration options for maximum-likelihood estimation.
#[derive(Debug, Clone)]
pub struct EstimationOptions {
    /// Maximum Newton-Raphson iterations (default: 100).
    pub max_iterations: usize,
    /// Convergence tolerance on the gradient max-norm (default: 1e-6).
    pub tolerance: f64,
    /// Convergence tolerance on the parameter step max-norm (default: 1e-8).
    pub step_tolerance: f64,
    /// Whether to compute standard errors and inference statistics (default: true).
    pub compute_inference: bool,
    /// Confidence level for confidence intervals (default: 0.95).
    pub confidence_level: f64,
}

impl Default for EstimationOptions {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-6,
            step_tolerance: 1e-8,
            compute_inference: true,
            confidence_level: 0.95,
        }
    }
}

/// Errors that can occur when validating estimation options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("max_iterations must be at least 1, got {0}")]
    InvalidMaxIterations(usize),
    #[error("tolerance must be positive, got {0}")]
    InvalidTolerance(f64),
    #[error("step_tolerance must be positive, got {0}")]
    InvalidStepTolerance(f64),
    #[error("confidence_level must be in (0, 1), got {0}")]
    InvalidConfidenceLevel(f64),
}

impl EstimationOptions {
    /// Create a new builder for estimation options.
    pub fn builder() -> EstimationOptionsBuilder {
        EstimationOptionsBuilder::default()
    }

    /// Validate the options and return an error if invalid.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.max_iterations < 1 {
            return Err(OptionsError::InvalidMaxIterations(self.max_iterations));
        }
        if !(self.tolerance > 0.0) {
            return Err(OptionsError::InvalidTolerance(self.tolerance));
        }
        if !(self.step_tolerance > 0.0) {
            return Err(OptionsError::InvalidStepTolerance(self.step_tolerance));
        }
        if self.confidence_level <= 0.0 || self.confidence_level >= 1.0 {
            return Err(OptionsError::InvalidConfidenceLevel(self.confidence_level));
        }
        Ok(())
    }
}

/// Builder for `EstimationOptions`.
#[derive(Debug, Clone, Default)]
pub struct EstimationOptionsBuilder {
    options: EstimationOptions,
}

impl EstimationOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of Newton-Raphson iterations.
    pub fn max_iterations(mut self, max_iter: usize) -> Self {
        self.options.max_iterations = max_iter;
        self
    }

    /// Set the convergence tolerance on the gradient max-norm.
    pub fn tolerance(mut self, tol: f64) -> Self {
        self.options.tolerance = tol;
        self
    }

    /// Set the convergence tolerance on the parameter step max-norm.
    pub fn step_tolerance(mut self, tol: f64) -> Self {
        self.options.step_tolerance = tol;
        self
    }

    /// Set whether to compute inference statistics.
    pub fn compute_inference(mut self, compute: bool) -> Self {
        self.options.compute_inference = compute;
        self
    }

    /// Set the confidence level for confidence intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.options.confidence_level = level;
        self
    }

    /// Build and validate the options.
    pub fn build(self) -> Result<EstimationOptions, OptionsError> {
        self.options.validate()?;
        Ok(self.options)
    }

    /// Build the options without validation.
    pub fn build_unchecked(self) -> EstimationOptions {
        self.options
    }
}
