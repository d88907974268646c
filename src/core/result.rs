//! Estimation result structures.

use faer::Mat;

/// Terminal state of the Newton-Raphson run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceStatus {
    /// Gradient or step norm fell below tolerance.
    Converged,
    /// Iteration budget exhausted; the result carries the last iterate and
    /// gradient norm.
    MaxIterationsReached,
    /// The negative Hessian was not positive definite and ridge recovery
    /// failed; the result carries the last iterate.
    HessianNotPositiveDefinite,
}

/// One parameter's estimate and inference statistics.
///
/// Fixed parameters report their pinned value and carry no inference
/// statistics.
#[derive(Debug, Clone)]
pub struct ParameterEstimate {
    /// Parameter name.
    pub name: String,
    /// Point estimate (pinned value for fixed parameters).
    pub estimate: f64,
    /// Whether the parameter was excluded from optimization.
    pub fixed: bool,
    /// Asymptotic standard error.
    pub std_error: Option<f64>,
    /// z-statistic (estimate / standard error).
    pub z_statistic: Option<f64>,
    /// Two-sided p-value against zero.
    pub p_value: Option<f64>,
    /// Confidence interval at the configured level.
    pub conf_interval: Option<(f64, f64)>,
}

/// Complete result of a maximum-likelihood estimation run.
///
/// Produced once per run and immutable thereafter.
#[derive(Debug, Clone)]
pub struct EstimationResult {
    // ========== Parameter estimates ==========
    /// Per-parameter estimates, in parameter-set order.
    pub estimates: Vec<ParameterEstimate>,

    /// Covariance matrix of the free parameters (inverse negative Hessian),
    /// in free-index order. Present when inference was computed and the
    /// Hessian was invertible at the final iterate.
    pub covariance: Option<Mat<f64>>,

    // ========== Fit statistics ==========
    /// Log-likelihood at the final iterate.
    pub log_likelihood: f64,

    /// Log-likelihood of the null (equal-shares) model.
    pub null_log_likelihood: f64,

    /// Likelihood-ratio statistic against the null model.
    pub lr_statistic: f64,

    /// Chi-squared p-value of the likelihood-ratio statistic.
    pub lr_pvalue: f64,

    /// McFadden rho-squared: 1 - LL / LL0.
    pub rho_squared: f64,

    /// Adjusted rho-squared: 1 - (LL - K) / LL0 with K free parameters.
    pub adj_rho_squared: f64,

    // ========== Run diagnostics ==========
    /// Number of observations.
    pub n_observations: usize,

    /// Number of free parameters.
    pub n_free_parameters: usize,

    /// Newton-Raphson iterations performed.
    pub iterations: usize,

    /// Gradient max-norm at the final iterate.
    pub gradient_norm: f64,

    /// Terminal optimizer state.
    pub status: ConvergenceStatus,

    /// Confidence level used for the intervals.
    pub confidence_level: f64,
}

impl EstimationResult {
    /// Whether the run converged.
    pub fn converged(&self) -> bool {
        self.status == ConvergenceStatus::Converged
    }

    /// Look up a parameter's estimate block by name.
    pub fn estimate(&self, name: &str) -> Option<&ParameterEstimate> {
        self.estimates.iter().find(|e| e.name == name)
    }

    /// Point estimate for a named parameter.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.estimate(name).map(|e| e.estimate)
    }

    /// Standard error for a named parameter, if inference was computed.
    pub fn std_error(&self, name: &str) -> Option<f64> {
        self.estimate(name).and_then(|e| e.std_error)
    }
}
