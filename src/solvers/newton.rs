//! Newton-Raphson maximization of the MNL log-likelihood.
//!
//! The solver iterates over the free parameters only, using the analytic
//! gradient and Hessian from the likelihood evaluator. Each iteration solves
//! the Newton system against the negative Hessian via Cholesky; a failed
//! factorization triggers escalating ridge inflation, and a step-halving
//! line search keeps the log-likelihood from decreasing. On convergence the
//! parameter covariance is the inverse negative Hessian at the optimum.

use crate::core::{
    ChoiceDataset, ConvergenceStatus, EstimationOptions, EstimationOptionsBuilder,
    EstimationResult, ParameterEstimate, ParameterSet, UtilitySpec,
};
use crate::inference::CoefficientInference;
use crate::likelihood::LogitModel;
use crate::solvers::traits::{EstimationError, Estimator, FittedModel};
use crate::utils::{cholesky, cholesky_inverse, cholesky_solve};
use faer::{Col, Mat};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Ridge escalation attempts before declaring the Hessian unusable.
const MAX_RIDGE_ATTEMPTS: usize = 6;

/// Step-halving attempts per iteration.
const MAX_STEP_HALVINGS: usize = 30;

/// Maximum-likelihood estimator for multinomial logit models.
#[derive(Debug, Clone, Default)]
pub struct NewtonEstimator {
    options: EstimationOptions,
}

impl NewtonEstimator {
    /// Create an estimator with the given options.
    pub fn new(options: EstimationOptions) -> Self {
        Self { options }
    }

    /// Create a builder.
    pub fn builder() -> NewtonEstimatorBuilder {
        NewtonEstimatorBuilder::default()
    }

    fn maximize(
        &self,
        model: &LogitModel<'_>,
        params: &ParameterSet,
    ) -> (Col<f64>, usize, f64, ConvergenceStatus) {
        let free = params.free_indices();
        let n_free = free.len();
        let tol = self.options.tolerance;
        let step_tol = self.options.step_tolerance;

        let mut values = params.start_values();
        let mut eval = model.evaluate(&values);
        let mut grad_norm = max_norm(&eval.gradient, &free);
        let mut iterations = 0;

        let status = loop {
            if grad_norm < tol {
                break ConvergenceStatus::Converged;
            }
            if iterations >= self.options.max_iterations {
                break ConvergenceStatus::MaxIterationsReached;
            }
            iterations += 1;

            // Newton system in the free sub-space: (-H) step = g.
            let g = Col::from_fn(n_free, |i| eval.gradient[free[i]]);
            let neg_hessian = Mat::from_fn(n_free, n_free, |i, j| {
                -eval.hessian[(free[i], free[j])]
            });

            let step = match solve_with_ridge(&neg_hessian, &g) {
                Some(step) => step,
                None => break ConvergenceStatus::HessianNotPositiveDefinite,
            };

            // Step-halving line search; candidates are clamped into the
            // parameter bounds.
            let mut scale = 1.0;
            let mut accepted = None;
            for _ in 0..MAX_STEP_HALVINGS {
                let mut candidate = values.clone();
                for (i, &idx) in free.iter().enumerate() {
                    candidate[idx] = params.clamp(idx, values[idx] + scale * step[i]);
                }
                let ll = model.log_likelihood(&candidate);
                if ll.is_finite() && ll >= eval.log_likelihood {
                    accepted = Some(candidate);
                    break;
                }
                scale *= 0.5;
            }

            let Some(candidate) = accepted else {
                // No ascent along the Newton direction: the iterate cannot
                // move, which is the parameter-step convergence criterion.
                break ConvergenceStatus::Converged;
            };

            let step_norm = free
                .iter()
                .map(|&idx| (candidate[idx] - values[idx]).abs())
                .fold(0.0_f64, f64::max);

            values = candidate;
            eval = model.evaluate(&values);
            grad_norm = max_norm(&eval.gradient, &free);

            if step_norm < step_tol {
                break ConvergenceStatus::Converged;
            }
        };

        (values, iterations, grad_norm, status)
    }

    fn build_result(
        &self,
        model: &LogitModel<'_>,
        params: &ParameterSet,
        values: &Col<f64>,
        iterations: usize,
        gradient_norm: f64,
        status: ConvergenceStatus,
    ) -> EstimationResult {
        let free = params.free_indices();
        let n_free = free.len();
        let n_obs = model.n_observations();

        let log_likelihood = model.log_likelihood(values);
        let null_log_likelihood = model.null_log_likelihood();

        let rho_squared = if null_log_likelihood < 0.0 {
            1.0 - log_likelihood / null_log_likelihood
        } else {
            f64::NAN
        };
        let adj_rho_squared = if null_log_likelihood < 0.0 {
            1.0 - (log_likelihood - n_free as f64) / null_log_likelihood
        } else {
            f64::NAN
        };

        let lr_statistic = (2.0 * (log_likelihood - null_log_likelihood)).max(0.0);
        let lr_pvalue = ChiSquared::new(n_free as f64)
            .map(|d| 1.0 - d.cdf(lr_statistic))
            .unwrap_or(f64::NAN);

        // Covariance: inverse negative Hessian at the final iterate.
        let covariance = if self.options.compute_inference {
            let eval = model.evaluate(values);
            let neg_hessian = Mat::from_fn(n_free, n_free, |i, j| {
                -eval.hessian[(free[i], free[j])]
            });
            cholesky(&neg_hessian).map(|l| cholesky_inverse(&l))
        } else {
            None
        };

        let inference = covariance.as_ref().map(|cov| {
            let free_estimates = Col::from_fn(n_free, |i| values[free[i]]);
            let se = CoefficientInference::standard_errors(cov);
            let z = CoefficientInference::z_statistics(&free_estimates, &se);
            let p = CoefficientInference::p_values(&z);
            let (lower, upper) = CoefficientInference::confidence_intervals(
                &free_estimates,
                &se,
                self.options.confidence_level,
            );
            (se, z, p, lower, upper)
        });

        let mut estimates = Vec::with_capacity(params.len());
        for (idx, param) in params.iter().enumerate() {
            let mut estimate = ParameterEstimate {
                name: param.name.clone(),
                estimate: values[idx],
                fixed: param.fixed,
                std_error: None,
                z_statistic: None,
                p_value: None,
                conf_interval: None,
            };
            if !param.fixed {
                if let Some((se, z, p, lower, upper)) = &inference {
                    let k = free.iter().position(|&f| f == idx).expect("free index");
                    estimate.std_error = Some(se[k]);
                    estimate.z_statistic = Some(z[k]);
                    estimate.p_value = Some(p[k]);
                    estimate.conf_interval = Some((lower[k], upper[k]));
                }
            }
            estimates.push(estimate);
        }

        EstimationResult {
            estimates,
            covariance,
            log_likelihood,
            null_log_likelihood,
            lr_statistic,
            lr_pvalue,
            rho_squared,
            adj_rho_squared,
            n_observations: n_obs,
            n_free_parameters: n_free,
            iterations,
            gradient_norm,
            status,
            confidence_level: self.options.confidence_level,
        }
    }
}

impl Estimator for NewtonEstimator {
    type Fitted = FittedLogit;

    fn fit(
        &self,
        data: &ChoiceDataset,
        spec: &UtilitySpec,
        params: &ParameterSet,
    ) -> Result<Self::Fitted, EstimationError> {
        self.options.validate()?;

        let model = LogitModel::new(data, spec, params)?;

        let n_free = params.n_free();
        if data.n_rows() < n_free {
            return Err(EstimationError::InsufficientObservations {
                needed: n_free,
                got: data.n_rows(),
            });
        }

        let start_ll = model.log_likelihood(&params.start_values());
        if !start_ll.is_finite() {
            return Err(EstimationError::NumericalError(
                "log-likelihood is not finite at the starting values".to_string(),
            ));
        }

        let (values, iterations, gradient_norm, status) = self.maximize(&model, params);
        let result = self.build_result(&model, params, &values, iterations, gradient_norm, status);

        Ok(FittedLogit { result, values })
    }
}

/// Gradient max-norm over the free indices.
fn max_norm(gradient: &Col<f64>, free: &[usize]) -> f64 {
    free.iter()
        .map(|&idx| gradient[idx].abs())
        .fold(0.0_f64, f64::max)
}

/// Solve `A x = b` by Cholesky, inflating the diagonal on factorization
/// failure. Returns `None` when the matrix stays non-positive-definite
/// through all attempts.
fn solve_with_ridge(a: &Mat<f64>, b: &Col<f64>) -> Option<Col<f64>> {
    let n = a.nrows();
    if let Some(l) = cholesky(a) {
        return Some(cholesky_solve(&l, b));
    }

    let max_diag = (0..n).map(|i| a[(i, i)].abs()).fold(0.0_f64, f64::max);
    let mut ridge = 1e-8 * (1.0 + max_diag);
    for _ in 0..MAX_RIDGE_ATTEMPTS {
        let inflated = Mat::from_fn(n, n, |i, j| {
            if i == j {
                a[(i, j)] + ridge
            } else {
                a[(i, j)]
            }
        });
        if let Some(l) = cholesky(&inflated) {
            return Some(cholesky_solve(&l, b));
        }
        ridge *= 10.0;
    }
    None
}

/// A fitted multinomial logit model.
#[derive(Debug, Clone)]
pub struct FittedLogit {
    result: EstimationResult,
    values: Col<f64>,
}

impl FittedLogit {
    /// Full parameter vector at the final iterate (fixed entries included).
    pub fn values(&self) -> &Col<f64> {
        &self.values
    }

    /// Newton-Raphson iterations performed.
    pub fn iterations(&self) -> usize {
        self.result.iterations
    }
}

impl FittedModel for FittedLogit {
    fn result(&self) -> &EstimationResult {
        &self.result
    }
}

/// Builder for `NewtonEstimator`.
#[derive(Debug, Clone, Default)]
pub struct NewtonEstimatorBuilder {
    options_builder: EstimationOptionsBuilder,
}

impl NewtonEstimatorBuilder {
    /// Set the maximum number of Newton-Raphson iterations.
    pub fn max_iterations(mut self, max_iter: usize) -> Self {
        self.options_builder = self.options_builder.max_iterations(max_iter);
        self
    }

    /// Set the convergence tolerance on the gradient max-norm.
    pub fn tolerance(mut self, tol: f64) -> Self {
        self.options_builder = self.options_builder.tolerance(tol);
        self
    }

    /// Set the convergence tolerance on the parameter step max-norm.
    pub fn step_tolerance(mut self, tol: f64) -> Self {
        self.options_builder = self.options_builder.step_tolerance(tol);
        self
    }

    /// Set whether to compute inference statistics.
    pub fn compute_inference(mut self, compute: bool) -> Self {
        self.options_builder = self.options_builder.compute_inference(compute);
        self
    }

    /// Set the confidence level for confidence intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.options_builder = self.options_builder.confidence_level(level);
        self
    }

    /// Build the estimator. Options are validated when `fit` runs.
    pub fn build(self) -> NewtonEstimator {
        NewtonEstimator {
            options: self.options_builder.build_unchecked(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Expr;
    use crate::core::Parameter;

    /// ASC-only model over two alternatives: the MLE has the closed form
    /// asc_b = ln(n_b / n_a).
    fn asc_only_inputs(n_a: usize, n_b: usize) -> (ChoiceDataset, UtilitySpec, ParameterSet) {
        let n = n_a + n_b;
        let mut data = ChoiceDataset::new("choice");
        data.add_column(
            "choice",
            (0..n).map(|i| if i < n_a { 1.0 } else { 2.0 }).collect(),
        )
        .unwrap();
        data.add_column("av", vec![1.0; n]).unwrap();

        let mut spec = UtilitySpec::new();
        spec.add_alternative(1, Expr::parameter("asc_a"), Expr::variable("av"))
            .unwrap();
        spec.add_alternative(2, Expr::parameter("asc_b"), Expr::variable("av"))
            .unwrap();

        let mut params = ParameterSet::new();
        params.add(Parameter::fixed("asc_a", 0.0)).unwrap();
        params.add(Parameter::new("asc_b", 0.0)).unwrap();

        (data, spec, params)
    }

    #[test]
    fn test_asc_only_closed_form() {
        let (data, spec, params) = asc_only_inputs(60, 40);

        let fitted = NewtonEstimator::builder()
            .build()
            .fit(&data, &spec, &params)
            .unwrap();

        assert!(fitted.converged());
        let asc_b = fitted.result().value("asc_b").unwrap();
        assert!((asc_b - (40.0_f64 / 60.0).ln()).abs() < 1e-6);

        // SE(asc_b) = sqrt(1/n_a + 1/n_b) for the two-alternative case.
        let se = fitted.result().std_error("asc_b").unwrap();
        assert!((se - (1.0 / 60.0 + 1.0 / 40.0_f64).sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_non_convergence_is_a_status_not_an_error() {
        let (data, spec, params) = asc_only_inputs(60, 40);

        let fitted = NewtonEstimator::builder()
            .max_iterations(1)
            .tolerance(1e-15)
            .step_tolerance(1e-18)
            .build()
            .fit(&data, &spec, &params)
            .unwrap();

        // One iteration of Newton on this model is not exact at these
        // tolerances; the run must still produce a usable result.
        assert_eq!(
            fitted.result().status,
            ConvergenceStatus::MaxIterationsReached
        );
        assert_eq!(fitted.iterations(), 1);
        assert!(fitted.result().gradient_norm.is_finite());
        assert!(fitted.result().value("asc_b").is_some());
    }

    #[test]
    fn test_inference_can_be_disabled() {
        let (data, spec, params) = asc_only_inputs(60, 40);

        let fitted = NewtonEstimator::builder()
            .compute_inference(false)
            .build()
            .fit(&data, &spec, &params)
            .unwrap();

        assert!(fitted.result().covariance.is_none());
        assert!(fitted.result().std_error("asc_b").is_none());
    }

    #[test]
    fn test_insufficient_observations() {
        let mut data = ChoiceDataset::new("choice");
        data.add_column("choice", vec![1.0]).unwrap();
        data.add_column("x", vec![2.0]).unwrap();
        data.add_column("av", vec![1.0]).unwrap();

        let mut spec = UtilitySpec::new();
        spec.add_alternative(1, Expr::parameter("asc_a"), Expr::variable("av"))
            .unwrap();
        spec.add_alternative(
            2,
            Expr::parameter("asc_b") + Expr::parameter("beta") * Expr::variable("x"),
            Expr::variable("av"),
        )
        .unwrap();

        let mut params = ParameterSet::new();
        params.add(Parameter::fixed("asc_a", 0.0)).unwrap();
        params.add(Parameter::new("asc_b", 0.0)).unwrap();
        params.add(Parameter::new("beta", 0.0)).unwrap();

        // One row, two free parameters.
        let result = NewtonEstimator::builder().build().fit(&data, &spec, &params);
        assert!(matches!(
            result,
            Err(EstimationError::InsufficientObservations { needed: 2, got: 1 })
        ));
    }

    #[test]
    fn test_fixed_parameters_stay_pinned() {
        let (data, spec, params) = asc_only_inputs(30, 70);

        let fitted = NewtonEstimator::builder()
            .build()
            .fit(&data, &spec, &params)
            .unwrap();

        let asc_a = fitted.result().estimate("asc_a").unwrap();
        assert!(asc_a.fixed);
        assert_eq!(asc_a.estimate, 0.0);
        assert!(asc_a.std_error.is_none());
    }

    #[test]
    fn test_solve_with_ridge_recovers_semidefinite_system() {
        // Singular but positive semidefinite: ridge inflation makes it
        // solvable.
        let a = Mat::from_fn(2, 2, |_, _| 1.0);
        let b = Col::from_fn(2, |_| 1.0);
        let step = solve_with_ridge(&a, &b);
        assert!(step.is_some());
    }
}
