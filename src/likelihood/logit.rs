//! The MNL log-likelihood, gradient, and Hessian.
//!
//! For one observation with available set `A`, the choice probability is
//!
//! ```text
//! P(i | A) = exp(V_i) / sum_{j in A} exp(V_j)
//! ```
//!
//! The maximum available utility is subtracted before exponentiation, so
//! large utilities never overflow. The log-likelihood is the sum over
//! observations of `log P(chosen | A)`; with utilities linear in the
//! parameters, gradient and Hessian have closed forms in the per-alternative
//! utility derivatives.

use crate::core::{BoundSpec, ChoiceDataset, ParameterSet, UtilitySpec};
use crate::solvers::EstimationError;
use faer::{Col, Mat};

/// Log-likelihood value with its derivatives over the full parameter vector.
#[derive(Debug, Clone)]
pub(crate) struct LikelihoodEval {
    pub log_likelihood: f64,
    pub gradient: Col<f64>,
    pub hessian: Mat<f64>,
}

/// A multinomial logit model bound to a dataset.
///
/// Binding validates the specification against the parameter set
/// (identification), resolves variable references against the dataset, and
/// checks every row's chosen alternative for availability. Evaluation is a
/// pure function of the parameter vector and the (immutable) data.
pub struct LogitModel<'a> {
    data: &'a ChoiceDataset,
    params: &'a ParameterSet,
    bound: BoundSpec,
    n_params: usize,
}

impl<'a> LogitModel<'a> {
    /// Bind a specification to a dataset and parameter set.
    pub fn new(
        data: &'a ChoiceDataset,
        spec: &'a UtilitySpec,
        params: &'a ParameterSet,
    ) -> Result<Self, EstimationError> {
        data.validate()?;
        spec.validate(params)?;
        let bound = spec.bind(params, data)?;
        bound.validate_rows(data)?;
        Ok(Self {
            data,
            params,
            bound,
            n_params: params.len(),
        })
    }

    /// Number of observations.
    pub fn n_observations(&self) -> usize {
        self.data.n_rows()
    }

    /// The parameter set this model was bound against.
    pub fn params(&self) -> &ParameterSet {
        self.params
    }

    /// Log-likelihood at the given full parameter vector.
    pub fn log_likelihood(&self, values: &Col<f64>) -> f64 {
        let mut ll = 0.0;
        for row in 0..self.data.n_rows() {
            ll += self.row_log_probability(values, row);
        }
        ll
    }

    /// Log-likelihood of the null model: equal shares over the available
    /// set, `sum_n -ln |A_n|`.
    pub fn null_log_likelihood(&self) -> f64 {
        let mut ll = 0.0;
        for row in 0..self.data.n_rows() {
            let n_avail = (0..self.bound.alts.len())
                .filter(|&alt| self.bound.is_available(alt, self.data, row))
                .count();
            ll -= (n_avail as f64).ln();
        }
        ll
    }

    /// Choice probabilities for one observation, over the available
    /// alternatives only, as `(alternative id, probability)` pairs.
    pub fn probabilities(&self, values: &Col<f64>, row: usize) -> Vec<(i64, f64)> {
        let var = |j: usize| self.data.value(j, row);

        let mut utilities = Vec::new();
        for (alt, bound_alt) in self.bound.alts.iter().enumerate() {
            if self.bound.is_available(alt, self.data, row) {
                utilities.push((bound_alt.id, bound_alt.utility.value(values, &var)));
            }
        }

        let max_v = utilities
            .iter()
            .map(|&(_, v)| v)
            .fold(f64::NEG_INFINITY, f64::max);
        let denom: f64 = utilities.iter().map(|&(_, v)| (v - max_v).exp()).sum();

        utilities
            .into_iter()
            .map(|(id, v)| (id, (v - max_v).exp() / denom))
            .collect()
    }

    /// Log choice probability of the chosen alternative in one row.
    fn row_log_probability(&self, values: &Col<f64>, row: usize) -> f64 {
        let var = |j: usize| self.data.value(j, row);
        // Chosen id was validated at binding.
        let chosen = self.data.chosen(row).expect("validated at binding");
        let chosen_alt = self
            .bound
            .alternative_index(chosen)
            .expect("validated at binding");

        let mut max_v = f64::NEG_INFINITY;
        let mut utilities = Vec::with_capacity(self.bound.alts.len());
        for (alt, bound_alt) in self.bound.alts.iter().enumerate() {
            if self.bound.is_available(alt, self.data, row) {
                let v = bound_alt.utility.value(values, &var);
                max_v = max_v.max(v);
                utilities.push((alt, v));
            }
        }

        let log_denom: f64 = utilities
            .iter()
            .map(|&(_, v)| (v - max_v).exp())
            .sum::<f64>()
            .ln();
        let v_chosen = utilities
            .iter()
            .find(|&&(alt, _)| alt == chosen_alt)
            .map(|&(_, v)| v)
            .expect("chosen availability validated at binding");

        v_chosen - max_v - log_denom
    }

    /// Log-likelihood with analytic gradient and Hessian over the full
    /// parameter vector.
    ///
    /// With `x_{jk} = dV_j/dtheta_k`:
    ///
    /// ```text
    /// dLL/dtheta_k   = sum_n [ x_{chosen,k} - sum_j P_j x_{jk} ]
    /// d2LL/dtheta_kl = -sum_n [ sum_j P_j x_{jk} x_{jl} - xbar_k xbar_l ]
    /// ```
    pub(crate) fn evaluate(&self, values: &Col<f64>) -> LikelihoodEval {
        let k = self.n_params;
        let mut ll = 0.0;
        let mut gradient = Col::zeros(k);
        let mut hessian = Mat::zeros(k, k);

        for row in 0..self.data.n_rows() {
            let var = |j: usize| self.data.value(j, row);
            let chosen = self.data.chosen(row).expect("validated at binding");
            let chosen_alt = self
                .bound
                .alternative_index(chosen)
                .expect("validated at binding");

            // Utilities and their parameter derivatives over the available set.
            let mut alts = Vec::with_capacity(self.bound.alts.len());
            let mut max_v = f64::NEG_INFINITY;
            for (alt, bound_alt) in self.bound.alts.iter().enumerate() {
                if !self.bound.is_available(alt, self.data, row) {
                    continue;
                }
                let v = bound_alt.utility.value(values, &var);
                let mut x = Col::zeros(k);
                bound_alt
                    .utility
                    .accumulate_gradient(values, &var, 1.0, &mut x);
                max_v = max_v.max(v);
                alts.push((alt, v, x));
            }

            let denom: f64 = alts.iter().map(|(_, v, _)| (v - max_v).exp()).sum();

            // Probabilities and the probability-weighted mean derivative.
            let mut xbar: Col<f64> = Col::zeros(k);
            let mut probs = Vec::with_capacity(alts.len());
            for (_, v, x) in &alts {
                let p = (v - max_v).exp() / denom;
                for i in 0..k {
                    xbar[i] += p * x[i];
                }
                probs.push(p);
            }

            let (chosen_v, chosen_x) = alts
                .iter()
                .find(|(alt, _, _)| *alt == chosen_alt)
                .map(|(_, v, x)| (*v, x))
                .expect("chosen availability validated at binding");

            ll += chosen_v - max_v - denom.ln();
            for i in 0..k {
                gradient[i] += chosen_x[i] - xbar[i];
            }
            for ((_, _, x), &p) in alts.iter().zip(probs.iter()) {
                for i in 0..k {
                    for j in 0..k {
                        hessian[(i, j)] -= p * x[i] * x[j];
                    }
                }
            }
            for i in 0..k {
                for j in 0..k {
                    hessian[(i, j)] += xbar[i] * xbar[j];
                }
            }
        }

        LikelihoodEval {
            log_likelihood: ll,
            gradient,
            hessian,
        }
    }
}
