//! Plain-text rendering of estimation results.

use crate::core::{ConvergenceStatus, EstimationResult};
use std::fmt;
use std::fmt::Write as _;

/// Render a complete human-readable estimation summary.
///
/// The same text is produced by the `Display` impl on
/// [`EstimationResult`]; this function exists for callers that want to
/// write the summary to a report file.
pub fn summary(result: &EstimationResult) -> String {
    let mut out = String::new();

    let status = match result.status {
        ConvergenceStatus::Converged => "converged",
        ConvergenceStatus::MaxIterationsReached => "NOT CONVERGED (iteration limit)",
        ConvergenceStatus::HessianNotPositiveDefinite => {
            "NOT CONVERGED (Hessian not positive definite)"
        }
    };

    let _ = writeln!(out, "=== Estimation Results ===");
    let _ = writeln!(
        out,
        "Status: {} after {} iterations (gradient norm {:.3e})",
        status, result.iterations, result.gradient_norm
    );
    let _ = writeln!(out);

    let name_width = result
        .estimates
        .iter()
        .map(|e| e.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let _ = writeln!(
        out,
        "{:<width$}  {:>12}  {:>12}  {:>8}  {:>10}",
        "Name",
        "Estimate",
        "Std.Err.",
        "z-stat",
        "p-value",
        width = name_width
    );
    for e in &result.estimates {
        if e.fixed {
            let _ = writeln!(
                out,
                "{:<width$}  {:>12.6}  {:>12}  {:>8}  {:>10}",
                e.name,
                e.estimate,
                "(fixed)",
                "-",
                "-",
                width = name_width
            );
        } else {
            let fmt_opt = |v: Option<f64>, prec: usize| match v {
                Some(v) => format!("{v:.prec$}"),
                None => "-".to_string(),
            };
            let _ = writeln!(
                out,
                "{:<width$}  {:>12.6}  {:>12}  {:>8}  {:>10}",
                e.name,
                e.estimate,
                fmt_opt(e.std_error, 6),
                fmt_opt(e.z_statistic, 3),
                fmt_opt(e.p_value, 4),
                width = name_width
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Observations:          {}", result.n_observations);
    let _ = writeln!(out, "Free parameters:       {}", result.n_free_parameters);
    let _ = writeln!(out, "Log-likelihood:        {:.4}", result.log_likelihood);
    let _ = writeln!(
        out,
        "Null log-likelihood:   {:.4}",
        result.null_log_likelihood
    );
    let _ = writeln!(
        out,
        "LR test (vs null):     {:.4} (p = {:.4})",
        result.lr_statistic, result.lr_pvalue
    );
    let _ = writeln!(out, "Rho-squared:           {:.4}", result.rho_squared);
    let _ = writeln!(out, "Adj. rho-squared:      {:.4}", result.adj_rho_squared);

    out
}

impl fmt::Display for EstimationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&summary(self))
    }
}
