//! Maximum-likelihood estimators.

mod newton;
mod traits;

pub use newton::{FittedLogit, NewtonEstimator, NewtonEstimatorBuilder};
pub use traits::{EstimationError, Estimator, FittedModel};
