//! A self-contained multinomial logit (MNL) estimation library for
//! discrete-choice analysis.
//!
//! The crate estimates MNL models from stated-preference style choice data:
//! a [`core::ChoiceDataset`] holds the observations, a [`core::UtilitySpec`]
//! declares one linear utility expression and one availability condition per
//! alternative, and a [`solvers::NewtonEstimator`] maximizes the
//! log-likelihood with analytic gradient and Hessian, producing parameter
//! estimates, standard errors, and goodness-of-fit statistics.
//!
//! # Example
//!
//! ```rust,ignore
//! use choice_rs::prelude::*;
//!
//! let mut params = ParameterSet::new();
//! params.add(Parameter::fixed("asc_car", 0.0))?;   // reference alternative
//! params.add(Parameter::new("asc_transit", 0.0))?;
//! params.add(Parameter::new("beta_cost", 0.0))?;
//!
//! let mut spec = UtilitySpec::new();
//! spec.add_alternative(
//!     1,
//!     Expr::parameter("asc_car") + Expr::parameter("beta_cost") * Expr::variable("cost_car"),
//!     Expr::variable("av_car"),
//! )?;
//! spec.add_alternative(
//!     2,
//!     Expr::parameter("asc_transit")
//!         + Expr::parameter("beta_cost") * Expr::variable("cost_transit"),
//!     Expr::variable("av_transit"),
//! )?;
//!
//! let fitted = NewtonEstimator::builder().build().fit(&data, &spec, &params)?;
//! println!("{}", fitted.result());
//! ```

pub mod core;
pub mod inference;
pub mod likelihood;
pub mod report;
pub mod solvers;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::{
        ChoiceDataset, ConvergenceStatus, DataError, EstimationOptions, EstimationOptionsBuilder,
        EstimationResult, Expr, OptionsError, ParamError, Parameter, ParameterEstimate,
        ParameterSet, SpecError, UtilitySpec,
    };
    pub use crate::likelihood::LogitModel;
    pub use crate::report::{coefficient_ratio, value_of_time, ReportError};
    pub use crate::solvers::{EstimationError, Estimator, FittedLogit, FittedModel, NewtonEstimator};
}

pub use crate::core::{
    ChoiceDataset, ConvergenceStatus, EstimationOptions, EstimationResult, Expr, Parameter,
    ParameterSet, UtilitySpec,
};
pub use crate::likelihood::LogitModel;
pub use crate::solvers::{EstimationError, Estimator, FittedLogit, FittedModel, NewtonEstimator};
