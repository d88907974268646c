//! Core types for discrete-choice estimation.

mod data;
mod expr;
mod options;
mod params;
mod result;
mod spec;

pub use data::{ChoiceDataset, DataError};
pub use expr::Expr;
pub use options::{EstimationOptions, EstimationOptionsBuilder, OptionsError};
pub use params::{ParamError, Parameter, ParameterSet};
pub use result::{ConvergenceStatus, EstimationResult, ParameterEstimate};
pub use spec::{SpecError, Utility, UtilitySpec};

pub(crate) use spec::BoundSpec;
