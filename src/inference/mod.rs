//! Statistical inference (standard errors, z-statistics, p-values).

mod coefficient;

pub use coefficient::CoefficientInference;
