//! Numerical utility functions.

mod linalg;

pub use linalg::{cholesky, cholesky_inverse, cholesky_solve};
