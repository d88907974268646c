//! Result reporting: textual summaries and derived quantities.

mod derived;
mod summary;

pub use derived::{coefficient_ratio, value_of_time, ReportError};
pub use summary::summary;
