//! Multinomial logit likelihood evaluation.

mod logit;

pub use logit::LogitModel;
