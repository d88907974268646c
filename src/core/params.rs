//! Model parameters and the ordered parameter set.

use faer::Col;
use thiserror::Error;

/// A named scalar model parameter.
///
/// Fixed parameters keep their starting value during estimation: they enter
/// utility evaluation but are excluded from the optimization. A typical use
/// is pinning the reference alternative's constant to zero.
#[derive(Debug, Clone)]
pub struct Parameter {
    /// Parameter name, unique within a [`ParameterSet`].
    pub name: String,
    /// Starting value (and final value, if fixed).
    pub start: f64,
    /// Optional lower bound.
    pub lower: Option<f64>,
    /// Optional upper bound.
    pub upper: Option<f64>,
    /// Whether the parameter is excluded from optimization.
    pub fixed: bool,
}

impl Parameter {
    /// Create a free parameter with the given starting value.
    pub fn new(name: &str, start: f64) -> Self {
        Self {
            name: name.to_string(),
            start,
            lower: None,
            upper: None,
            fixed: false,
        }
    }

    /// Create a fixed parameter pinned at `value`.
    pub fn fixed(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            start: value,
            lower: None,
            upper: None,
            fixed: true,
        }
    }

    /// Set lower and upper bounds (either may be `None`).
    pub fn with_bounds(mut self, lower: Option<f64>, upper: Option<f64>) -> Self {
        self.lower = lower;
        self.upper = upper;
        self
    }
}

/// Errors that can occur when building a parameter set.
#[derive(Debug, Error)]
pub enum ParamError {
    #[error("duplicate parameter name: {0}")]
    DuplicateName(String),
    #[error("parameter {name}: lower bound {lower} exceeds upper bound {upper}")]
    InvalidBounds { name: String, lower: f64, upper: f64 },
    #[error("parameter {name}: starting value {start} lies outside [{lower}, {upper}]")]
    StartOutOfBounds {
        name: String,
        start: f64,
        lower: f64,
        upper: f64,
    },
    #[error("parameter {name}: starting value is not finite")]
    NonFiniteStart { name: String },
}

/// An ordered collection of model parameters.
///
/// Insertion order is preserved and defines the layout of the full parameter
/// vector. Mapping between the full vector and the free sub-vector is done
/// here, so that explicit value vectors (not a mutable registry) flow through
/// the evaluator and the optimizer.
#[derive(Debug, Clone, Default)]
pub struct ParameterSet {
    params: Vec<Parameter>,
}

impl ParameterSet {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, rejecting duplicates and inconsistent bounds.
    pub fn add(&mut self, param: Parameter) -> Result<(), ParamError> {
        if !param.start.is_finite() {
            return Err(ParamError::NonFiniteStart { name: param.name });
        }
        if let (Some(lo), Some(hi)) = (param.lower, param.upper) {
            if lo > hi {
                return Err(ParamError::InvalidBounds {
                    name: param.name,
                    lower: lo,
                    upper: hi,
                });
            }
        }
        let lo = param.lower.unwrap_or(f64::NEG_INFINITY);
        let hi = param.upper.unwrap_or(f64::INFINITY);
        if param.start < lo || param.start > hi {
            return Err(ParamError::StartOutOfBounds {
                name: param.name,
                start: param.start,
                lower: lo,
                upper: hi,
            });
        }
        if self.index(&param.name).is_some() {
            return Err(ParamError::DuplicateName(param.name));
        }
        self.params.push(param);
        Ok(())
    }

    /// Number of parameters (free and fixed).
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate over the parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// Position of a parameter in the full vector, if present.
    pub fn index(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }

    /// Parameter at the given full-vector position.
    pub fn get(&self, index: usize) -> Option<&Parameter> {
        self.params.get(index)
    }

    /// Look up a parameter by name.
    pub fn by_name(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Full vector of starting values.
    pub fn start_values(&self) -> Col<f64> {
        Col::from_fn(self.params.len(), |i| self.params[i].start)
    }

    /// Full-vector positions of the free parameters.
    pub fn free_indices(&self) -> Vec<usize> {
        self.params
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.fixed)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of free parameters.
    pub fn n_free(&self) -> usize {
        self.params.iter().filter(|p| !p.fixed).count()
    }

    /// Gather the free entries of a full vector.
    pub fn pack_free(&self, full: &Col<f64>) -> Col<f64> {
        let free = self.free_indices();
        Col::from_fn(free.len(), |i| full[free[i]])
    }

    /// Scatter a free sub-vector into a copy of `base` (fixed entries keep
    /// their values from `base`).
    pub fn unpack_free(&self, free_values: &Col<f64>, base: &Col<f64>) -> Col<f64> {
        let free = self.free_indices();
        let mut full = base.clone();
        for (i, &idx) in free.iter().enumerate() {
            full[idx] = free_values[i];
        }
        full
    }

    /// Clamp a full-vector value into the bounds of parameter `index`.
    pub fn clamp(&self, index: usize, value: f64) -> f64 {
        let p = &self.params[index];
        let lo = p.lower.unwrap_or(f64::NEG_INFINITY);
        let hi = p.upper.unwrap_or(f64::INFINITY);
        value.max(lo).min(hi)
    }
}
