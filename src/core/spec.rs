//! The model specification: utilities and availability per alternative.

use super::data::{ChoiceDataset, DataError};
use super::expr::{BoundExpr, Expr};
use super::params::ParameterSet;
use thiserror::Error;

/// Availability expressions evaluate to a numeric flag; values above this
/// threshold mean the alternative is available (source data uses 0/1).
pub(crate) const AVAILABILITY_THRESHOLD: f64 = 0.5;

/// Errors raised while declaring or validating a specification.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("duplicate alternative id: {0}")]
    DuplicateAlternative(i64),
    #[error("specification declares no alternatives")]
    EmptySpecification,
    #[error("utility for alternative {alternative} references unknown parameter {parameter}")]
    UnknownParameter { alternative: i64, parameter: String },
    #[error("alternative {alternative} references unknown variable {variable}")]
    UnknownVariable { alternative: i64, variable: String },
    #[error("utility for alternative {alternative} is not linear in the parameters")]
    NonlinearUtility { alternative: i64 },
    #[error("availability for alternative {alternative} must depend on data only")]
    ParametricAvailability { alternative: i64 },
    #[error(
        "no normalization constraint: at least one alternative-specific constant must be fixed"
    )]
    NoFixedConstant,
    #[error("all parameters are fixed; nothing to estimate")]
    AllParametersFixed,
}

/// One alternative's declaration: a utility expression and an availability
/// condition.
#[derive(Debug, Clone)]
pub struct Utility {
    /// Linear-in-parameters utility expression.
    pub expression: Expr,
    /// Availability condition; evaluates to a 0/1 flag per observation.
    pub availability: Expr,
}

/// Maps alternative ids to their utility and availability declarations.
///
/// The specification is declared once, validated against the parameter set
/// (identification) and the dataset (variable resolution), then bound into
/// an index-resolved form used by the likelihood evaluator.
#[derive(Debug, Clone, Default)]
pub struct UtilitySpec {
    alternatives: Vec<(i64, Utility)>,
}

impl UtilitySpec {
    /// Create an empty specification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an alternative with its utility and availability expressions.
    pub fn add_alternative(
        &mut self,
        id: i64,
        expression: Expr,
        availability: Expr,
    ) -> Result<(), SpecError> {
        if self.alternatives.iter().any(|(alt, _)| *alt == id) {
            return Err(SpecError::DuplicateAlternative(id));
        }
        self.alternatives.push((
            id,
            Utility {
                expression,
                availability,
            },
        ));
        Ok(())
    }

    /// Number of declared alternatives.
    pub fn n_alternatives(&self) -> usize {
        self.alternatives.len()
    }

    /// Iterate over (id, utility) declarations.
    pub fn alternatives(&self) -> impl Iterator<Item = (i64, &Utility)> {
        self.alternatives.iter().map(|(id, u)| (*id, u))
    }

    /// Validate the specification against a parameter set.
    ///
    /// Checks, in order: the specification is non-empty, every referenced
    /// parameter exists, every utility is linear in the parameters, at least
    /// one alternative-specific constant is fixed (the normalization
    /// constraint), and at least one parameter remains free.
    pub fn validate(&self, params: &ParameterSet) -> Result<(), SpecError> {
        if self.alternatives.is_empty() {
            return Err(SpecError::EmptySpecification);
        }

        for (id, utility) in &self.alternatives {
            let mut names = Vec::new();
            utility.expression.parameter_names(&mut names);
            utility.availability.parameter_names(&mut names);
            for name in names {
                if params.index(&name).is_none() {
                    return Err(SpecError::UnknownParameter {
                        alternative: *id,
                        parameter: name,
                    });
                }
            }
            if utility.expression.parameter_degree() > 1 {
                return Err(SpecError::NonlinearUtility { alternative: *id });
            }
            if utility.availability.parameter_degree() > 0 {
                return Err(SpecError::ParametricAvailability { alternative: *id });
            }
        }

        // Scale/level indeterminacy of the logit model: without a fixed
        // reference constant the constants are not identified.
        let mut ascs = Vec::new();
        for (_, utility) in &self.alternatives {
            utility.expression.additive_parameters(&mut ascs);
        }
        let has_fixed_asc = ascs
            .iter()
            .filter_map(|name| params.by_name(name))
            .any(|p| p.fixed);
        if !ascs.is_empty() && !has_fixed_asc {
            return Err(SpecError::NoFixedConstant);
        }

        if params.n_free() == 0 {
            return Err(SpecError::AllParametersFixed);
        }

        Ok(())
    }

    /// Resolve parameter and variable names to indices against a dataset.
    pub(crate) fn bind(
        &self,
        params: &ParameterSet,
        data: &ChoiceDataset,
    ) -> Result<BoundSpec, SpecError> {
        let mut alts = Vec::with_capacity(self.alternatives.len());
        for (id, utility) in &self.alternatives {
            alts.push(BoundAlternative {
                id: *id,
                utility: bind_expr(&utility.expression, *id, params, data)?,
                availability: bind_expr(&utility.availability, *id, params, data)?,
            });
        }
        Ok(BoundSpec { alts })
    }
}

fn bind_expr(
    expr: &Expr,
    alternative: i64,
    params: &ParameterSet,
    data: &ChoiceDataset,
) -> Result<BoundExpr, SpecError> {
    match expr {
        Expr::Constant(c) => Ok(BoundExpr::Constant(*c)),
        Expr::Parameter(name) => params
            .index(name)
            .map(BoundExpr::Parameter)
            .ok_or_else(|| SpecError::UnknownParameter {
                alternative,
                parameter: name.clone(),
            }),
        Expr::Variable(name) => data
            .column_index(name)
            .map(BoundExpr::Variable)
            .ok_or_else(|| SpecError::UnknownVariable {
                alternative,
                variable: name.clone(),
            }),
        Expr::Sum(a, b) => Ok(BoundExpr::Sum(
            Box::new(bind_expr(a, alternative, params, data)?),
            Box::new(bind_expr(b, alternative, params, data)?),
        )),
        Expr::Product(a, b) => Ok(BoundExpr::Product(
            Box::new(bind_expr(a, alternative, params, data)?),
            Box::new(bind_expr(b, alternative, params, data)?),
        )),
    }
}

/// An index-resolved alternative.
#[derive(Debug, Clone)]
pub(crate) struct BoundAlternative {
    pub id: i64,
    pub utility: BoundExpr,
    pub availability: BoundExpr,
}

/// An index-resolved specification, ready for likelihood evaluation.
#[derive(Debug, Clone)]
pub(crate) struct BoundSpec {
    pub alts: Vec<BoundAlternative>,
}

impl BoundSpec {
    /// Position of an alternative id within the bound spec.
    pub fn alternative_index(&self, id: i64) -> Option<usize> {
        self.alts.iter().position(|a| a.id == id)
    }

    /// Whether alternative `alt` is available in `row`. Availability does
    /// not depend on parameter values in well-formed models; a zero vector
    /// is passed for uniformity.
    pub fn is_available(&self, alt: usize, data: &ChoiceDataset, row: usize) -> bool {
        let zeros = faer::Col::zeros(0);
        let var = |j: usize| data.value(j, row);
        self.alts[alt].availability.value(&zeros, &var) > AVAILABILITY_THRESHOLD
    }

    /// Per-row validation: every chosen alternative is declared and
    /// available. Violating rows are flagged with their index, never
    /// silently accepted.
    pub fn validate_rows(&self, data: &ChoiceDataset) -> Result<(), DataError> {
        for row in 0..data.n_rows() {
            let chosen = data.chosen(row)?;
            let alt = self
                .alternative_index(chosen)
                .ok_or(DataError::UnknownAlternative {
                    row,
                    alternative: chosen,
                })?;
            if !self.is_available(alt, data, row) {
                return Err(DataError::ChosenUnavailable {
                    row,
                    alternative: chosen,
                });
            }
        }
        Ok(())
    }
}
