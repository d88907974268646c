//! Utility expressions as tagged expression trees.
//!
//! A utility function is declared as a small abstract syntax tree over
//! constants, parameter references, and variable (data column) references,
//! combined with sums and products. The tree is evaluated by an interpreter;
//! the `Add`/`Mul` operator impls exist only as convenient AST constructors.
//!
//! Utilities must be linear in the parameters. [`Expr::parameter_degree`]
//! reports the maximum polynomial degree in parameter references, which the
//! specification uses to reject nonlinear declarations.

use faer::Col;
use std::ops::{Add, Mul};

/// A utility expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric constant.
    Constant(f64),
    /// A reference to a named model parameter.
    Parameter(String),
    /// A reference to a named data column.
    Variable(String),
    /// Sum of two expressions.
    Sum(Box<Expr>, Box<Expr>),
    /// Product of two expressions.
    Product(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// A constant term.
    pub fn constant(value: f64) -> Self {
        Expr::Constant(value)
    }

    /// A reference to the named parameter.
    pub fn parameter(name: &str) -> Self {
        Expr::Parameter(name.to_string())
    }

    /// A reference to the named data column.
    pub fn variable(name: &str) -> Self {
        Expr::Variable(name.to_string())
    }

    /// Maximum polynomial degree in parameter references.
    ///
    /// Constants and variables have degree 0, a parameter reference has
    /// degree 1, sums take the maximum and products the sum of their
    /// operands' degrees. Linear-in-parameters expressions have degree <= 1.
    pub fn parameter_degree(&self) -> usize {
        match self {
            Expr::Constant(_) | Expr::Variable(_) => 0,
            Expr::Parameter(_) => 1,
            Expr::Sum(a, b) => a.parameter_degree().max(b.parameter_degree()),
            Expr::Product(a, b) => a.parameter_degree() + b.parameter_degree(),
        }
    }

    /// Collect the names of all referenced parameters into `out`.
    pub fn parameter_names(&self, out: &mut Vec<String>) {
        match self {
            Expr::Constant(_) | Expr::Variable(_) => {}
            Expr::Parameter(name) => {
                if !out.iter().any(|n| n == name) {
                    out.push(name.clone());
                }
            }
            Expr::Sum(a, b) | Expr::Product(a, b) => {
                a.parameter_names(out);
                b.parameter_names(out);
            }
        }
    }

    /// Collect the names of all referenced variables into `out`.
    pub fn variable_names(&self, out: &mut Vec<String>) {
        match self {
            Expr::Constant(_) | Expr::Parameter(_) => {}
            Expr::Variable(name) => {
                if !out.iter().any(|n| n == name) {
                    out.push(name.clone());
                }
            }
            Expr::Sum(a, b) | Expr::Product(a, b) => {
                a.variable_names(out);
                b.variable_names(out);
            }
        }
    }

    /// Collect parameters that occur as bare additive terms (the
    /// alternative-specific constants of a utility).
    pub(crate) fn additive_parameters(&self, out: &mut Vec<String>) {
        match self {
            Expr::Parameter(name) => {
                if !out.iter().any(|n| n == name) {
                    out.push(name.clone());
                }
            }
            Expr::Sum(a, b) => {
                a.additive_parameters(out);
                b.additive_parameters(out);
            }
            _ => {}
        }
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::Sum(Box::new(self), Box::new(rhs))
    }
}

impl Add<f64> for Expr {
    type Output = Expr;

    fn add(self, rhs: f64) -> Expr {
        Expr::Sum(Box::new(self), Box::new(Expr::Constant(rhs)))
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::Product(Box::new(self), Box::new(rhs))
    }
}

impl Mul<f64> for Expr {
    type Output = Expr;

    fn mul(self, rhs: f64) -> Expr {
        Expr::Product(Box::new(self), Box::new(Expr::Constant(rhs)))
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Constant(value)
    }
}

/// An expression with parameter and variable names resolved to indices.
///
/// Produced by binding a [`super::UtilitySpec`] against a dataset and a
/// parameter set; evaluation then avoids name lookups in the inner loops.
#[derive(Debug, Clone)]
pub(crate) enum BoundExpr {
    Constant(f64),
    Parameter(usize),
    Variable(usize),
    Sum(Box<BoundExpr>, Box<BoundExpr>),
    Product(Box<BoundExpr>, Box<BoundExpr>),
}

impl BoundExpr {
    /// Evaluate the expression for one observation.
    ///
    /// `values` is the full parameter vector; `var` maps a column index to
    /// that observation's value.
    pub(crate) fn value<F>(&self, values: &Col<f64>, var: &F) -> f64
    where
        F: Fn(usize) -> f64,
    {
        match self {
            BoundExpr::Constant(c) => *c,
            BoundExpr::Parameter(i) => values[*i],
            BoundExpr::Variable(j) => var(*j),
            BoundExpr::Sum(a, b) => a.value(values, var) + b.value(values, var),
            BoundExpr::Product(a, b) => a.value(values, var) * b.value(values, var),
        }
    }

    /// Accumulate `scale * dV/dtheta` into `grad` (full parameter layout).
    ///
    /// For linear-in-parameters expressions the derivative does not depend on
    /// `values`, but the product rule is applied in full so that bound
    /// expressions evaluate correctly whenever the linearity check is
    /// bypassed in internal testing.
    pub(crate) fn accumulate_gradient<F>(
        &self,
        values: &Col<f64>,
        var: &F,
        scale: f64,
        grad: &mut Col<f64>,
    ) where
        F: Fn(usize) -> f64,
    {
        match self {
            BoundExpr::Constant(_) | BoundExpr::Variable(_) => {}
            BoundExpr::Parameter(i) => grad[*i] += scale,
            BoundExpr::Sum(a, b) => {
                a.accumulate_gradient(values, var, scale, grad);
                b.accumulate_gradient(values, var, scale, grad);
            }
            BoundExpr::Product(a, b) => {
                let va = a.value(values, var);
                let vb = b.value(values, var);
                a.accumulate_gradient(values, var, scale * vb, grad);
                b.accumulate_gradient(values, var, scale * va, grad);
            }
        }
    }
}
