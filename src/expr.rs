//! Core data types for building linear models.
//!
//! A [`LinearExpression`] is a weighted sum of decision variables plus a
//! constant; a [`Constraint`] compares an expression against a right-hand
//! side. Both are plain descriptions: nothing reaches the solver engine
//! until [`Model::update`](crate::Model::update) flushes them.

use std::fmt;

use itertools::Itertools;

/// Variable types supported by the solver engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    /// Continuous variable (can take any real value within its bounds)
    Continuous,
    /// Integer variable
    Integer,
    /// Binary variable (0 or 1)
    Binary,
}

impl VariableType {
    /// Single-byte type code used at the engine boundary.
    pub fn code(self) -> u8 {
        match self {
            VariableType::Continuous => b'C',
            VariableType::Integer => b'I',
            VariableType::Binary => b'B',
        }
    }
}

/// Constraint sense for linear constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSense {
    /// Less than or equal to (≤)
    LessEqual,
    /// Equal to (=)
    Equal,
    /// Greater than or equal to (≥)
    GreaterEqual,
}

impl ConstraintSense {
    /// Single-byte sense code used at the engine boundary.
    pub fn code(self) -> u8 {
        match self {
            ConstraintSense::LessEqual => b'<',
            ConstraintSense::Equal => b'=',
            ConstraintSense::GreaterEqual => b'>',
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            ConstraintSense::LessEqual => "<=",
            ConstraintSense::Equal => "=",
            ConstraintSense::GreaterEqual => ">=",
        }
    }
}

/// Optimization direction for the objective function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSense {
    /// Minimize the objective function
    Minimize,
    /// Maximize the objective function
    Maximize,
}

impl ModelSense {
    /// Integer attribute value understood by the bundled engines
    /// (minimize = 1, maximize = -1).
    pub fn attr_value(self) -> i32 {
        match self {
            ModelSense::Minimize => 1,
            ModelSense::Maximize => -1,
        }
    }
}

/// Opaque handle to a variable admitted to a [`Model`](crate::Model).
///
/// The handle carries the variable's position in the model's admission
/// order, which becomes its engine column index once the variable is
/// committed by a flush. Handles are only meaningful for the model that
/// issued them; a constraint referencing a handle the model has not
/// committed is rejected at flush time with
/// [`Error::UncommittedVariable`](crate::Error::UncommittedVariable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Var {
    pub(crate) index: usize,
}

impl Var {
    /// The variable's 0-based column index in admission order.
    pub fn index(self) -> usize {
        self.index
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x[{}]", self.index)
    }
}

/// A linear expression term: coefficient * variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTerm {
    pub coefficient: f64,
    pub variable: Var,
}

/// A linear expression: sum of terms plus a constant.
///
/// Each variable appears in at most one term; adding a term for a variable
/// already present folds the coefficients together. The constant never
/// reaches the engine as a term — it is folded into the right-hand side
/// when the enclosing constraint is flushed.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearExpression {
    pub(crate) terms: Vec<LinearTerm>,
    pub(crate) constant: f64,
}

impl LinearExpression {
    /// Create a new linear expression with a constant term.
    pub fn new(constant: f64) -> Self {
        Self {
            terms: Vec::new(),
            constant,
        }
    }

    /// Create a linear expression from a single variable.
    pub fn from_variable(variable: Var) -> Self {
        Self {
            terms: vec![LinearTerm {
                coefficient: 1.0,
                variable,
            }],
            constant: 0.0,
        }
    }

    /// Add `coefficient * variable`, folding into an existing term for the
    /// same variable if there is one.
    pub fn add_term(&mut self, coefficient: f64, variable: Var) {
        match self.terms.iter_mut().find(|t| t.variable == variable) {
            Some(term) => term.coefficient += coefficient,
            None => self.terms.push(LinearTerm {
                coefficient,
                variable,
            }),
        }
    }

    /// The expression's terms, in insertion order.
    pub fn terms(&self) -> &[LinearTerm] {
        &self.terms
    }

    /// The constant part of the expression.
    pub fn constant(&self) -> f64 {
        self.constant
    }
}

impl From<Var> for LinearExpression {
    fn from(variable: Var) -> Self {
        Self::from_variable(variable)
    }
}

impl fmt::Display for LinearExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "{}", self.constant);
        }
        write!(
            f,
            "{}",
            self.terms
                .iter()
                .format_with(" + ", |t, g| g(&format_args!(
                    "{} {}",
                    t.coefficient, t.variable
                )))
        )?;
        if self.constant != 0.0 {
            write!(f, " + {}", self.constant)?;
        }
        Ok(())
    }
}

/// A linear constraint: expression compared against a right-hand side.
///
/// # Examples
///
/// ```rust,no_run
/// use lpmodel::{Constraint, ConstraintSense, constraint};
/// # use lpmodel::{Model, VariableType};
/// # use lpmodel::engine::stub::StubEngine;
/// # let env = StubEngine::new();
/// # let mut model = Model::new(&env, "m").unwrap();
/// let x = model.add_variable("x", VariableType::Continuous, 1.0, 0.0, 10.0);
/// let y = model.add_variable("y", VariableType::Continuous, 1.0, 0.0, 10.0);
///
/// // Using the constraint! macro
/// let c = constraint!((x + y) <= 10.0);
///
/// // Using builder methods
/// let c = Constraint::le(x + y, 10.0);
///
/// // Using the constructor directly
/// let c = Constraint::new(x + y, ConstraintSense::LessEqual, 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct Constraint {
    pub(crate) name: std::sync::Arc<str>,
    pub(crate) expression: LinearExpression,
    pub(crate) sense: ConstraintSense,
    pub(crate) rhs: f64,
}

impl Constraint {
    /// Create a new unnamed constraint.
    pub fn new(expression: impl Into<LinearExpression>, sense: ConstraintSense, rhs: f64) -> Self {
        Self {
            name: std::sync::Arc::from(""),
            expression: expression.into(),
            sense,
            rhs,
        }
    }

    /// Create a new named constraint.
    pub fn named(
        name: impl Into<std::sync::Arc<str>>,
        expression: impl Into<LinearExpression>,
        sense: ConstraintSense,
        rhs: f64,
    ) -> Self {
        Self {
            name: name.into(),
            ..Self::new(expression, sense, rhs)
        }
    }

    /// Create an equality constraint: expression == rhs
    pub fn eq(expression: impl Into<LinearExpression>, rhs: f64) -> Self {
        Self::new(expression, ConstraintSense::Equal, rhs)
    }

    /// Create a less-than-or-equal constraint: expression <= rhs
    pub fn le(expression: impl Into<LinearExpression>, rhs: f64) -> Self {
        Self::new(expression, ConstraintSense::LessEqual, rhs)
    }

    /// Create a greater-than-or-equal constraint: expression >= rhs
    pub fn ge(expression: impl Into<LinearExpression>, rhs: f64) -> Self {
        Self::new(expression, ConstraintSense::GreaterEqual, rhs)
    }

    /// The constraint's name; empty when unnamed.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The constraint's expression.
    pub fn expression(&self) -> &LinearExpression {
        &self.expression
    }

    /// The constraint's sense.
    pub fn sense(&self) -> ConstraintSense {
        self.sense
    }

    /// The constraint's right-hand side.
    pub fn rhs(&self) -> f64 {
        self.rhs
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.name.is_empty() {
            write!(f, "{}: ", self.name)?;
        }
        write!(
            f,
            "{} {} {}",
            self.expression,
            self.sense.symbol(),
            self.rhs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(index: usize) -> Var {
        Var { index }
    }

    #[test]
    fn test_add_term_folds_duplicates() {
        let mut expr = LinearExpression::new(0.0);
        expr.add_term(2.0, var(0));
        expr.add_term(3.0, var(1));
        expr.add_term(0.5, var(0));

        assert_eq!(expr.terms().len(), 2);
        assert_eq!(expr.terms()[0].coefficient, 2.5);
        assert_eq!(expr.terms()[0].variable, var(0));
        assert_eq!(expr.terms()[1].coefficient, 3.0);
    }

    #[test]
    fn test_expression_from_variable() {
        let expr = LinearExpression::from_variable(var(4));
        assert_eq!(expr.terms().len(), 1);
        assert_eq!(expr.terms()[0].coefficient, 1.0);
        assert_eq!(expr.constant(), 0.0);
    }

    #[test]
    fn test_constraint_builders() {
        let c = Constraint::eq(var(0), 10.0);
        assert_eq!(c.sense(), ConstraintSense::Equal);
        assert_eq!(c.rhs(), 10.0);
        assert_eq!(c.name(), "");

        let c = Constraint::le(var(0), 5.0);
        assert_eq!(c.sense(), ConstraintSense::LessEqual);

        let c = Constraint::ge(var(0), 0.0);
        assert_eq!(c.sense(), ConstraintSense::GreaterEqual);

        let c = Constraint::named("cap", var(0), ConstraintSense::LessEqual, 1.0);
        assert_eq!(c.name(), "cap");
    }

    #[test]
    fn test_byte_codes() {
        assert_eq!(VariableType::Continuous.code(), b'C');
        assert_eq!(VariableType::Integer.code(), b'I');
        assert_eq!(VariableType::Binary.code(), b'B');
        assert_eq!(ConstraintSense::LessEqual.code(), b'<');
        assert_eq!(ConstraintSense::GreaterEqual.code(), b'>');
        assert_eq!(ConstraintSense::Equal.code(), b'=');
        assert_eq!(ModelSense::Minimize.attr_value(), 1);
        assert_eq!(ModelSense::Maximize.attr_value(), -1);
    }

    #[test]
    fn test_display() {
        let mut expr = LinearExpression::new(5.0);
        expr.add_term(2.0, var(0));
        expr.add_term(3.0, var(1));
        assert_eq!(expr.to_string(), "2 x[0] + 3 x[1] + 5");

        let c = Constraint::named("cap", expr, ConstraintSense::LessEqual, 10.0);
        assert_eq!(c.to_string(), "cap: 2 x[0] + 3 x[1] + 5 <= 10");
    }
}
