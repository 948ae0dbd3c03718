//! Operator overloading for linear expressions.
//!
//! Variables and expressions support natural arithmetic notation:
//!
//! ```ignore
//! let expr1 = x + y;             // Addition
//! let expr2 = x - y;             // Subtraction
//! let expr3 = 2.0 * x;           // Scalar multiplication (left)
//! let expr4 = x * 2.0;           // Scalar multiplication (right)
//! let expr5 = x + 2.0 * y + 5.0; // Mixed expressions
//! let expr6 = (x + y) * 3.0;     // Parentheses work
//! ```
//!
//! Adding two expressions folds coefficients of shared variables, so
//! `x + x` is the single term `2 x`.

use crate::expr::{LinearExpression, Var};

// ============================================================================
// Operators for LinearExpression
// ============================================================================

impl std::ops::Add<LinearExpression> for LinearExpression {
    type Output = LinearExpression;

    fn add(mut self, other: LinearExpression) -> Self::Output {
        for term in other.terms {
            self.add_term(term.coefficient, term.variable);
        }
        self.constant += other.constant;
        self
    }
}

impl std::ops::Add<Var> for LinearExpression {
    type Output = LinearExpression;

    fn add(mut self, other: Var) -> Self::Output {
        self.add_term(1.0, other);
        self
    }
}

impl std::ops::Add<f64> for LinearExpression {
    type Output = LinearExpression;

    fn add(mut self, other: f64) -> Self::Output {
        self.constant += other;
        self
    }
}

impl std::ops::Sub<LinearExpression> for LinearExpression {
    type Output = LinearExpression;

    fn sub(mut self, other: LinearExpression) -> Self::Output {
        for term in other.terms {
            self.add_term(-term.coefficient, term.variable);
        }
        self.constant -= other.constant;
        self
    }
}

impl std::ops::Sub<Var> for LinearExpression {
    type Output = LinearExpression;

    fn sub(mut self, other: Var) -> Self::Output {
        self.add_term(-1.0, other);
        self
    }
}

impl std::ops::Sub<f64> for LinearExpression {
    type Output = LinearExpression;

    fn sub(mut self, other: f64) -> Self::Output {
        self.constant -= other;
        self
    }
}

impl std::ops::Mul<f64> for LinearExpression {
    type Output = LinearExpression;

    fn mul(mut self, other: f64) -> Self::Output {
        for term in &mut self.terms {
            term.coefficient *= other;
        }
        self.constant *= other;
        self
    }
}

impl std::ops::Mul<LinearExpression> for f64 {
    type Output = LinearExpression;

    fn mul(self, other: LinearExpression) -> Self::Output {
        other * self
    }
}

// ============================================================================
// Operators for Var
// ============================================================================

impl std::ops::Add<LinearExpression> for Var {
    type Output = LinearExpression;

    fn add(self, other: LinearExpression) -> Self::Output {
        LinearExpression::from_variable(self) + other
    }
}

impl std::ops::Add<Var> for Var {
    type Output = LinearExpression;

    fn add(self, other: Var) -> Self::Output {
        LinearExpression::from_variable(self) + other
    }
}

impl std::ops::Add<f64> for Var {
    type Output = LinearExpression;

    fn add(self, other: f64) -> Self::Output {
        LinearExpression::from_variable(self) + other
    }
}

impl std::ops::Sub<Var> for Var {
    type Output = LinearExpression;

    fn sub(self, other: Var) -> Self::Output {
        LinearExpression::from_variable(self) - other
    }
}

impl std::ops::Sub<LinearExpression> for Var {
    type Output = LinearExpression;

    fn sub(self, other: LinearExpression) -> Self::Output {
        LinearExpression::from_variable(self) - other
    }
}

impl std::ops::Sub<f64> for Var {
    type Output = LinearExpression;

    fn sub(self, other: f64) -> Self::Output {
        LinearExpression::from_variable(self) - other
    }
}

impl std::ops::Mul<f64> for Var {
    type Output = LinearExpression;

    fn mul(self, other: f64) -> Self::Output {
        LinearExpression::from_variable(self) * other
    }
}

impl std::ops::Mul<Var> for f64 {
    type Output = LinearExpression;

    fn mul(self, other: Var) -> Self::Output {
        other * self
    }
}

// ============================================================================
// Reverse operators for f64
// ============================================================================

impl std::ops::Add<Var> for f64 {
    type Output = LinearExpression;

    fn add(self, other: Var) -> Self::Output {
        LinearExpression::from_variable(other) + self
    }
}

impl std::ops::Sub<Var> for f64 {
    type Output = LinearExpression;

    fn sub(self, other: Var) -> Self::Output {
        (LinearExpression::from_variable(other) * -1.0) + self
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::stub::StubEngine;
    use crate::{Model, VariableType};

    #[test]
    fn test_expression_operations() {
        let env = StubEngine::new();
        let mut model = Model::new(&env, "ops").unwrap();
        let x = model.add_variable("x", VariableType::Continuous, 0.0, 0.0, 10.0);
        let y = model.add_variable("y", VariableType::Continuous, 0.0, 0.0, 10.0);

        let expr = 2.0 * x + 3.0 * y + 5.0;
        assert_eq!(expr.constant(), 5.0);
        assert_eq!(expr.terms().len(), 2);

        let expr2 = x + y;
        let expr3 = x - y;
        let expr4 = 2.0 * x;
        let expr5 = x * 2.0;

        assert_eq!(expr2.terms().len(), 2);
        assert_eq!(expr3.terms().len(), 2);
        assert_eq!(expr4.terms().len(), 1);
        assert_eq!(expr5.terms().len(), 1);
    }

    #[test]
    fn test_add_variable_to_expression() {
        let env = StubEngine::new();
        let mut model = Model::new(&env, "ops").unwrap();
        let x = model.add_variable("x", VariableType::Continuous, 0.0, 0.0, 10.0);
        let y = model.add_variable("y", VariableType::Continuous, 0.0, 0.0, 10.0);

        let expr = 2.0 * x + 5.0;
        assert_eq!(expr.terms().len(), 1);
        assert_eq!(expr.terms()[0].coefficient, 2.0);
        assert_eq!(expr.constant(), 5.0);

        let result = expr + y;
        assert_eq!(result.terms().len(), 2);
        assert_eq!(result.constant(), 5.0);
        assert_eq!(result.terms()[1].coefficient, 1.0);
        assert_eq!(result.terms()[1].variable, y);
    }

    #[test]
    fn test_self_addition_folds() {
        let env = StubEngine::new();
        let mut model = Model::new(&env, "ops").unwrap();
        let x = model.add_variable("x", VariableType::Continuous, 0.0, 0.0, 10.0);

        let expr = x + x;
        assert_eq!(expr.terms().len(), 1);
        assert_eq!(expr.terms()[0].coefficient, 2.0);

        let cancelled = 3.0 * x - 3.0 * x;
        assert_eq!(cancelled.terms().len(), 1);
        assert_eq!(cancelled.terms()[0].coefficient, 0.0);
    }

    #[test]
    fn test_reverse_subtraction() {
        let env = StubEngine::new();
        let mut model = Model::new(&env, "ops").unwrap();
        let x = model.add_variable("x", VariableType::Continuous, 0.0, 0.0, 10.0);

        let expr = 10.0 - x;
        assert_eq!(expr.terms()[0].coefficient, -1.0);
        assert_eq!(expr.constant(), 10.0);
    }
}
