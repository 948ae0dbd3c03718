//! Macros for convenient constraint construction.

/// Create constraints using natural comparison syntax.
///
/// The left-hand side must be in parentheses: `(expression) <= value`.
/// An optional first argument names the constraint.
///
/// # Examples
///
/// ```rust,no_run
/// use lpmodel::constraint;
/// # use lpmodel::{Model, VariableType};
/// # use lpmodel::engine::stub::StubEngine;
/// # let env = StubEngine::new();
/// # let mut model = Model::new(&env, "m").unwrap();
/// let x = model.add_variable("x", VariableType::Continuous, 0.0, 0.0, 10.0);
/// let y = model.add_variable("y", VariableType::Continuous, 0.0, 0.0, 10.0);
///
/// // Unnamed constraints (most common)
/// model.add_constraint(constraint!((x + y) == 10.0));
/// model.add_constraint(constraint!((2.0 * x - y) <= 5.0));
/// model.add_constraint(constraint!((x) >= 0.0));
///
/// // Named constraints for diagnostics
/// model.add_constraint(constraint!("capacity", (x + y) <= 10.0));
/// ```
#[macro_export]
macro_rules! constraint {
    // Unnamed constraints (most common case)
    (($lhs:expr) == $rhs:expr) => {
        $crate::Constraint::new($lhs, $crate::ConstraintSense::Equal, $rhs as f64)
    };
    (($lhs:expr) <= $rhs:expr) => {
        $crate::Constraint::new($lhs, $crate::ConstraintSense::LessEqual, $rhs as f64)
    };
    (($lhs:expr) >= $rhs:expr) => {
        $crate::Constraint::new($lhs, $crate::ConstraintSense::GreaterEqual, $rhs as f64)
    };

    // Named constraints (with name parameter)
    ($name:expr, ($lhs:expr) == $rhs:expr) => {
        $crate::Constraint::named($name, $lhs, $crate::ConstraintSense::Equal, $rhs as f64)
    };
    ($name:expr, ($lhs:expr) <= $rhs:expr) => {
        $crate::Constraint::named($name, $lhs, $crate::ConstraintSense::LessEqual, $rhs as f64)
    };
    ($name:expr, ($lhs:expr) >= $rhs:expr) => {
        $crate::Constraint::named($name, $lhs, $crate::ConstraintSense::GreaterEqual, $rhs as f64)
    };
}

#[cfg(test)]
mod tests {
    use crate::engine::stub::StubEngine;
    use crate::{ConstraintSense, Model, VariableType};

    #[test]
    fn test_constraint_macro() {
        let env = StubEngine::new();
        let mut model = Model::new(&env, "macros").unwrap();
        let x = model.add_variable("x", VariableType::Continuous, 0.0, 0.0, 10.0);
        let y = model.add_variable("y", VariableType::Continuous, 0.0, 0.0, 10.0);

        let c = constraint!((x + y) == 10.0);
        assert_eq!(c.sense(), ConstraintSense::Equal);
        assert_eq!(c.rhs(), 10.0);

        let c = constraint!((2.0 * x) <= 5.0);
        assert_eq!(c.sense(), ConstraintSense::LessEqual);
        assert_eq!(c.rhs(), 5.0);

        let c = constraint!((x - y) >= 0.0);
        assert_eq!(c.sense(), ConstraintSense::GreaterEqual);
        assert_eq!(c.rhs(), 0.0);
    }

    #[test]
    fn test_named_constraint_macro() {
        let env = StubEngine::new();
        let mut model = Model::new(&env, "macros").unwrap();
        let x = model.add_variable("x", VariableType::Continuous, 0.0, 0.0, 10.0);

        let c = constraint!("cap", (x) <= 5.0);
        assert_eq!(c.name(), "cap");
        assert_eq!(c.sense(), ConstraintSense::LessEqual);
    }

    #[test]
    fn test_constraint_macro_with_model() {
        let env = StubEngine::new();
        let mut model = Model::new(&env, "macros").unwrap();
        let x = model.add_variable("x", VariableType::Continuous, 0.0, 0.0, 10.0);
        let y = model.add_variable("y", VariableType::Continuous, 0.0, 0.0, 10.0);

        model.add_constraint(constraint!((x + y) == 10.0));
        model.add_constraint(constraint!((x) <= 5.0));

        assert_eq!(model.pending_constraints(), 2);
    }
}
