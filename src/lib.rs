//! Deferred, batched model building for linear and mixed-integer
//! programming over native solver engines.
//!
//! This library is the *builder* half of an optimization stack: clients
//! declare decision variables and linear constraints incrementally, and
//! the [`Model`] commits them to a native solver engine in bulk —
//! translating the object-level description into the flat columnar and
//! CSR-style sparse buffers the engine's C entry points expect. The
//! engine itself (the algorithm that finds an optimum) stays behind the
//! [`engine`] traits.
//!
//! # Overview
//!
//! Admission is deferred: [`Model::add_variable`] and
//! [`Model::add_constraint`] append to pending queues and issue no
//! native calls. [`Model::update`] flushes the queues — variables
//! strictly before constraints, so constraint encoding can resolve
//! column indices — choosing between the engine's scalar and batched
//! entry points purely as a call-count optimization.
//! [`Model::optimize`] flushes implicitly, then blocks on the solve;
//! [`Model::status`] and [`Model::objective_value`] read the outcome
//! back.
//!
//! # Usage Example
//!
//! ```no_run
//! use lpmodel::{Model, ModelSense, VariableType, constraint};
//! use lpmodel::engine::stub::StubEngine;
//!
//! # fn main() -> Result<(), lpmodel::Error> {
//! let env = StubEngine::new();
//! let mut model = Model::new(&env, "diet")?;
//!
//! let x = model.add_variable("x", VariableType::Continuous, 2.0, 0.0, 10.0);
//! let y = model.add_variable("y", VariableType::Continuous, 3.0, 0.0, 10.0);
//! model.add_constraint(constraint!("budget", (x + y) <= 10.0));
//!
//! model.set_sense(ModelSense::Minimize)?;
//! model.optimize()?;
//! println!("status {} objective {}", model.status()?, model.objective_value()?);
//! # Ok(())
//! # }
//! ```
//!
//! With the `gurobi` feature enabled,
//! `engine::gurobi::GurobiEnv::new(None)?` in place of `StubEngine`
//! drives the native Gurobi library through the same `Model` API.
//!
//! # Modules
//!
//! - **[`model`]**: the [`Model`] orchestrator — pending queues,
//!   two-phase flush, solve and query operations
//! - **[`expr`]**: expression-level types ([`LinearExpression`],
//!   [`Constraint`], the [`Var`] handle, type and sense enumerations)
//! - **[`ops`]**: operator overloading so expressions read as arithmetic
//! - **[`engine`]**: the native engine boundary — traits mirroring the
//!   C-style entry points, plus the bundled backends (`gurobi` behind
//!   the `gurobi` feature, a recording stub behind `testkit`)
//! - **[`error`]**: the typed [`Error`], carrying raw native status codes
//!
//! # Threading
//!
//! Everything here is single-threaded and blocking. A [`Model`] has no
//! internal locking; share it across threads only behind external
//! synchronization.

pub mod engine;
pub mod error;
pub mod expr;
pub mod model;
pub mod ops;

mod macros;

pub use error::{Error, Result};
pub use expr::{
    Constraint, ConstraintSense, LinearExpression, LinearTerm, ModelSense, Var, VariableType,
};
pub use model::{ConstraintId, Model, Variable};
