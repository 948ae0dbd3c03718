//! Model orchestration: deferred admission, batched flush, solve, query.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::engine::{DblAttr, Engine, EngineModel, IntAttr};
use crate::error::{Error, Result};
use crate::expr::{Constraint, ModelSense, Var, VariableType};

/// A committed or pending variable record.
///
/// Records are immutable after admission; the model never writes an
/// index back into them. A variable's index is the position of its
/// record, carried by the [`Var`] handle.
#[derive(Debug, Clone)]
pub struct Variable {
    name: Arc<str>,
    var_type: VariableType,
    obj: f64,
    lower_bound: f64,
    upper_bound: f64,
}

impl Variable {
    /// The variable's name; empty when unnamed.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn var_type(&self) -> VariableType {
        self.var_type
    }

    /// Objective coefficient.
    pub fn obj(&self) -> f64 {
        self.obj
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }
}

/// Opaque handle to a constraint admitted to a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintId(usize);

impl ConstraintId {
    /// The constraint's 0-based row index in admission order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// An optimization model over a native solver engine.
///
/// Admission is deferred: [`add_variable`](Model::add_variable) and
/// [`add_constraint`](Model::add_constraint) only append to pending
/// queues. [`update`](Model::update) commits the queues to the engine —
/// variables strictly before constraints, each phase through the scalar
/// entry point for a single record and the batched, columnar one for
/// more. The two paths produce identical committed state; only the call
/// count differs.
///
/// The model exclusively owns its engine handle; the handle's `Drop`
/// releases the native resource exactly once, on every exit path. No
/// internal locking: a `Model` must not be shared across threads without
/// external serialization, and `optimize` blocks the calling thread for
/// the full (potentially unbounded) duration of the solve.
///
/// # Examples
///
/// ```rust,no_run
/// use lpmodel::{Model, ModelSense, VariableType, constraint};
/// use lpmodel::engine::stub::StubEngine;
///
/// # fn main() -> Result<(), lpmodel::Error> {
/// let env = StubEngine::new();
/// let mut model = Model::new(&env, "production")?;
///
/// let x = model.add_variable("x", VariableType::Continuous, 2.0, 0.0, 10.0);
/// let y = model.add_variable("y", VariableType::Continuous, 3.0, 0.0, 10.0);
/// model.add_constraint(constraint!((x + y) <= 10.0));
///
/// model.set_sense(ModelSense::Minimize)?;
/// model.optimize()?;
/// let objective = model.objective_value()?;
/// # Ok(())
/// # }
/// ```
pub struct Model<M: EngineModel> {
    engine: M,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    // Committed watermarks; everything at or past a watermark is the
    // pending queue for that phase. Advanced only on flush success.
    committed_variables: usize,
    committed_constraints: usize,
}

impl<M: EngineModel> Model<M> {
    /// Create an empty model on `env`.
    pub fn new<E>(env: &E, name: &str) -> Result<Self>
    where
        E: Engine<Model = M>,
    {
        let engine = env
            .new_model(name)
            .map_err(|e| Error::engine("create-model", e))?;
        debug!(name, "created model");
        Ok(Model {
            engine,
            variables: Vec::new(),
            constraints: Vec::new(),
            committed_variables: 0,
            committed_constraints: 0,
        })
    }

    /// Admit a variable and return its handle.
    ///
    /// The variable stays pending — invisible to the engine — until the
    /// next [`update`](Model::update). Handles are positions in
    /// admission order, so the handle is valid immediately; the engine
    /// column index it denotes exists once the variable is committed.
    pub fn add_variable(
        &mut self,
        name: impl Into<Arc<str>>,
        var_type: VariableType,
        obj: f64,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Var {
        let index = self.variables.len();
        self.variables.push(Variable {
            name: name.into(),
            var_type,
            obj,
            lower_bound,
            upper_bound,
        });
        Var { index }
    }

    /// Admit a constraint.
    ///
    /// Pending until the next [`update`](Model::update). Every variable
    /// the expression references must belong to this model; the flush
    /// rejects anything else.
    pub fn add_constraint(&mut self, constraint: Constraint) -> ConstraintId {
        let id = ConstraintId(self.constraints.len());
        self.constraints.push(constraint);
        id
    }

    /// Commit all pending variables and constraints to the engine.
    ///
    /// Two phases, variables strictly first so constraint encoding can
    /// resolve column indices. Each phase skips when its queue is empty,
    /// uses the scalar engine call for one record and the batched call
    /// otherwise, and clears its queue only on success. A final engine
    /// refresh call makes the committed records queryable.
    ///
    /// On failure the failing phase's queue is left intact. With the
    /// bundled backends a failed add call does not partially mutate
    /// engine state, so catching the error and retrying `update` commits
    /// the same records exactly once; backends without that guarantee
    /// must document their own retry semantics.
    pub fn update(&mut self) -> Result<()> {
        debug!(
            pending_variables = self.variables.len() - self.committed_variables,
            pending_constraints = self.constraints.len() - self.committed_constraints,
            "updating model"
        );
        self.flush_variables()?;
        self.flush_constraints()?;
        self.engine
            .update()
            .map_err(|e| Error::engine("update-model", e))
    }

    fn flush_variables(&mut self) -> Result<()> {
        let Model {
            engine,
            variables,
            committed_variables,
            ..
        } = self;
        let pending = &variables[*committed_variables..];

        match pending {
            [] => return Ok(()),
            [v] => {
                trace!(index = *committed_variables, "scalar variable commit");
                engine
                    .add_var(v.obj, v.lower_bound, v.upper_bound, v.var_type.code(), &v.name)
                    .map_err(|e| Error::engine("add-variable", e))?;
            }
            batch => {
                trace!(count = batch.len(), "batched variable commit");
                let mut obj = Vec::with_capacity(batch.len());
                let mut lb = Vec::with_capacity(batch.len());
                let mut ub = Vec::with_capacity(batch.len());
                let mut vtype = Vec::with_capacity(batch.len());
                let mut names = Vec::with_capacity(batch.len());
                for v in batch {
                    obj.push(v.obj);
                    lb.push(v.lower_bound);
                    ub.push(v.upper_bound);
                    vtype.push(v.var_type.code());
                    names.push(v.name.as_ref());
                }
                engine
                    .add_vars(&obj, &lb, &ub, &vtype, &names)
                    .map_err(|e| Error::engine("add-variables", e))?;
            }
        }

        *committed_variables = variables.len();
        Ok(())
    }

    fn flush_constraints(&mut self) -> Result<()> {
        let Model {
            engine,
            constraints,
            committed_variables,
            committed_constraints,
            ..
        } = self;
        let pending = &constraints[*committed_constraints..];

        // Reject bad references before touching the engine, so a failed
        // flush never leaves the queue half-committed.
        for constraint in pending {
            for term in constraint.expression.terms() {
                if term.variable.index >= *committed_variables {
                    return Err(Error::UncommittedVariable {
                        constraint: constraint.name.to_string(),
                        index: term.variable.index,
                        committed: *committed_variables,
                    });
                }
            }
        }

        match pending {
            [] => return Ok(()),
            [c] => {
                trace!(index = *committed_constraints, "scalar constraint commit");
                let mut ind = Vec::with_capacity(c.expression.terms().len());
                let mut val = Vec::with_capacity(c.expression.terms().len());
                for term in c.expression.terms() {
                    ind.push(term.variable.index as i32);
                    val.push(term.coefficient);
                }
                engine
                    .add_constr(
                        &ind,
                        &val,
                        c.sense.code(),
                        c.rhs - c.expression.constant(),
                        &c.name,
                    )
                    .map_err(|e| Error::engine("add-constraint", e))?;
            }
            batch => {
                let nonzeros: usize = batch.iter().map(|c| c.expression.terms().len()).sum();
                trace!(
                    count = batch.len(),
                    nonzeros,
                    "batched constraint commit"
                );
                let mut beg = Vec::with_capacity(batch.len());
                let mut ind = Vec::with_capacity(nonzeros);
                let mut val = Vec::with_capacity(nonzeros);
                let mut senses = Vec::with_capacity(batch.len());
                let mut rhs = Vec::with_capacity(batch.len());
                let mut names = Vec::with_capacity(batch.len());
                for c in batch {
                    beg.push(ind.len() as i32);
                    for term in c.expression.terms() {
                        ind.push(term.variable.index as i32);
                        val.push(term.coefficient);
                    }
                    senses.push(c.sense.code());
                    rhs.push(c.rhs - c.expression.constant());
                    names.push(c.name.as_ref());
                }
                engine
                    .add_constrs(&beg, &ind, &val, &senses, &rhs, &names)
                    .map_err(|e| Error::engine("add-constraints", e))?;
            }
        }

        *committed_constraints = constraints.len();
        Ok(())
    }

    /// Set the optimization direction.
    pub fn set_sense(&mut self, sense: ModelSense) -> Result<()> {
        self.engine
            .set_int_attr(IntAttr::ModelSense, sense.attr_value())
            .map_err(|e| Error::engine("set-model-sense", e))
    }

    /// Commit pending entities, then run the solver.
    ///
    /// Blocks until the engine returns; this layer imposes no timeout.
    pub fn optimize(&mut self) -> Result<()> {
        self.update()?;
        debug!(
            variables = self.committed_variables,
            constraints = self.committed_constraints,
            "optimizing"
        );
        self.engine
            .optimize()
            .map_err(|e| Error::engine("optimize", e))
    }

    /// The engine's raw solve status code, uninterpreted. Names for the
    /// bundled backends' codes live in [`engine::status`](crate::engine::status).
    pub fn status(&self) -> Result<i32> {
        self.engine
            .get_int_attr(IntAttr::Status)
            .map_err(|e| Error::engine("get-int-attr", e))
    }

    /// Objective value of the current solution.
    ///
    /// Only meaningful after an [`optimize`](Model::optimize) whose
    /// [`status`](Model::status) reports a solution. Before that the
    /// result is solver-defined: engines are free to fail the attribute
    /// read, and the bundled backends do.
    pub fn objective_value(&self) -> Result<f64> {
        self.engine
            .get_dbl_attr(DblAttr::ObjVal)
            .map_err(|e| Error::engine("get-double-attr", e))
    }

    /// Solution value of one variable; same availability rules as
    /// [`objective_value`](Model::objective_value).
    pub fn var_value(&self, var: Var) -> Result<f64> {
        self.engine
            .get_dbl_attr_element(DblAttr::X, var.index as i32)
            .map_err(|e| Error::engine("get-double-attr-element", e))
    }

    /// Ask the engine for an irreducible inconsistent subsystem of an
    /// infeasible model.
    pub fn compute_iis(&mut self) -> Result<()> {
        self.engine
            .compute_iis()
            .map_err(|e| Error::engine("compute-iis", e))
    }

    /// Write the model to a file; the engine chooses the format from the
    /// extension.
    pub fn write(&self, path: &Path) -> Result<()> {
        self.engine
            .write(path)
            .map_err(|e| Error::engine("write-model", e))
    }

    /// The record behind a variable handle, committed or pending.
    pub fn variable(&self, var: Var) -> Option<&Variable> {
        self.variables.get(var.index)
    }

    /// Number of committed variables.
    pub fn num_variables(&self) -> usize {
        self.committed_variables
    }

    /// Number of committed constraints.
    pub fn num_constraints(&self) -> usize {
        self.committed_constraints
    }

    /// Number of admitted-but-uncommitted variables.
    pub fn pending_variables(&self) -> usize {
        self.variables.len() - self.committed_variables
    }

    /// Number of admitted-but-uncommitted constraints.
    pub fn pending_constraints(&self) -> usize {
        self.constraints.len() - self.committed_constraints
    }

    /// The backend model handle, for backend-specific inspection or
    /// configuration.
    pub fn engine(&self) -> &M {
        &self.engine
    }

    /// Mutable access to the backend model handle.
    pub fn engine_mut(&mut self) -> &mut M {
        &mut self.engine
    }
}
