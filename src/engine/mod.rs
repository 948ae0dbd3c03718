//! The native solver engine boundary.
//!
//! A [`Model`](crate::Model) never talks to a solver library directly; it
//! drives these traits, which mirror the C-style entry points the native
//! engines expose: scalar and batched add calls over flat columnar
//! buffers, an explicit update/refresh call, optimize, and raw attribute
//! reads. Backends implement the traits over their own handle types and
//! release the handle in `Drop`, so disposal happens exactly once on
//! every exit path.
//!
//! All fallible calls follow the zero/non-zero convention of the native
//! APIs: success is `Ok`, any failure carries the raw engine-defined
//! status code in an [`EngineError`]. No further structure crosses this
//! boundary.

use std::path::Path;

#[cfg(feature = "gurobi")]
pub mod gurobi;

#[cfg(any(test, feature = "testkit"))]
pub mod stub;

/// Non-zero status code returned by a failed native call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineError(i32);

impl EngineError {
    /// Wrap a raw non-zero status code.
    pub fn new(code: i32) -> Self {
        debug_assert!(code != 0, "status zero is success, not an error");
        EngineError(code)
    }

    /// The raw, engine-defined status code.
    pub fn code(self) -> i32 {
        self.0
    }
}

/// Result alias for engine calls.
pub type EngineResult<T = ()> = Result<T, EngineError>;

/// Integer model attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntAttr {
    /// Optimization direction (minimize = 1, maximize = -1)
    ModelSense,
    /// Solve status code (see [`status`])
    Status,
    /// Number of variables the engine holds
    NumVars,
    /// Number of constraints the engine holds
    NumConstrs,
}

/// Floating-point model attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DblAttr {
    /// Objective value of the current solution
    ObjVal,
    /// Solution value; read per variable via
    /// [`EngineModel::get_dbl_attr_element`]
    X,
}

/// Solve status codes reported by the bundled backends.
///
/// The model layer passes these through uninterpreted; they are published
/// here so callers and tests have names for the common outcomes.
pub mod status {
    /// Model loaded, no solve attempted yet
    pub const LOADED: i32 = 1;
    /// Optimal solution found
    pub const OPTIMAL: i32 = 2;
    /// Model proven infeasible
    pub const INFEASIBLE: i32 = 3;
    /// Model proven infeasible or unbounded
    pub const INF_OR_UNBD: i32 = 4;
    /// Model proven unbounded
    pub const UNBOUNDED: i32 = 5;
}

/// A licensed solver context that can create model handles.
pub trait Engine {
    /// The model handle type this engine produces.
    type Model: EngineModel;

    /// Create an empty model. The returned handle owns the native
    /// resource and releases it when dropped.
    fn new_model(&self, name: &str) -> EngineResult<Self::Model>;
}

/// A native model handle.
///
/// Buffer conventions, shared by every entry point:
/// - parallel buffers must have equal lengths;
/// - variable indices are `i32` column positions in commit order;
/// - type codes are `b'C'` / `b'I'` / `b'B'`, sense codes `b'<'` /
///   `b'>'` / `b'='`;
/// - an empty name means unnamed (backends map it to a null pointer).
pub trait EngineModel {
    /// Add one variable.
    fn add_var(&mut self, obj: f64, lb: f64, ub: f64, vtype: u8, name: &str) -> EngineResult;

    /// Add a batch of variables from parallel columnar buffers.
    fn add_vars(
        &mut self,
        obj: &[f64],
        lb: &[f64],
        ub: &[f64],
        vtype: &[u8],
        names: &[&str],
    ) -> EngineResult;

    /// Add one constraint from parallel index/coefficient buffers.
    fn add_constr(
        &mut self,
        ind: &[i32],
        val: &[f64],
        sense: u8,
        rhs: f64,
        name: &str,
    ) -> EngineResult;

    /// Add a batch of constraints in CSR layout: `beg[i]` is the offset
    /// into `ind`/`val` where constraint `i`'s terms start.
    fn add_constrs(
        &mut self,
        beg: &[i32],
        ind: &[i32],
        val: &[f64],
        senses: &[u8],
        rhs: &[f64],
        names: &[&str],
    ) -> EngineResult;

    /// Fold pending native-side additions into the queryable model state.
    fn update(&mut self) -> EngineResult;

    /// Run the solver. Blocks for the full duration of the solve.
    fn optimize(&mut self) -> EngineResult;

    /// Write an integer attribute.
    fn set_int_attr(&mut self, attr: IntAttr, value: i32) -> EngineResult;

    /// Read an integer attribute.
    fn get_int_attr(&self, attr: IntAttr) -> EngineResult<i32>;

    /// Read a floating-point attribute.
    fn get_dbl_attr(&self, attr: DblAttr) -> EngineResult<f64>;

    /// Read one element of an array-valued floating-point attribute.
    fn get_dbl_attr_element(&self, attr: DblAttr, element: i32) -> EngineResult<f64>;

    /// Compute an irreducible inconsistent subsystem for an infeasible
    /// model.
    fn compute_iis(&mut self) -> EngineResult;

    /// Write the model to a file; the engine picks the format from the
    /// file extension.
    fn write(&self, path: &Path) -> EngineResult;
}
