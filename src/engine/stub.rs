//! In-process engine for tests.
//!
//! Available to unit tests via `#[cfg(test)]` and to integration tests
//! and benchmarks via the `testkit` feature.
//!
//! [`StubModel`] honors the engine contract — it stores the columnar
//! buffers it is handed, validates their shape, tracks an update
//! watermark, and counts every call so tests can assert on the
//! single-vs-batch split. It is not a solver: `optimize` evaluates the
//! objective at the bound point each variable's objective coefficient
//! favors and reports `OPTIMAL` when that point satisfies all rows,
//! `INFEASIBLE` otherwise. Adequate for the models the tests build,
//! nothing more.

use std::fs;
use std::path::Path;

use super::{DblAttr, Engine, EngineError, EngineModel, EngineResult, IntAttr, status};

// Engine-defined failure codes, following the conventions of the native
// backends: malformed buffers, reads of unavailable data, filesystem
// failures, IIS requested on a non-infeasible model.
const INVALID_ARGUMENT: i32 = 10003;
const DATA_NOT_AVAILABLE: i32 = 10005;
const WRITE_FAILED: i32 = 10011;
const IIS_NOT_INFEASIBLE: i32 = 10015;

const FEASIBILITY_TOL: f64 = 1e-9;

/// Count of calls per engine entry point.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CallLog {
    pub add_var: u32,
    pub add_vars: u32,
    pub add_constr: u32,
    pub add_constrs: u32,
    pub update: u32,
    pub optimize: u32,
}

/// One stored constraint row.
#[derive(Debug, Clone, PartialEq)]
pub struct StubRow {
    pub ind: Vec<i32>,
    pub val: Vec<f64>,
    pub sense: u8,
    pub rhs: f64,
    pub name: String,
}

/// Engine that hands out [`StubModel`]s.
#[derive(Debug, Default)]
pub struct StubEngine;

impl StubEngine {
    pub fn new() -> Self {
        StubEngine
    }
}

impl Engine for StubEngine {
    type Model = StubModel;

    fn new_model(&self, name: &str) -> EngineResult<StubModel> {
        Ok(StubModel {
            name: name.to_string(),
            ..StubModel::default()
        })
    }
}

/// Recording model handle. See the module docs for what `optimize` does
/// and does not compute.
#[derive(Debug)]
pub struct StubModel {
    name: String,
    obj: Vec<f64>,
    lb: Vec<f64>,
    ub: Vec<f64>,
    vtype: Vec<u8>,
    var_names: Vec<String>,
    rows: Vec<StubRow>,
    // Counts visible through NumVars/NumConstrs; advanced by update(),
    // mirroring the deferred-attribute behavior of the native engines.
    synced_vars: usize,
    synced_constrs: usize,
    model_sense: i32,
    solve_status: i32,
    obj_val: Option<f64>,
    x: Vec<f64>,
    iis_computed: bool,
    calls: CallLog,
    fail_next: Option<i32>,
}

impl Default for StubModel {
    fn default() -> Self {
        StubModel {
            name: String::new(),
            obj: Vec::new(),
            lb: Vec::new(),
            ub: Vec::new(),
            vtype: Vec::new(),
            var_names: Vec::new(),
            rows: Vec::new(),
            synced_vars: 0,
            synced_constrs: 0,
            model_sense: 1,
            solve_status: status::LOADED,
            obj_val: None,
            x: Vec::new(),
            iis_computed: false,
            calls: CallLog::default(),
            fail_next: None,
        }
    }
}

impl StubModel {
    /// Make the next fallible engine call return `code`, once, without
    /// mutating model state. For exercising failed-flush semantics.
    pub fn fail_next_call(&mut self, code: i32) {
        self.fail_next = Some(code);
    }

    /// Calls observed so far.
    pub fn call_log(&self) -> &CallLog {
        &self.calls
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Columnar variable state: objective, lower, upper, type codes.
    pub fn columns(&self) -> (&[f64], &[f64], &[f64], &[u8]) {
        (&self.obj, &self.lb, &self.ub, &self.vtype)
    }

    pub fn var_names(&self) -> &[String] {
        &self.var_names
    }

    pub fn rows(&self) -> &[StubRow] {
        &self.rows
    }

    /// Total nonzero count across all stored rows.
    pub fn nonzero_count(&self) -> usize {
        self.rows.iter().map(|row| row.ind.len()).sum()
    }

    pub fn iis_computed(&self) -> bool {
        self.iis_computed
    }

    fn take_failure(&mut self) -> EngineResult {
        match self.fail_next.take() {
            Some(code) => Err(EngineError::new(code)),
            None => Ok(()),
        }
    }

    fn push_var(&mut self, obj: f64, lb: f64, ub: f64, vtype: u8, name: &str) {
        self.obj.push(obj);
        self.lb.push(lb);
        self.ub.push(ub);
        self.vtype.push(vtype);
        self.var_names.push(name.to_string());
    }

    fn check_row(&self, ind: &[i32], val: &[f64]) -> EngineResult {
        if ind.len() != val.len() {
            return Err(EngineError::new(INVALID_ARGUMENT));
        }
        for &index in ind {
            if index < 0 || index as usize >= self.obj.len() {
                return Err(EngineError::new(INVALID_ARGUMENT));
            }
        }
        Ok(())
    }

    /// Bound point favored by the objective under the current sense.
    fn bound_point(&self) -> Vec<f64> {
        self.obj
            .iter()
            .zip(self.lb.iter().zip(&self.ub))
            .map(|(&obj, (&lb, &ub))| {
                if (self.model_sense as f64) * obj >= 0.0 {
                    lb
                } else {
                    ub
                }
            })
            .collect()
    }

    fn row_satisfied(&self, row: &StubRow, point: &[f64]) -> bool {
        let lhs: f64 = row
            .ind
            .iter()
            .zip(&row.val)
            .map(|(&index, &coeff)| coeff * point[index as usize])
            .sum();
        match row.sense {
            b'<' => lhs <= row.rhs + FEASIBILITY_TOL,
            b'>' => lhs >= row.rhs - FEASIBILITY_TOL,
            _ => (lhs - row.rhs).abs() <= FEASIBILITY_TOL,
        }
    }
}

impl EngineModel for StubModel {
    fn add_var(&mut self, obj: f64, lb: f64, ub: f64, vtype: u8, name: &str) -> EngineResult {
        self.take_failure()?;
        self.calls.add_var += 1;
        self.push_var(obj, lb, ub, vtype, name);
        Ok(())
    }

    fn add_vars(
        &mut self,
        obj: &[f64],
        lb: &[f64],
        ub: &[f64],
        vtype: &[u8],
        names: &[&str],
    ) -> EngineResult {
        self.take_failure()?;
        self.calls.add_vars += 1;
        let count = obj.len();
        if lb.len() != count || ub.len() != count || vtype.len() != count || names.len() != count {
            return Err(EngineError::new(INVALID_ARGUMENT));
        }
        for i in 0..count {
            self.push_var(obj[i], lb[i], ub[i], vtype[i], names[i]);
        }
        Ok(())
    }

    fn add_constr(
        &mut self,
        ind: &[i32],
        val: &[f64],
        sense: u8,
        rhs: f64,
        name: &str,
    ) -> EngineResult {
        self.take_failure()?;
        self.calls.add_constr += 1;
        self.check_row(ind, val)?;
        self.rows.push(StubRow {
            ind: ind.to_vec(),
            val: val.to_vec(),
            sense,
            rhs,
            name: name.to_string(),
        });
        Ok(())
    }

    fn add_constrs(
        &mut self,
        beg: &[i32],
        ind: &[i32],
        val: &[f64],
        senses: &[u8],
        rhs: &[f64],
        names: &[&str],
    ) -> EngineResult {
        self.take_failure()?;
        self.calls.add_constrs += 1;
        let count = beg.len();
        if senses.len() != count || rhs.len() != count || names.len() != count {
            return Err(EngineError::new(INVALID_ARGUMENT));
        }
        for i in 0..count {
            let start = beg[i];
            let end = if i + 1 < count {
                beg[i + 1]
            } else {
                ind.len() as i32
            };
            if start < 0 || end < start || end as usize > ind.len() {
                return Err(EngineError::new(INVALID_ARGUMENT));
            }
            let range = start as usize..end as usize;
            self.check_row(&ind[range.clone()], &val[range.clone()])?;
            self.rows.push(StubRow {
                ind: ind[range.clone()].to_vec(),
                val: val[range].to_vec(),
                sense: senses[i],
                rhs: rhs[i],
                name: names[i].to_string(),
            });
        }
        Ok(())
    }

    fn update(&mut self) -> EngineResult {
        self.take_failure()?;
        self.calls.update += 1;
        self.synced_vars = self.obj.len();
        self.synced_constrs = self.rows.len();
        Ok(())
    }

    fn optimize(&mut self) -> EngineResult {
        self.take_failure()?;
        self.calls.optimize += 1;
        self.synced_vars = self.obj.len();
        self.synced_constrs = self.rows.len();

        let point = self.bound_point();
        let feasible = self.rows.iter().all(|row| self.row_satisfied(row, &point));
        if feasible {
            self.solve_status = status::OPTIMAL;
            self.obj_val = Some(
                self.obj
                    .iter()
                    .zip(&point)
                    .map(|(&obj, &x)| obj * x)
                    .sum(),
            );
            self.x = point;
        } else {
            self.solve_status = status::INFEASIBLE;
            self.obj_val = None;
            self.x.clear();
        }
        Ok(())
    }

    fn set_int_attr(&mut self, attr: IntAttr, value: i32) -> EngineResult {
        self.take_failure()?;
        match attr {
            IntAttr::ModelSense => {
                self.model_sense = value;
                Ok(())
            }
            _ => Err(EngineError::new(INVALID_ARGUMENT)),
        }
    }

    fn get_int_attr(&self, attr: IntAttr) -> EngineResult<i32> {
        match attr {
            IntAttr::ModelSense => Ok(self.model_sense),
            IntAttr::Status => Ok(self.solve_status),
            IntAttr::NumVars => Ok(self.synced_vars as i32),
            IntAttr::NumConstrs => Ok(self.synced_constrs as i32),
        }
    }

    fn get_dbl_attr(&self, attr: DblAttr) -> EngineResult<f64> {
        match attr {
            DblAttr::ObjVal => self
                .obj_val
                .ok_or_else(|| EngineError::new(DATA_NOT_AVAILABLE)),
            DblAttr::X => Err(EngineError::new(INVALID_ARGUMENT)),
        }
    }

    fn get_dbl_attr_element(&self, attr: DblAttr, element: i32) -> EngineResult<f64> {
        match attr {
            DblAttr::X => {
                if self.obj_val.is_none() {
                    return Err(EngineError::new(DATA_NOT_AVAILABLE));
                }
                self.x
                    .get(element as usize)
                    .copied()
                    .ok_or_else(|| EngineError::new(INVALID_ARGUMENT))
            }
            DblAttr::ObjVal => Err(EngineError::new(INVALID_ARGUMENT)),
        }
    }

    fn compute_iis(&mut self) -> EngineResult {
        self.take_failure()?;
        if self.solve_status != status::INFEASIBLE {
            return Err(EngineError::new(IIS_NOT_INFEASIBLE));
        }
        self.iis_computed = true;
        Ok(())
    }

    fn write(&self, path: &Path) -> EngineResult {
        let mut out = format!("\\ Model {}\n", self.name);
        for (i, name) in self.var_names.iter().enumerate() {
            out.push_str(&format!(
                " {} {}: obj {} in [{}, {}] type {}\n",
                i,
                if name.is_empty() { "_" } else { name },
                self.obj[i],
                self.lb[i],
                self.ub[i],
                self.vtype[i] as char,
            ));
        }
        for row in &self.rows {
            out.push_str(&format!(
                " {}: {:?} {:?} {} {}\n",
                if row.name.is_empty() { "_" } else { &row.name },
                row.ind,
                row.val,
                row.sense as char,
                row.rhs,
            ));
        }
        fs::write(path, out).map_err(|_| EngineError::new(WRITE_FAILED))
    }
}
