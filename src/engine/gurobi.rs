//! Gurobi backend for the engine traits.
//!
//! Binds the Gurobi C API directly and wraps the raw environment and
//! model handles in types whose `Drop` releases them. Enabled with the
//! `gurobi` feature; requires the native library at link time.

use std::ffi::{CStr, CString, c_char, c_double, c_int};
use std::path::Path;
use std::ptr;

use tracing::debug;

use super::{DblAttr, Engine, EngineError, EngineModel, EngineResult, IntAttr};

// Status code Gurobi reserves for malformed arguments; reused for strings
// the C API cannot represent (interior NUL, non-UTF-8 paths).
const ERROR_INVALID_ARGUMENT: c_int = 10003;

mod ffi {
    use super::{c_char, c_double, c_int};

    #[repr(C)]
    pub struct GRBenv {
        _private: [u8; 0],
    }

    #[repr(C)]
    pub struct GRBmodel {
        _private: [u8; 0],
    }

    // The distribution ships the library as libgurobi<version>; a
    // `gurobi` symlink or RUSTFLAGS override selects the installed one.
    #[link(name = "gurobi")]
    unsafe extern "C" {
        pub fn GRBloadenv(envP: *mut *mut GRBenv, logfilename: *const c_char) -> c_int;
        pub fn GRBfreeenv(env: *mut GRBenv);
        pub fn GRBnewmodel(
            env: *mut GRBenv,
            modelP: *mut *mut GRBmodel,
            Pname: *const c_char,
            numvars: c_int,
            obj: *const c_double,
            lb: *const c_double,
            ub: *const c_double,
            vtype: *const c_char,
            varnames: *const *mut c_char,
        ) -> c_int;
        pub fn GRBfreemodel(model: *mut GRBmodel) -> c_int;
        pub fn GRBaddvar(
            model: *mut GRBmodel,
            numnz: c_int,
            vind: *const c_int,
            vval: *const c_double,
            obj: c_double,
            lb: c_double,
            ub: c_double,
            vtype: c_char,
            varname: *const c_char,
        ) -> c_int;
        pub fn GRBaddvars(
            model: *mut GRBmodel,
            numvars: c_int,
            numnz: c_int,
            vbeg: *const c_int,
            vind: *const c_int,
            vval: *const c_double,
            obj: *const c_double,
            lb: *const c_double,
            ub: *const c_double,
            vtype: *const c_char,
            varnames: *const *mut c_char,
        ) -> c_int;
        pub fn GRBaddconstr(
            model: *mut GRBmodel,
            numnz: c_int,
            cind: *const c_int,
            cval: *const c_double,
            sense: c_char,
            rhs: c_double,
            constrname: *const c_char,
        ) -> c_int;
        pub fn GRBaddconstrs(
            model: *mut GRBmodel,
            numconstrs: c_int,
            numnz: c_int,
            cbeg: *const c_int,
            cind: *const c_int,
            cval: *const c_double,
            sense: *const c_char,
            rhs: *const c_double,
            constrnames: *const *mut c_char,
        ) -> c_int;
        pub fn GRBupdatemodel(model: *mut GRBmodel) -> c_int;
        pub fn GRBoptimize(model: *mut GRBmodel) -> c_int;
        pub fn GRBcomputeIIS(model: *mut GRBmodel) -> c_int;
        pub fn GRBgetintattr(
            model: *mut GRBmodel,
            attrname: *const c_char,
            valueP: *mut c_int,
        ) -> c_int;
        pub fn GRBsetintattr(
            model: *mut GRBmodel,
            attrname: *const c_char,
            newvalue: c_int,
        ) -> c_int;
        pub fn GRBgetdblattr(
            model: *mut GRBmodel,
            attrname: *const c_char,
            valueP: *mut c_double,
        ) -> c_int;
        pub fn GRBgetdblattrelement(
            model: *mut GRBmodel,
            attrname: *const c_char,
            element: c_int,
            valueP: *mut c_double,
        ) -> c_int;
        pub fn GRBwrite(model: *mut GRBmodel, filename: *const c_char) -> c_int;
    }
}

fn check(status: c_int) -> EngineResult {
    if status == 0 {
        Ok(())
    } else {
        Err(EngineError::new(status))
    }
}

fn int_attr_name(attr: IntAttr) -> &'static CStr {
    match attr {
        IntAttr::ModelSense => c"ModelSense",
        IntAttr::Status => c"Status",
        IntAttr::NumVars => c"NumVars",
        IntAttr::NumConstrs => c"NumConstrs",
    }
}

fn dbl_attr_name(attr: DblAttr) -> &'static CStr {
    match attr {
        DblAttr::ObjVal => c"ObjVal",
        DblAttr::X => c"X",
    }
}

fn c_string(s: &str) -> EngineResult<CString> {
    CString::new(s).map_err(|_| EngineError::new(ERROR_INVALID_ARGUMENT))
}

fn c_path(path: &Path) -> EngineResult<CString> {
    let s = path
        .to_str()
        .ok_or_else(|| EngineError::new(ERROR_INVALID_ARGUMENT))?;
    c_string(s)
}

/// Owned name buffers plus the `char **` view the batch entry points take.
/// Empty names become null pointers. The storage must outlive the call.
struct NameBuffers {
    _storage: Vec<Option<CString>>,
    pointers: Vec<*mut c_char>,
}

impl NameBuffers {
    fn build(names: &[&str]) -> EngineResult<Self> {
        let storage: Vec<Option<CString>> = names
            .iter()
            .map(|name| {
                if name.is_empty() {
                    Ok(None)
                } else {
                    c_string(name).map(Some)
                }
            })
            .collect::<EngineResult<_>>()?;
        let pointers = storage
            .iter()
            .map(|name| match name {
                Some(name) => name.as_ptr() as *mut c_char,
                None => ptr::null_mut(),
            })
            .collect();
        Ok(NameBuffers {
            _storage: storage,
            pointers,
        })
    }
}

fn name_ptr(name: &CString, raw: &str) -> *const c_char {
    if raw.is_empty() {
        ptr::null()
    } else {
        name.as_ptr()
    }
}

/// A licensed Gurobi environment. Freed exactly once, on drop.
pub struct GurobiEnv {
    env: *mut ffi::GRBenv,
}

impl GurobiEnv {
    /// Acquire an environment, optionally logging to `log_file`.
    /// Fails with the engine's status code when no license is available.
    pub fn new(log_file: Option<&Path>) -> EngineResult<Self> {
        let log = match log_file {
            Some(path) => Some(c_path(path)?),
            None => None,
        };
        let log_ptr = log.as_ref().map_or(ptr::null(), |l| l.as_ptr());
        let mut env = ptr::null_mut();
        check(unsafe { ffi::GRBloadenv(&mut env, log_ptr) })?;
        debug!(target: "lpmodel::engine", "acquired gurobi environment");
        Ok(GurobiEnv { env })
    }
}

impl Drop for GurobiEnv {
    fn drop(&mut self) {
        unsafe { ffi::GRBfreeenv(self.env) };
    }
}

impl Engine for GurobiEnv {
    type Model = GurobiModel;

    fn new_model(&self, name: &str) -> EngineResult<GurobiModel> {
        let c_name = c_string(name)?;
        let mut model = ptr::null_mut();
        check(unsafe {
            ffi::GRBnewmodel(
                self.env,
                &mut model,
                c_name.as_ptr(),
                0,
                ptr::null(),
                ptr::null(),
                ptr::null(),
                ptr::null(),
                ptr::null(),
            )
        })?;
        Ok(GurobiModel { model })
    }
}

/// A Gurobi model handle. Gurobi gives each model a private copy of its
/// environment, so the handle does not borrow from [`GurobiEnv`]. Freed
/// exactly once, on drop.
pub struct GurobiModel {
    model: *mut ffi::GRBmodel,
}

impl Drop for GurobiModel {
    fn drop(&mut self) {
        // Nothing useful to do with a failure status during teardown.
        unsafe { ffi::GRBfreemodel(self.model) };
    }
}

impl EngineModel for GurobiModel {
    fn add_var(&mut self, obj: f64, lb: f64, ub: f64, vtype: u8, name: &str) -> EngineResult {
        let c_name = c_string(name)?;
        check(unsafe {
            ffi::GRBaddvar(
                self.model,
                0,
                ptr::null(),
                ptr::null(),
                obj,
                lb,
                ub,
                vtype as c_char,
                name_ptr(&c_name, name),
            )
        })
    }

    fn add_vars(
        &mut self,
        obj: &[f64],
        lb: &[f64],
        ub: &[f64],
        vtype: &[u8],
        names: &[&str],
    ) -> EngineResult {
        let name_buffers = NameBuffers::build(names)?;
        check(unsafe {
            ffi::GRBaddvars(
                self.model,
                obj.len() as c_int,
                0,
                ptr::null(),
                ptr::null(),
                ptr::null(),
                obj.as_ptr(),
                lb.as_ptr(),
                ub.as_ptr(),
                vtype.as_ptr() as *const c_char,
                name_buffers.pointers.as_ptr(),
            )
        })
    }

    fn add_constr(
        &mut self,
        ind: &[i32],
        val: &[f64],
        sense: u8,
        rhs: f64,
        name: &str,
    ) -> EngineResult {
        let c_name = c_string(name)?;
        check(unsafe {
            ffi::GRBaddconstr(
                self.model,
                ind.len() as c_int,
                ind.as_ptr(),
                val.as_ptr(),
                sense as c_char,
                rhs,
                name_ptr(&c_name, name),
            )
        })
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
        let name_buffers = NameBuffers::build(names)?;
        check(unsafe {
            ffi::GRBaddconstrs(
                self.model,
                beg.len() as c_int,
                ind.len() as c_int,
                beg.as_ptr(),
                ind.as_ptr(),
                val.as_ptr(),
                senses.as_ptr() as *const c_char,
                rhs.as_ptr(),
                name_buffers.pointers.as_ptr(),
            )
        })
    }

    fn update(&mut self) -> EngineResult {
        check(unsafe { ffi::GRBupdatemodel(self.model) })
    }

    fn optimize(&mut self) -> EngineResult {
        check(unsafe { ffi::GRBoptimize(self.model) })
    }

    fn set_int_attr(&mut self, attr: IntAttr, value: i32) -> EngineResult {
        check(unsafe { ffi::GRBsetintattr(self.model, int_attr_name(attr).as_ptr(), value) })
    }

    fn get_int_attr(&self, attr: IntAttr) -> EngineResult<i32> {
        let mut value: c_int = 0;
        check(unsafe { ffi::GRBgetintattr(self.model, int_attr_name(attr).as_ptr(), &mut value) })?;
        Ok(value)
    }

    fn get_dbl_attr(&self, attr: DblAttr) -> EngineResult<f64> {
        let mut value: c_double = 0.0;
        check(unsafe { ffi::GRBgetdblattr(self.model, dbl_attr_name(attr).as_ptr(), &mut value) })?;
        Ok(value)
    }

    fn get_dbl_attr_element(&self, attr: DblAttr, element: i32) -> EngineResult<f64> {
        let mut value: c_double = 0.0;
        check(unsafe {
            ffi::GRBgetdblattrelement(
                self.model,
                dbl_attr_name(attr).as_ptr(),
                element,
                &mut value,
            )
        })?;
        Ok(value)
    }

    fn compute_iis(&mut self) -> EngineResult {
        check(unsafe { ffi::GRBcomputeIIS(self.model) })
    }

    fn write(&self, path: &Path) -> EngineResult {
        let c_filename = c_path(path)?;
        check(unsafe { ffi::GRBwrite(self.model, c_filename.as_ptr()) })
    }
}
