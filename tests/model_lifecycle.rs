//! End-to-end lifecycle tests against the stub engine: admission,
//! flush, solve, attribute read-back, diagnostics, file output.

use anyhow::Result;
use tempfile::TempDir;

use lpmodel::engine::status;
use lpmodel::engine::stub::{StubEngine, StubModel};
use lpmodel::{Error, Model, ModelSense, VariableType, constraint};

fn new_model(name: &str) -> Model<StubModel> {
    Model::new(&StubEngine::new(), name).expect("stub model creation cannot fail")
}

/// The canonical build-solve-read cycle: two bounded continuous
/// variables with nonnegative objective coefficients, one capacity
/// constraint, minimized. The optimum sits at the lower bounds.
#[test]
fn test_minimize_two_variable_model() -> Result<()> {
    let mut model = new_model("two-vars");

    let x = model.add_variable("x", VariableType::Continuous, 2.0, 0.0, 10.0);
    let y = model.add_variable("y", VariableType::Continuous, 3.0, 0.0, 10.0);
    model.update()?;
    assert_eq!(x.index(), 0);
    assert_eq!(y.index(), 1);

    model.add_constraint(constraint!((x + y) <= 10.0));
    model.set_sense(ModelSense::Minimize)?;
    model.optimize()?;

    assert_eq!(model.status()?, status::OPTIMAL);
    assert_eq!(model.objective_value()?, 0.0);
    assert_eq!(model.var_value(x)?, 0.0);
    assert_eq!(model.var_value(y)?, 0.0);
    Ok(())
}

#[test]
fn test_maximize_runs_to_upper_bounds() -> Result<()> {
    let mut model = new_model("maximize");

    let x = model.add_variable("x", VariableType::Continuous, 2.0, 0.0, 10.0);
    let y = model.add_variable("y", VariableType::Continuous, 3.0, 0.0, 10.0);
    model.set_sense(ModelSense::Maximize)?;
    model.optimize()?;

    assert_eq!(model.status()?, status::OPTIMAL);
    assert_eq!(model.objective_value()?, 50.0);
    assert_eq!(model.var_value(x)?, 10.0);
    Ok(())
}

/// Committing in one batch or variable-by-variable must be
/// indistinguishable afterwards, solve included.
#[test]
fn test_batched_and_incremental_commits_solve_identically() -> Result<()> {
    let mut batched = new_model("batched");
    let bx = batched.add_variable("x", VariableType::Continuous, 2.0, 0.0, 10.0);
    let by = batched.add_variable("y", VariableType::Continuous, 3.0, 0.0, 10.0);
    batched.update()?;
    batched.add_constraint(constraint!((bx + by) <= 10.0));

    let mut incremental = new_model("incremental");
    let ix = incremental.add_variable("x", VariableType::Continuous, 2.0, 0.0, 10.0);
    incremental.update()?;
    let iy = incremental.add_variable("y", VariableType::Continuous, 3.0, 0.0, 10.0);
    incremental.update()?;
    incremental.add_constraint(constraint!((ix + iy) <= 10.0));

    for model in [&mut batched, &mut incremental] {
        model.set_sense(ModelSense::Minimize)?;
        model.optimize()?;
    }

    assert_eq!(bx.index(), ix.index());
    assert_eq!(by.index(), iy.index());
    assert_eq!(batched.num_variables(), incremental.num_variables());
    assert_eq!(batched.status()?, incremental.status()?);
    assert_eq!(batched.objective_value()?, incremental.objective_value()?);
    Ok(())
}

/// The model grows append-only across solves; later commits continue
/// the index sequence.
#[test]
fn test_incremental_growth_across_solves() -> Result<()> {
    let mut model = new_model("growing");

    let x = model.add_variable("x", VariableType::Continuous, 1.0, 2.0, 10.0);
    model.set_sense(ModelSense::Minimize)?;
    model.optimize()?;
    assert_eq!(model.objective_value()?, 2.0);

    let y = model.add_variable("y", VariableType::Continuous, 1.0, 3.0, 10.0);
    model.optimize()?;
    assert_eq!(y.index(), 1);
    assert_eq!(model.num_variables(), 2);
    assert_eq!(model.objective_value()?, 5.0);
    assert_eq!(model.var_value(x)?, 2.0);
    Ok(())
}

#[test]
fn test_infeasible_model_supports_iis() -> Result<()> {
    let mut model = new_model("infeasible");

    // Forcing x away from the bound the objective favors makes the
    // stub's bound point violate the row.
    let x = model.add_variable("x", VariableType::Continuous, 1.0, 0.0, 10.0);
    model.add_constraint(constraint!("floor", (x) >= 5.0));
    model.set_sense(ModelSense::Minimize)?;
    model.optimize()?;

    assert_eq!(model.status()?, status::INFEASIBLE);
    assert!(model.objective_value().is_err());

    model.compute_iis()?;
    assert!(model.engine().iis_computed());
    Ok(())
}

#[test]
fn test_iis_on_feasible_model_is_an_engine_error() -> Result<()> {
    let mut model = new_model("feasible");
    model.add_variable("x", VariableType::Continuous, 1.0, 0.0, 10.0);
    model.optimize()?;

    let err = model.compute_iis().unwrap_err();
    assert!(matches!(
        err,
        Error::Engine {
            call: "compute-iis",
            ..
        }
    ));
    Ok(())
}

#[test]
fn test_write_passes_through_to_engine() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("model.lp");

    let mut model = new_model("writable");
    model.add_variable("width", VariableType::Continuous, 1.0, 0.0, 4.0);
    model.update()?;
    model.write(&path)?;

    let contents = std::fs::read_to_string(&path)?;
    assert!(contents.contains("writable"));
    assert!(contents.contains("width"));
    Ok(())
}

#[test]
fn test_foreign_variable_rejected_before_any_row_reaches_engine() {
    let mut donor = new_model("donor");
    let stray = donor.add_variable("stray", VariableType::Continuous, 0.0, 0.0, 1.0);

    let mut model = new_model("strict");
    model.add_constraint(constraint!((stray) <= 1.0));

    let err = model.update().unwrap_err();
    assert_eq!(
        err,
        Error::UncommittedVariable {
            constraint: String::new(),
            index: 0,
            committed: 0,
        }
    );
    assert_eq!(model.engine().rows().len(), 0);
    assert_eq!(model.pending_constraints(), 1);
}

/// A failed flush must leave the queue intact so a retry commits the
/// records exactly once.
#[test]
fn test_update_retry_after_engine_failure() -> Result<()> {
    let mut model = new_model("retry");
    model.add_variable("x", VariableType::Continuous, 1.0, 0.0, 1.0);
    model.add_variable("y", VariableType::Continuous, 1.0, 0.0, 1.0);

    model.engine_mut().fail_next_call(707);
    let err = model.update().unwrap_err();
    assert_eq!(
        err,
        Error::Engine {
            call: "add-variables",
            code: 707,
        }
    );
    assert_eq!(model.pending_variables(), 2);

    model.update()?;
    assert_eq!(model.num_variables(), 2);
    let (obj, _, _, _) = model.engine().columns();
    assert_eq!(obj, &[1.0, 1.0]);
    Ok(())
}

/// Names are forwarded where present; unnamed entities reach the engine
/// as empty names.
#[test]
fn test_names_forwarded_to_engine() -> Result<()> {
    let mut model = new_model("named");
    let x = model.add_variable("make", VariableType::Integer, 1.0, 0.0, 100.0);
    model.add_variable("", VariableType::Continuous, 0.0, 0.0, 1.0);
    model.add_constraint(constraint!("capacity", (x) <= 40.0));
    model.update()?;

    assert_eq!(model.engine().var_names(), &["make", ""]);
    assert_eq!(model.engine().rows()[0].name, "capacity");
    Ok(())
}
