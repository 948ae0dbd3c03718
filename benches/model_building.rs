//! Benchmarks for bulk model construction against the stub engine.
//!
//! Measures the flush paths in isolation: batched columnar variable
//! commits, CSR constraint commits, and the degenerate
//! one-update-per-variable pattern the batched path exists to beat.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use lpmodel::engine::stub::{StubEngine, StubModel};
use lpmodel::{Model, Var, VariableType, constraint};

const MODEL_SIZES: &[usize] = &[100, 1_000, 5_000];

fn build_variables(count: usize, update_per_variable: bool) -> (Model<StubModel>, Vec<Var>) {
    let env = StubEngine::new();
    let mut model = Model::new(&env, "bench").expect("stub model creation cannot fail");
    let vars = (0..count)
        .map(|i| {
            let var = model.add_variable(
                format!("v{i}"),
                VariableType::Continuous,
                1.0,
                0.0,
                i as f64,
            );
            if update_per_variable {
                model.update().expect("flush");
            }
            var
        })
        .collect();
    if !update_per_variable {
        model.update().expect("flush");
    }
    (model, vars)
}

fn bench_variable_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("variable_commit");

    for &size in MODEL_SIZES {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("batched", size), &size, |b, &size| {
            b.iter(|| black_box(build_variables(size, false)));
        });
        group.bench_with_input(BenchmarkId::new("scalar", size), &size, |b, &size| {
            b.iter(|| black_box(build_variables(size, true)));
        });
    }

    group.finish();
}

fn bench_constraint_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("constraint_commit");

    for &size in MODEL_SIZES {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("csr_batch", size), &size, |b, &size| {
            b.iter(|| {
                let (mut model, vars) = build_variables(size, false);
                for pair in vars.windows(2) {
                    model.add_constraint(constraint!((pair[0] + pair[1]) <= 10.0));
                }
                model.update().expect("flush");
                black_box(model)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_variable_commit, bench_constraint_commit);
criterion_main!(benches);
