//! Benchmarks for statement domain construction.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use polystmt::prelude::*;

/// A perfect nest of `depth` loops, each bounded by its own parameter, with a
/// load and a store in the innermost body.
fn build_nest(depth: usize) -> (IrContext, OpId, Vec<OpId>) {
    let names: Vec<String> = (0..depth).map(|d| format!("N{}", d)).collect();
    let mut args: Vec<&str> = names.iter().map(String::as_str).collect();
    args.extend(["A", "B"]);

    let mut ir = IrContext::new();
    let (func, values) = ir.create_func("nest", &args);
    let mut at = Position::body(func);
    let mut ivs = Vec::with_capacity(depth);
    for d in 0..depth {
        let (l, iv) = ir.append_for(at, &format!("i{}", d), 0, values[d], 1).unwrap();
        ivs.push(iv);
        at = Position::body(l);
    }

    let indices: Vec<BoundExpr> = ivs.iter().map(|&iv| iv.into()).collect();
    let (load, v) = ir.append_load(at, values[depth], indices.clone(), "v").unwrap();
    let store = ir.append_store(at, v, values[depth + 1], indices).unwrap();
    (ir, func, vec![load, store])
}

/// Benchmark domain construction over nest depth.
fn bench_domain(c: &mut Criterion) {
    let mut group = c.benchmark_group("stmt_domain");
    for depth in [1usize, 3, 6, 10] {
        let (ir, func, members) = build_nest(depth);
        let mut stmt = ScopStmtOpSet::new();
        for &op in &members {
            stmt.insert(&ir, op).unwrap();
        }
        let scope = AnalysisScope::new(&ir, func).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            b.iter(|| stmt.domain(black_box(&scope)).unwrap())
        });
    }
    group.finish();
}

/// Benchmark the common-prefix query.
fn bench_enclosing_ops(c: &mut Criterion) {
    let (ir, func, members) = build_nest(8);
    let mut stmt = ScopStmtOpSet::new();
    for &op in &members {
        stmt.insert(&ir, op).unwrap();
    }
    let scope = AnalysisScope::new(&ir, func).unwrap();

    c.bench_function("enclosing_ops_depth_8", |b| {
        b.iter(|| stmt.enclosing_ops(black_box(&scope)).unwrap())
    });
}

criterion_group!(benches, bench_domain, bench_enclosing_ops);
criterion_main!(benches);
