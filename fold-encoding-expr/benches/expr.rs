use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fold_encoding::{CollapsibleExt, ExpandableExt, Fev};
use fold_encoding_expr::expr::{
    eval::{eval, eval_layer},
    naive::{naive_eval, to_fev, Expr},
    pattern::push_neg,
    ExprFev, ExprFrame,
};
use pprof::criterion::{Output, PProfProfiler};

fn bench_eval(criterion: &mut Criterion) {
    let mut test_cases = Vec::new();

    // full binary trees of sums over literals
    for depth in [10, 14] {
        let big_expr = Expr::expand_frames(depth, |x| {
            if x > 0 {
                ExprFrame::Add(x - 1, x - 1)
            } else {
                ExprFrame::Lit(1)
            }
        });
        let big_fev = to_fev(&big_expr);

        test_cases.push((depth, big_expr, big_fev));
    }

    let mut group = criterion.benchmark_group("evaluate expression tree");

    for (depth, big_expr, big_fev) in test_cases.iter() {
        group.bench_with_input(
            BenchmarkId::new("traditional boxed method", depth),
            big_expr,
            |b, expr| b.iter(|| naive_eval(expr)),
        );

        group.bench_with_input(
            BenchmarkId::new("stack machine collapse over boxed tree", depth),
            big_expr,
            |b, expr| {
                b.iter(|| expr.collapse_frames(eval_layer))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("fold-encoded instantiation", depth),
            big_fev,
            |b, e| b.iter(|| eval(e)),
        );
    }
    group.finish();

    let mut group = criterion.benchmark_group("build and rewrite");

    // every classify re-traverses its input, so rewrites stay on the small tree
    for (depth, big_expr, big_fev) in test_cases.iter().filter(|(d, _, _)| *d <= 10) {
        group.bench_with_input(
            BenchmarkId::new("rebuild fev from tagged tree", depth),
            big_expr,
            |b, expr| b.iter(|| to_fev(expr)),
        );

        let negated: ExprFev = Fev::embed(ExprFrame::Neg(big_fev.clone()));
        group.bench_with_input(
            BenchmarkId::new("push_neg via classifier", depth),
            &negated,
            |b, e| b.iter(|| push_neg(e)),
        );
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .with_profiler(
            PProfProfiler::new(100, Output::Flamegraph(None))
        );
    targets = bench_eval
}
criterion_main!(benches);
