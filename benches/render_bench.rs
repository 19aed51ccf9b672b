//! Benchmarks for building and rendering PromQL expressions
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use promql_builder::promql::*;

fn error_ratio() -> BinaryExprBuilder {
    let requests = vector("http_requests_total")
        .unwrap()
        .label("job", "api")
        .unwrap();

    let errors = sum(rate(
        requests
            .clone()
            .label_match_regexp("code", "5..")
            .unwrap()
            .range("5m"),
    ))
    .by(["instance"]);
    let total = sum(rate(requests.range("5m"))).by(["instance"]);

    gt(div(errors, total), n(0.05))
}

fn deep_sum(depth: usize) -> Expr {
    (1..depth).fold(vector("x").unwrap().build(), |acc, i| {
        add(acc, n(i as f64)).build()
    })
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let expr = error_ratio().build();
    group.bench_function("error_ratio", |b| b.iter(|| render(black_box(&expr))));

    for depth in [10, 100, 1000] {
        let expr = deep_sum(depth);
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_function(format!("binary_chain_{}", depth), |b| {
            b.iter(|| render(black_box(&expr)))
        });
    }

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    group.bench_function("error_ratio", |b| b.iter(|| black_box(error_ratio()).build()));

    group.bench_function("histogram_quantile", |b| {
        b.iter(|| {
            histogram_quantile(
                black_box(0.99),
                sum(rate(vector("latency_bucket").unwrap().range("5m"))).by(["le"]),
            )
            .build()
        })
    });

    group.finish();
}

fn bench_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("json");

    let expr = error_ratio().build();
    let encoded = expr.to_json().unwrap();

    group.bench_function("encode", |b| b.iter(|| black_box(&expr).to_json().unwrap()));
    group.bench_function("decode", |b| {
        b.iter(|| Expr::from_json(black_box(&encoded)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_render, bench_build, bench_json);
criterion_main!(benches);
