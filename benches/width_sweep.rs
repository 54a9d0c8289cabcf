//! Benchmarks for proving rules at a single width
//!
//! Run with: cargo bench --bench width_sweep
//!
//! Solver time grows with the width, so each rule is measured at a few
//! representative widths rather than across the full sweep.

use std::hint::black_box;
use std::sync::Arc;

use checked_arith_rules::{run_rule, CollectingObserver, RuleBank, RuleConfig};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_single_width(c: &mut Criterion) {
    let bank = RuleBank::standard();
    let mut group = c.benchmark_group("single width");
    group.sample_size(10);

    for rule in bank.iter() {
        for bits in [8u32, 64, 256] {
            let config = RuleConfig::new().with_single_width(bits);
            group.bench_with_input(BenchmarkId::new(rule.name(), bits), &config, |b, config| {
                b.iter(|| {
                    let observer = Arc::new(CollectingObserver::new());
                    black_box(run_rule(rule, config, observer)).is_ok()
                });
            });
        }
    }

    group.finish();
}

fn bench_quick_bank(c: &mut Criterion) {
    let bank = RuleBank::standard();
    let mut group = c.benchmark_group("bank");
    group.sample_size(10);

    group.bench_function("run_all quick", |b| {
        b.iter(|| {
            let report = bank.run_all(&RuleConfig::quick(), Arc::new(CollectingObserver::new()));
            black_box(report).is_ok()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_single_width, bench_quick_bank);
criterion_main!(benches);
