//! Benchmarks for the order reconciliation and overflow allocation paths.
//!
//! These are the hot pure functions: reconcile runs on every taxonomy
//! cascade and ordering sync, the allocator on every selection change.

use bowl_builder::calculator::allocate;
use bowl_builder::reconcile::{partition, reconcile};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn category_set(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("category-{}", i)).collect()
}

fn bench_reconcile(c: &mut Criterion) {
    // half the persisted order is stale, half the live set is new
    let persisted = category_set(64);
    let mut live = category_set(96);
    live.drain(0..32);

    c.bench_function("reconcile_64_persisted_64_live", |b| {
        b.iter(|| reconcile(black_box(&persisted), black_box(&live)))
    });
}

fn bench_partition(c: &mut Criterion) {
    let stored: Vec<(String, u32)> = category_set(64)
        .into_iter()
        .map(|category| (category, 2))
        .collect();
    let mut live = category_set(96);
    live.drain(0..32);

    c.bench_function("partition_64_stored_64_live", |b| {
        b.iter(|| partition(black_box(&stored), black_box(&live), 0))
    });
}

fn bench_allocate(c: &mut Criterion) {
    let selection: Vec<(String, u32)> = (0..32)
        .map(|i| (format!("ingredient-{}", i), (i % 4) as u32))
        .collect();

    c.bench_function("extra_quantities_32_ingredients", |b| {
        b.iter(|| allocate::extra_quantities(black_box(8), black_box(&selection)))
    });
}

criterion_group!(benches, bench_reconcile, bench_partition, bench_allocate);
criterion_main!(benches);
