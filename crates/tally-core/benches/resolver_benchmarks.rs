//! Benchmarks for the resolver stages and end-to-end resolution.
//!
//! Run benchmarks:
//! ```bash
//! cargo bench --bench resolver_benchmarks
//! ```
//!
//! Compare against a saved baseline:
//! ```bash
//! cargo bench --bench resolver_benchmarks -- --save-baseline main
//! cargo bench --bench resolver_benchmarks -- --baseline main
//! ```
#![allow(clippy::expect_used)] // Acceptable in benchmark code
#![allow(clippy::semicolon_if_nothing_returned)] // Benchmark closures don't need semicolons

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use serde_json::{json, Value};
use std::{hint::black_box, time::Duration};
use tally_core::resolver::{
    grouping::group_answers, selection::select_winner, DeepEquality, JsonComparator, Resolver,
    ResolverConfig, StaticProvider, Weight, WeightedAnswer,
};

/// Create a shared Tokio runtime for benchmarks
fn create_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread().enable_all().build().expect("runtime")
}

/// Configure Criterion for stable, reproducible benchmarks
fn criterion_config() -> Criterion {
    Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .warm_up_time(Duration::from_secs(3))
        .sample_size(100)
        .noise_threshold(0.02)
        .confidence_level(0.95)
}

// ============================================================================
// Test Data Generation
// ============================================================================

/// Generate a record with `items` nested entries
fn generate_record(id: u64, items: usize) -> Value {
    json!({
        "id": id,
        "name": format!("record-{id}"),
        "meta": { "fetchedAt": 1_700_000_000 + id, "source": "bench" },
        "items": (0..items)
            .map(|i| json!({ "index": i, "etag": format!("{id}-{i}") }))
            .collect::<Vec<_>>(),
    })
}

/// Generate `total` answers where the first `agreement` carry the same value
fn generate_answers(total: usize, agreement: usize) -> Vec<WeightedAnswer<u64>> {
    (0..total)
        .map(|i| {
            let value = if i < agreement { 0 } else { i as u64 };
            WeightedAnswer::new(Some(value), Weight::ONE).with_provider(format!("provider_{i}"))
        })
        .collect()
}

/// Generate `total` providers where the first `agreement` answer with the same record
fn generate_providers(total: usize, agreement: usize) -> Vec<StaticProvider<String, Value>> {
    (0..total)
        .map(|i| {
            let id = if i < agreement { 0 } else { i as u64 };
            StaticProvider::new(format!("provider_{i}"), Weight::ONE)
                .with_answer("record".to_string(), generate_record(id, 10))
        })
        .collect()
}

// ============================================================================
// Grouping Benchmarks
// ============================================================================

fn bench_grouping(c: &mut Criterion) {
    let rt = create_runtime();
    let mut group = c.benchmark_group("grouping");

    for (total, agreement) in [(3, 3), (3, 2), (3, 1), (10, 5), (50, 26)] {
        group.bench_with_input(
            BenchmarkId::new("deep_equality", format!("{total}_{agreement}")),
            &(total, agreement),
            |b, &(total, agreement)| {
                b.iter_batched(
                    || generate_answers(total, agreement),
                    |answers| rt.block_on(group_answers(black_box(answers), &DeepEquality)),
                    BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

// ============================================================================
// Selection Benchmarks
// ============================================================================

fn bench_selection(c: &mut Criterion) {
    let rt = create_runtime();
    let mut group = c.benchmark_group("selection");

    for count in [3, 10, 50] {
        let answers = generate_answers(count, count / 2 + 1);
        let groups = rt.block_on(group_answers(answers, &DeepEquality));
        group.bench_with_input(BenchmarkId::new("select_winner", count), &groups, |b, groups| {
            b.iter(|| select_winner(black_box(groups)))
        });
    }

    group.finish();
}

// ============================================================================
// JSON Comparison Benchmarks
// ============================================================================

fn bench_json_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_comparison");

    let plain = JsonComparator::default();
    let filtered =
        JsonComparator::new(vec!["meta.fetchedAt".to_string(), "items.*.etag".to_string()]);

    let a = generate_record(1, 50);
    let b_same = generate_record(1, 50);
    let b_other = generate_record(2, 50);

    group.bench_function("same_records", |b| {
        b.iter(|| plain.values_match(black_box(&a), black_box(&b_same)))
    });

    group.bench_function("different_records", |b| {
        b.iter(|| plain.values_match(black_box(&a), black_box(&b_other)))
    });

    group.bench_function("same_records_with_ignore_paths", |b| {
        b.iter(|| filtered.values_match(black_box(&a), black_box(&b_same)))
    });

    group.finish();
}

// ============================================================================
// End-to-End Resolution Benchmarks
// ============================================================================

fn bench_resolution(c: &mut Criterion) {
    let rt = create_runtime();
    let mut group = c.benchmark_group("resolution");

    let resolver = Resolver::json(ResolverConfig {
        ignore_fields: vec!["meta.fetchedAt".to_string()],
        ..ResolverConfig::default()
    });

    for count in [3, 5, 10, 20] {
        let providers = generate_providers(count, count / 2 + 1);
        group.bench_with_input(BenchmarkId::new("resolve", count), &providers, |b, providers| {
            b.iter(|| rt.block_on(resolver.resolve(black_box(providers.as_slice()), "record")))
        });
    }

    let answers = generate_answers(10, 6);
    let plain = Resolver::new(ResolverConfig::default());
    group.bench_function("resolve_answers_10", |b| {
        b.iter_batched(
            || answers.clone(),
            |answers| rt.block_on(plain.resolve_answers(black_box(answers))),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

// ============================================================================
// Main Benchmark Groups
// ============================================================================

criterion_group! {
    name = benches;
    config = criterion_config();
    targets =
        bench_grouping,
        bench_selection,
        bench_json_comparison,
        bench_resolution,
}

criterion_main!(benches);
