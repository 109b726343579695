//! Classification Cache Benchmark
//!
//! Measures the cost of query classification:
//! - Fingerprint and graph-type lookups on a warm cache (hit path)
//! - Direct computation with caching disabled (miss path)
//! - Fingerprinting as vector payload size grows

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use graphrag_core::fingerprint::fingerprint;
use graphrag_core::{OptimizerConfig, Query, QueryOptimizer};
use serde_json::json;

fn sample_query(vector_len: usize) -> Query {
    Query::from_json(json!({
        "query_vector": vec![0.1f64; vector_len],
        "query": "search wikidata entries about graph databases",
        "traversal": {"max_depth": 3, "edge_types": ["cites", "links"]},
        "priority": "high",
    }))
    .expect("Failed to build sample query")
}

fn bench_lookup_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup_paths");
    let query = sample_query(384);

    let mut warm = QueryOptimizer::default();
    warm.optimize_query(&query);
    group.bench_function("cached", |b| {
        b.iter(|| black_box(warm.optimize_query(black_box(&query))))
    });

    let mut cold = QueryOptimizer::new(OptimizerConfig::disabled())
        .expect("Failed to create optimizer");
    group.bench_function("uncached", |b| {
        b.iter(|| black_box(cold.optimize_query(black_box(&query))))
    });

    group.finish();
}

fn bench_fingerprint_by_vector_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("fingerprint_by_vector_size");

    for size in [0usize, 128, 768, 4096] {
        let query = sample_query(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &query, |b, q| {
            b.iter(|| black_box(fingerprint(black_box(q))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_lookup_paths, bench_fingerprint_by_vector_size);
criterion_main!(benches);
