//! Degree distribution benchmarks over seeded random hypergraphs.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use kgbench_benches::{error::BenchSetupError, params::GraphBenchParams, source::SyntheticGraphConfig};
use kgbench_core::{degree_distribution, normalized_degree_distribution};

const SEED: u64 = 42;

const PERCENTILES: [f64; 5] = [0.0, 20.0, 50.0, 70.0, 100.0];

/// Vertex counts; each graph has four edges per vertex.
const VERTEX_COUNTS: &[usize] = &[1_000, 10_000];

fn degree_distribution_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("degree_distribution");
    group.sample_size(30);
    for &vertices in VERTEX_COUNTS {
        for arity in [2_u32, 3] {
            let edges = vertices.saturating_mul(4);
            let graph = SyntheticGraphConfig {
                vertices,
                edges,
                arity: arity as usize,
                seed: SEED,
            }
            .generate()?;
            let params = GraphBenchParams { vertices, edges };
            normalized_degree_distribution(&graph, arity, &PERCENTILES)?;

            group.bench_with_input(
                BenchmarkId::new(format!("raw/arity={arity}"), &params),
                &graph,
                |b, graph| b.iter(|| degree_distribution(graph, arity, &PERCENTILES)),
            );
            group.bench_with_input(
                BenchmarkId::new(format!("normalized/arity={arity}"), &params),
                &graph,
                |b, graph| b.iter(|| normalized_degree_distribution(graph, arity, &PERCENTILES)),
            );
        }
    }
    group.finish();
    Ok(())
}

fn degree_distribution_bench(c: &mut Criterion) {
    if let Err(err) = degree_distribution_impl(c) {
        panic!("degree distribution benchmark setup failed: {err}");
    }
}

criterion_group!(benches, degree_distribution_bench);
criterion_main!(benches);
