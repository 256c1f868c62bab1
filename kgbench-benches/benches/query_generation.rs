//! Query synthesis benchmarks over seeded workplace knowledge graphs.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use kgbench_benches::{error::BenchSetupError, source::SyntheticKnowledgeConfig};
use kgbench_core::{GeneratorBuilder, QueryGenerator};

const SEED: u64 = 42;

const QUERIES: usize = 64;

const PEOPLE: &[usize] = &[100, 1_000];

fn query_generation_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("query_generation");
    for &people in PEOPLE {
        let knowledge = SyntheticKnowledgeConfig {
            people,
            companies: people / 10,
            employments: people,
            friendships: people,
            seed: SEED,
        }
        .generate()?;
        for pin_probability in [0.0, 0.5] {
            let config = GeneratorBuilder::new()
                .with_seed(SEED)
                .with_vars(2, 6)
                .with_pin_probability(pin_probability)
                .build()?;
            QueryGenerator::new(&knowledge, config.clone()).generate(QUERIES)?;

            group.bench_with_input(
                BenchmarkId::new(format!("pin={pin_probability}"), people),
                &config,
                |b, config| {
                    b.iter(|| QueryGenerator::new(&knowledge, config.clone()).generate(QUERIES));
                },
            );
        }
    }
    group.finish();
    Ok(())
}

fn query_generation(c: &mut Criterion) {
    if let Err(err) = query_generation_impl(c) {
        panic!("query generation benchmark setup failed: {err}");
    }
}

criterion_group!(benches, query_generation);
criterion_main!(benches);
