//! Random offset sampling benchmarks.
//!
//! Measures a full permutation of `0..n` and a short prefix of one. The
//! prefix case is what pickers pay when drawing a handful of candidates from
//! a large type.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{SeedableRng, rngs::SmallRng};

use kgbench_benches::params::PickBenchParams;
use kgbench_core::RandomOffsets;

const SEED: u64 = 42;

const BOUNDS: &[usize] = &[100, 1_000, 10_000];

const PREFIX: usize = 8;

fn random_offsets(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_offsets");
    for &bound in BOUNDS {
        let full = PickBenchParams {
            candidates: bound,
            drawn: bound,
        };
        group.bench_with_input(BenchmarkId::new("permutation", &full), &bound, |b, &bound| {
            let mut rng = SmallRng::seed_from_u64(SEED);
            b.iter(|| RandomOffsets::new(&mut rng, bound).count());
        });

        let prefix = PickBenchParams {
            candidates: bound,
            drawn: PREFIX,
        };
        group.bench_with_input(BenchmarkId::new("prefix", &prefix), &bound, |b, &bound| {
            let mut rng = SmallRng::seed_from_u64(SEED);
            b.iter(|| RandomOffsets::new(&mut rng, bound).take(PREFIX).max());
        });
    }
    group.finish();
}

criterion_group!(benches, random_offsets);
criterion_main!(benches);
