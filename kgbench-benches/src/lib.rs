//! Benchmark support crate for kgbench.
//!
//! Provides seeded synthetic graphs, concept stores and knowledge graphs used
//! by the Criterion benchmarks for offset sampling, picking, degree
//! statistics and query generation.

pub mod error;
pub mod params;
pub mod source;
