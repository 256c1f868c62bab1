//! Benchmark setup error type.
//!
//! Aggregates the failures that may arise while preparing benchmark inputs
//! so setup functions can propagate them with `?`.

use kgbench_core::{MetricError, PickError, QueryGenError};
use kgbench_providers_memory::MemoryStoreError;

use crate::source::SyntheticError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic data generation failed.
    #[error("synthetic data generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// Building the synthetic knowledge graph failed.
    #[error("knowledge graph construction failed: {0}")]
    Memory(#[from] MemoryStoreError),
    /// Degree statistics failed.
    #[error("degree statistics failed: {0}")]
    Metric(#[from] MetricError),
    /// Picking failed.
    #[error("picking failed: {0}")]
    Pick(#[from] PickError),
    /// Query generation failed.
    #[error("query generation failed: {0}")]
    QueryGen(#[from] QueryGenError),
}
