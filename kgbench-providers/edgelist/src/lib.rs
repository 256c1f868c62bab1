//! Edge-list provider implementing [`kgbench_core::GraphProperties`] over an
//! in-memory hypergraph loaded from delimited text.

mod errors;
mod graph;
mod parse;

pub use errors::EdgeListError;
pub use graph::EdgeListGraph;
pub use parse::DEFAULT_DELIMITER;
