//! Seeded synthetic benchmark inputs.
//!
//! Every generator is deterministic for a given seed so benchmark runs are
//! comparable across machines and revisions.

mod errors;
mod graph;
mod knowledge;
mod store;

pub use errors::SyntheticError;
pub use graph::SyntheticGraphConfig;
pub use knowledge::{SyntheticKnowledgeConfig, WORKPLACE_SCHEMA_YAML};
pub use store::{SyntheticStore, SyntheticStoreConfig};
