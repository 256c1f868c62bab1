//! In-memory typed knowledge store.
//!
//! Loads a schema and instance data from YAML and answers every capability
//! interface the core consumes: schema introspection, paged instance lookups,
//! role-exclusion indexes and graph statistics over entity role players.

mod data;
mod errors;
mod schema;
mod store;

pub use data::{DataDocument, OwnershipRecord, PlayerRecord, RelationRecord, ThingRecord};
pub use errors::MemoryStoreError;
pub use schema::{AttributeDecl, EntityDecl, RelationDecl, Schema, SchemaDocument};
pub use store::KnowledgeGraph;
