//! Kgbench core library.
//!
//! Sampling, degree statistics and query synthesis over abstract graph and
//! knowledge-store capabilities.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod degree;
mod error;
mod graph;
mod ids;
mod offsets;
mod pick;
mod query;
mod schema;
mod store;
#[cfg(test)]
mod test_utils;

pub use crate::{
    degree::{
        BINARY_ARITY, DegreeSequence, binary_edge_degree_distribution, degree_distribution,
        normalized_binary_edge_degree_distribution, normalized_degree_distribution,
    },
    error::{
        MetricError, MetricErrorCode, PickError, PickErrorCode, QueryGenError, QueryGenErrorCode,
        StoreError, StoreErrorCode, StoreResult,
    },
    graph::{EdgePair, GraphProperties, max_allowed_degree},
    ids::{Concept, ConceptId, RoleLabel, TypeLabel, VertexId},
    offsets::RandomOffsets,
    pick::{CandidateSource, Instances, NotPlayingRole, Picker, Sample},
    query::{
        BuilderState, Extension, GeneratorBuilder, GeneratorConfig, QueryBuilder, QueryGenerator,
        QueryPattern, RelationStatement, Slot, Variable,
    },
    schema::{SchemaIntrospector, TypeKind},
    store::{ConceptStore, IdStore},
};
