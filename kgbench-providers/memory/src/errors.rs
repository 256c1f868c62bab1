use kgbench_core::{ConceptId, RoleLabel, TypeKind, TypeLabel};
use thiserror::Error;

/// Errors raised while building or loading a [`crate::KnowledgeGraph`].
#[derive(Debug, Error)]
pub enum MemoryStoreError {
    #[error("type `{label}` is declared more than once")]
    DuplicateType { label: TypeLabel },
    #[error("type `{label}` is not declared")]
    UnknownType { label: TypeLabel },
    #[error("`{label}` is a {found} type but a {expected} type is required")]
    KindMismatch {
        label: TypeLabel,
        expected: TypeKind,
        found: TypeKind,
    },
    #[error("`{owner}` plays `{raw}`, expected `relation:role`")]
    MalformedPlays { owner: TypeLabel, raw: String },
    #[error("relation `{relation}` does not relate role `{role}`")]
    UnknownRole { relation: TypeLabel, role: RoleLabel },
    #[error("relation `{label}` relates no roles")]
    EmptyRelation { label: TypeLabel },
    #[error("relation instance `{id}` has no role players")]
    NoRolePlayers { id: ConceptId },
    #[error("concept `{id}` is inserted more than once")]
    DuplicateConcept { id: ConceptId },
    #[error("concept `{id}` does not exist")]
    UnknownConcept { id: ConceptId },
    #[error("`{player}` of type `{type_label}` may not play `{role}` in `{relation}`")]
    IllegalPlayer {
        player: ConceptId,
        type_label: TypeLabel,
        relation: TypeLabel,
        role: RoleLabel,
    },
    #[error("`{owner}` of type `{owner_type}` may not own `{attribute}` of type `{attribute_type}`")]
    IllegalOwnership {
        owner: ConceptId,
        owner_type: TypeLabel,
        attribute: ConceptId,
        attribute_type: TypeLabel,
    },
    #[error("invalid yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
