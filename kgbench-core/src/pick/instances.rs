//! Candidates drawn from every instance of one type.

use crate::{
    error::StoreError,
    ids::{ConceptId, TypeLabel},
    store::ConceptStore,
};

use super::CandidateSource;

/// All instances of `type_label`, addressed through [`ConceptStore`] pages.
///
/// Every fetched concept is checked against the requested type; a store that
/// returns an instance of another type yields [`StoreError::TypeMismatch`].
#[derive(Clone, Debug)]
pub struct Instances<S> {
    store: S,
    type_label: TypeLabel,
}

impl<S: ConceptStore> Instances<S> {
    /// Creates a source over the instances of `type_label` held by `store`.
    #[must_use]
    pub fn new(store: S, type_label: impl Into<TypeLabel>) -> Self {
        Self {
            store,
            type_label: type_label.into(),
        }
    }

    /// Returns the type being sampled.
    #[must_use]
    pub fn type_label(&self) -> &TypeLabel {
        &self.type_label
    }
}

impl<S: ConceptStore> CandidateSource for Instances<S> {
    type Id = ConceptId;

    fn describe(&self) -> String {
        format!("instances of {}", self.type_label)
    }

    fn candidate_count(&self) -> Result<usize, StoreError> {
        self.store.instance_count(&self.type_label)
    }

    fn candidate_at(&self, offset: usize) -> Result<Option<ConceptId>, StoreError> {
        let Some(concept) = self.store.instance_at(&self.type_label, offset)? else {
            return Ok(None);
        };
        if concept.type_label != self.type_label {
            return Err(StoreError::TypeMismatch {
                id: concept.id,
                expected: self.type_label.clone(),
                found: concept.type_label,
            });
        }
        Ok(Some(concept.id))
    }
}
