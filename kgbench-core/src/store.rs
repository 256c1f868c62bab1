//! Capability interfaces over concept stores consumed by the pickers.

use crate::{
    error::StoreResult,
    ids::{Concept, ConceptId, RoleLabel, TypeLabel},
};

/// Paged, read-only access to the instances of each type.
///
/// Offsets are ordinal positions among the instances of one type in an order
/// that stays fixed while the store is not mutated.
pub trait ConceptStore {
    /// Returns how many instances of `type_label` exist.
    fn instance_count(&self, type_label: &TypeLabel) -> StoreResult<usize>;

    /// Returns the instance at ordinal `offset` among instances of
    /// `type_label`, or `None` if the offset is past the end.
    fn instance_at(&self, type_label: &TypeLabel, offset: usize) -> StoreResult<Option<Concept>>;
}

/// Auxiliary index answering which instances are free to take a role.
pub trait IdStore {
    /// Returns the ids of instances of `type_label` that do not currently play
    /// `role` in any relation of type `relation`.
    fn ids_not_playing_role(
        &self,
        type_label: &TypeLabel,
        relation: &TypeLabel,
        role: &RoleLabel,
    ) -> StoreResult<Vec<ConceptId>>;

    /// Returns the number of ids [`IdStore::ids_not_playing_role`] would yield.
    fn count_ids_not_playing_role(
        &self,
        type_label: &TypeLabel,
        relation: &TypeLabel,
        role: &RoleLabel,
    ) -> StoreResult<usize> {
        Ok(self.ids_not_playing_role(type_label, relation, role)?.len())
    }
}

impl<S: ConceptStore + ?Sized> ConceptStore for &S {
    fn instance_count(&self, type_label: &TypeLabel) -> StoreResult<usize> {
        (**self).instance_count(type_label)
    }

    fn instance_at(&self, type_label: &TypeLabel, offset: usize) -> StoreResult<Option<Concept>> {
        (**self).instance_at(type_label, offset)
    }
}

impl<S: IdStore + ?Sized> IdStore for &S {
    fn ids_not_playing_role(
        &self,
        type_label: &TypeLabel,
        relation: &TypeLabel,
        role: &RoleLabel,
    ) -> StoreResult<Vec<ConceptId>> {
        (**self).ids_not_playing_role(type_label, relation, role)
    }

    fn count_ids_not_playing_role(
        &self,
        type_label: &TypeLabel,
        relation: &TypeLabel,
        role: &RoleLabel,
    ) -> StoreResult<usize> {
        (**self).count_ids_not_playing_role(type_label, relation, role)
    }
}
