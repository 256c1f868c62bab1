//! Candidates restricted to instances not yet playing a role.

use std::cell::OnceCell;

use tracing::debug;

use crate::{
    error::StoreError,
    ids::{ConceptId, RoleLabel, TypeLabel},
    store::IdStore,
};

use super::CandidateSource;

/// Instances of a type that play no `role` in any `relation`.
///
/// The count is asked of the [`IdStore`] directly. The id list is fetched once,
/// on the first lookup, and reused for the lifetime of the source, so a
/// picker built over it never yields an id twice even if the index changes
/// underneath.
#[derive(Debug)]
pub struct NotPlayingRole<S> {
    store: S,
    type_label: TypeLabel,
    relation: TypeLabel,
    role: RoleLabel,
    snapshot: OnceCell<Vec<ConceptId>>,
}

impl<S: IdStore> NotPlayingRole<S> {
    /// Creates a source over instances of `type_label` free to take `role`
    /// in `relation`.
    #[must_use]
    pub fn new(
        store: S,
        type_label: impl Into<TypeLabel>,
        relation: impl Into<TypeLabel>,
        role: impl Into<RoleLabel>,
    ) -> Self {
        Self {
            store,
            type_label: type_label.into(),
            relation: relation.into(),
            role: role.into(),
            snapshot: OnceCell::new(),
        }
    }

    fn snapshot(&self) -> Result<&[ConceptId], StoreError> {
        if let Some(ids) = self.snapshot.get() {
            return Ok(ids);
        }
        let ids = self
            .store
            .ids_not_playing_role(&self.type_label, &self.relation, &self.role)?;
        debug!(
            type_label = %self.type_label,
            relation = %self.relation,
            role = %self.role,
            ids = ids.len(),
            "fetched ids not playing role",
        );
        Ok(self.snapshot.get_or_init(|| ids))
    }
}

impl<S: IdStore> CandidateSource for NotPlayingRole<S> {
    type Id = ConceptId;

    fn describe(&self) -> String {
        format!(
            "{} not playing {} in {}",
            self.type_label, self.role, self.relation
        )
    }

    fn candidate_count(&self) -> Result<usize, StoreError> {
        self.store
            .count_ids_not_playing_role(&self.type_label, &self.relation, &self.role)
    }

    fn candidate_at(&self, offset: usize) -> Result<Option<ConceptId>, StoreError> {
        Ok(self.snapshot()?.get(offset).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;
    use std::collections::BTreeSet;

    use rand::{SeedableRng, rngs::SmallRng};

    use crate::{error::StoreResult, pick::Picker};

    struct Counting {
        ids: Vec<&'static str>,
        fetches: Cell<usize>,
    }

    impl IdStore for Counting {
        fn ids_not_playing_role(
            &self,
            _: &TypeLabel,
            _: &TypeLabel,
            _: &RoleLabel,
        ) -> StoreResult<Vec<ConceptId>> {
            self.fetches.set(self.fetches.get() + 1);
            Ok(self.ids.iter().copied().map(ConceptId::from).collect())
        }
    }

    #[test]
    fn fetches_the_id_list_once_per_source() {
        let store = Counting {
            ids: vec!["a", "b", "c", "d"],
            fetches: Cell::new(0),
        };
        let source = NotPlayingRole::new(&store, "person", "employment", "employee");
        let mut picker = Picker::new(SmallRng::seed_from_u64(8), source);
        let picked: BTreeSet<ConceptId> = picker
            .pick(4)
            .expect("four ids exist")
            .into_iter()
            .collect();
        assert_eq!(picked.len(), 4);
        assert_eq!(store.fetches.get(), 2, "one fetch for the count, one for the list");
    }

    #[test]
    fn empty_index_yields_nothing() {
        let store = Counting {
            ids: Vec::new(),
            fetches: Cell::new(0),
        };
        let mut picker = Picker::new(
            SmallRng::seed_from_u64(8),
            NotPlayingRole::new(&store, "person", "employment", "employee"),
        );
        assert_eq!(picker.pick_one().expect("empty sample is fine"), None);
    }
}
