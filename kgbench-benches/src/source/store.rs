//! Flat concept store with a single role index.

use std::collections::BTreeSet;

use kgbench_core::{
    Concept, ConceptId, ConceptStore, IdStore, RoleLabel, StoreError, StoreResult, TypeLabel,
};

use super::SyntheticError;

/// Configuration for a [`SyntheticStore`].
#[derive(Clone, Copy, Debug)]
pub struct SyntheticStoreConfig {
    /// Number of instances of the single stored type.
    pub instances: usize,
    /// Every `playing_stride`-th instance already plays the indexed role.
    pub playing_stride: usize,
}

/// Concept store holding instances of one type and which of them play one
/// role.
///
/// Instance `i` has id `c{i}`; it plays the indexed role when `i` is a
/// multiple of the stride.
#[derive(Clone, Debug)]
pub struct SyntheticStore {
    type_label: TypeLabel,
    relation: TypeLabel,
    role: RoleLabel,
    instances: Vec<ConceptId>,
    playing: BTreeSet<ConceptId>,
}

impl SyntheticStore {
    /// Type label of the stored instances.
    pub const TYPE: &'static str = "thing";
    /// Relation of the indexed role.
    pub const RELATION: &'static str = "membership";
    /// Indexed role.
    pub const ROLE: &'static str = "member";

    /// Builds the store.
    ///
    /// # Errors
    /// Returns [`SyntheticError::ZeroInstances`] or
    /// [`SyntheticError::ZeroStride`] for empty shapes.
    pub fn generate(config: SyntheticStoreConfig) -> Result<Self, SyntheticError> {
        if config.instances == 0 {
            return Err(SyntheticError::ZeroInstances);
        }
        if config.playing_stride == 0 {
            return Err(SyntheticError::ZeroStride);
        }
        let instances: Vec<ConceptId> = (0..config.instances)
            .map(|index| ConceptId::new(format!("c{index}")))
            .collect();
        let playing = instances
            .iter()
            .step_by(config.playing_stride)
            .cloned()
            .collect();
        Ok(Self {
            type_label: TypeLabel::from(Self::TYPE),
            relation: TypeLabel::from(Self::RELATION),
            role: RoleLabel::from(Self::ROLE),
            instances,
            playing,
        })
    }

    /// Returns how many instances already play the indexed role.
    #[must_use]
    pub fn playing_count(&self) -> usize {
        self.playing.len()
    }

    fn check_type(&self, type_label: &TypeLabel) -> StoreResult<()> {
        if *type_label == self.type_label {
            Ok(())
        } else {
            Err(StoreError::UnknownType {
                label: type_label.clone(),
            })
        }
    }
}

impl ConceptStore for SyntheticStore {
    fn instance_count(&self, type_label: &TypeLabel) -> StoreResult<usize> {
        self.check_type(type_label)?;
        Ok(self.instances.len())
    }

    fn instance_at(&self, type_label: &TypeLabel, offset: usize) -> StoreResult<Option<Concept>> {
        self.check_type(type_label)?;
        Ok(self
            .instances
            .get(offset)
            .map(|id| Concept::new(id.clone(), self.type_label.clone())))
    }
}

impl IdStore for SyntheticStore {
    fn ids_not_playing_role(
        &self,
        type_label: &TypeLabel,
        relation: &TypeLabel,
        role: &RoleLabel,
    ) -> StoreResult<Vec<ConceptId>> {
        self.check_type(type_label)?;
        if *relation != self.relation || *role != self.role {
            return Err(StoreError::UnknownRole {
                relation: relation.clone(),
                role: role.clone(),
            });
        }
        Ok(self
            .instances
            .iter()
            .filter(|id| !self.playing.contains(*id))
            .cloned()
            .collect())
    }
}
