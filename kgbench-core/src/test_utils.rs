//! Shared test utilities for `kgbench-core`.

use std::collections::{BTreeMap, BTreeSet};

use kgbench_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::{
    error::{StoreError, StoreResult},
    ids::{Concept, ConceptId, RoleLabel, TypeLabel},
    schema::{SchemaIntrospector, TypeKind},
    store::ConceptStore,
};

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `PROGTEST_CASES` and
/// `KGBENCH_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Schema and instance store held in plain maps.
#[derive(Clone, Debug, Default)]
pub(crate) struct FakeKnowledge {
    kinds: BTreeMap<TypeLabel, TypeKind>,
    owns: BTreeMap<TypeLabel, BTreeSet<TypeLabel>>,
    plays: BTreeMap<TypeLabel, BTreeSet<(TypeLabel, RoleLabel)>>,
    relates: BTreeMap<TypeLabel, BTreeSet<RoleLabel>>,
    instances: BTreeMap<TypeLabel, Vec<ConceptId>>,
}

impl FakeKnowledge {
    pub(crate) fn with_entity(mut self, label: &str) -> Self {
        self.kinds.insert(label.into(), TypeKind::Entity);
        self
    }

    pub(crate) fn with_attribute(mut self, label: &str) -> Self {
        self.kinds.insert(label.into(), TypeKind::Attribute);
        self
    }

    pub(crate) fn with_relation(mut self, label: &str, roles: &[&str]) -> Self {
        self.kinds.insert(label.into(), TypeKind::Relation);
        self.relates
            .insert(label.into(), roles.iter().copied().map(RoleLabel::from).collect());
        self
    }

    pub(crate) fn with_owns(mut self, owner: &str, attribute: &str) -> Self {
        self.owns.entry(owner.into()).or_default().insert(attribute.into());
        self
    }

    pub(crate) fn with_plays(mut self, player: &str, relation: &str, role: &str) -> Self {
        self.plays
            .entry(player.into())
            .or_default()
            .insert((relation.into(), role.into()));
        self
    }

    pub(crate) fn with_instances(mut self, label: &str, ids: &[&str]) -> Self {
        self.instances
            .insert(label.into(), ids.iter().copied().map(ConceptId::from).collect());
        self
    }

    pub(crate) fn owns_instance(&self, label: &TypeLabel, id: &ConceptId) -> bool {
        self.instances
            .get(label)
            .is_some_and(|ids| ids.contains(id))
    }

    fn require(&self, label: &TypeLabel) -> StoreResult<TypeKind> {
        self.kinds
            .get(label)
            .copied()
            .ok_or_else(|| StoreError::UnknownType {
                label: label.clone(),
            })
    }
}

/// People and companies related by employment.
pub(crate) fn employment_knowledge() -> FakeKnowledge {
    FakeKnowledge::default()
        .with_entity("person")
        .with_entity("company")
        .with_attribute("name")
        .with_attribute("start-date")
        .with_relation("employment", &["employee", "employer"])
        .with_owns("person", "name")
        .with_owns("company", "name")
        .with_owns("employment", "start-date")
        .with_plays("person", "employment", "employee")
        .with_plays("company", "employment", "employer")
        .with_instances("person", &["p1", "p2", "p3"])
        .with_instances("company", &["c1", "c2"])
}

impl SchemaIntrospector for FakeKnowledge {
    fn thing_types(&self) -> StoreResult<BTreeSet<TypeLabel>> {
        Ok(self.kinds.keys().cloned().collect())
    }

    fn kind_of(&self, type_label: &TypeLabel) -> StoreResult<TypeKind> {
        self.require(type_label)
    }

    fn roles_of(&self, relation: &TypeLabel) -> StoreResult<BTreeSet<RoleLabel>> {
        self.require(relation)?;
        Ok(self.relates.get(relation).cloned().unwrap_or_default())
    }

    fn roles_played_by(&self, type_label: &TypeLabel) -> StoreResult<BTreeSet<(TypeLabel, RoleLabel)>> {
        self.require(type_label)?;
        Ok(self.plays.get(type_label).cloned().unwrap_or_default())
    }

    fn legal_role_player_types(
        &self,
        relation: &TypeLabel,
        role: &RoleLabel,
    ) -> StoreResult<BTreeSet<TypeLabel>> {
        Ok(self
            .plays
            .iter()
            .filter(|(_, played)| played.contains(&(relation.clone(), role.clone())))
            .map(|(player, _)| player.clone())
            .collect())
    }

    fn legal_attribute_types(&self, owner: &TypeLabel) -> StoreResult<BTreeSet<TypeLabel>> {
        self.require(owner)?;
        Ok(self.owns.get(owner).cloned().unwrap_or_default())
    }
}

impl ConceptStore for FakeKnowledge {
    fn instance_count(&self, type_label: &TypeLabel) -> StoreResult<usize> {
        Ok(self.instances.get(type_label).map_or(0, Vec::len))
    }

    fn instance_at(&self, type_label: &TypeLabel, offset: usize) -> StoreResult<Option<Concept>> {
        Ok(self
            .instances
            .get(type_label)
            .and_then(|ids| ids.get(offset))
            .map(|id| Concept::new(id.clone(), type_label.clone())))
    }
}
