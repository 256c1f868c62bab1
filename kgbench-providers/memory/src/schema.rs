//! Schema documents and the validated schema they compile into.

use std::collections::{BTreeMap, BTreeSet};

use kgbench_core::{RoleLabel, SchemaIntrospector, StoreError, StoreResult, TypeKind, TypeLabel};
use serde::Deserialize;

use crate::errors::MemoryStoreError;

/// Raw schema as written in YAML.
///
/// `plays` entries take the form `relation:role`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    /// Entity types keyed by label.
    #[serde(default)]
    pub entities: BTreeMap<String, EntityDecl>,
    /// Relation types keyed by label.
    #[serde(default)]
    pub relations: BTreeMap<String, RelationDecl>,
    /// Attribute types keyed by label.
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeDecl>,
}

/// Declaration of one entity type.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityDecl {
    /// Attribute types instances may own.
    #[serde(default)]
    pub owns: Vec<String>,
    /// Roles instances may play, as `relation:role`.
    #[serde(default)]
    pub plays: Vec<String>,
}

/// Declaration of one relation type.
///
/// `relates` must name at least one role.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationDecl {
    /// Roles the relation binds.
    #[serde(default)]
    pub relates: Vec<String>,
    /// Attribute types instances may own.
    #[serde(default)]
    pub owns: Vec<String>,
    /// Roles instances may play in other relations, as `relation:role`.
    #[serde(default)]
    pub plays: Vec<String>,
}

/// Declaration of one attribute type.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeDecl {
    /// Datatype of the attribute's values, kept for display only.
    #[serde(default)]
    pub value: Option<String>,
    /// Attribute types instances may own.
    #[serde(default)]
    pub owns: Vec<String>,
    /// Roles instances may play, as `relation:role`.
    #[serde(default)]
    pub plays: Vec<String>,
}

/// Validated schema.
///
/// Every label referenced by `owns`, `plays` and `relates` resolves to a
/// declared type of the right kind.
///
/// # Examples
/// ```
/// use kgbench_core::{SchemaIntrospector, TypeKind, TypeLabel};
/// use kgbench_providers_memory::Schema;
///
/// let schema = Schema::from_yaml_str(
///     "entities: { person: { plays: [\"friendship:friend\"] } }\n\
///      relations: { friendship: { relates: [friend] } }\n",
/// )?;
/// assert_eq!(schema.kind_of(&TypeLabel::from("person"))?, TypeKind::Entity);
/// assert_eq!(schema.roles_played_by(&TypeLabel::from("person"))?.len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Schema {
    kinds: BTreeMap<TypeLabel, TypeKind>,
    owns: BTreeMap<TypeLabel, BTreeSet<TypeLabel>>,
    plays: BTreeMap<TypeLabel, BTreeSet<(TypeLabel, RoleLabel)>>,
    relates: BTreeMap<TypeLabel, BTreeSet<RoleLabel>>,
    players: BTreeMap<(TypeLabel, RoleLabel), BTreeSet<TypeLabel>>,
    value_types: BTreeMap<TypeLabel, String>,
}

impl Schema {
    /// Parses and validates a YAML schema document.
    ///
    /// # Errors
    /// Returns [`MemoryStoreError::Yaml`] for malformed YAML and the
    /// validation errors of [`Schema::from_document`].
    pub fn from_yaml_str(yaml: &str) -> Result<Self, MemoryStoreError> {
        let document: SchemaDocument = serde_yaml::from_str(yaml)?;
        Self::from_document(document)
    }

    /// Validates a schema document.
    ///
    /// # Errors
    /// Returns [`MemoryStoreError::DuplicateType`] when a label is declared
    /// under two kinds, [`MemoryStoreError::EmptyRelation`] for relations
    /// without roles, [`MemoryStoreError::MalformedPlays`] for `plays`
    /// entries without a `relation:role` shape, and
    /// [`MemoryStoreError::UnknownType`], [`MemoryStoreError::KindMismatch`]
    /// or [`MemoryStoreError::UnknownRole`] for dangling references.
    pub fn from_document(document: SchemaDocument) -> Result<Self, MemoryStoreError> {
        let mut schema = Self::default();
        let mut declared = Vec::new();

        for (label, decl) in document.entities {
            let label = schema.declare(&label, TypeKind::Entity)?;
            declared.push((label, decl.owns, decl.plays));
        }
        for (label, decl) in document.relations {
            let label = schema.declare(&label, TypeKind::Relation)?;
            if decl.relates.is_empty() {
                return Err(MemoryStoreError::EmptyRelation { label });
            }
            let roles = decl
                .relates
                .iter()
                .map(|role| RoleLabel::from(role.as_str()))
                .collect();
            schema.relates.insert(label.clone(), roles);
            declared.push((label, decl.owns, decl.plays));
        }
        for (label, decl) in document.attributes {
            let label = schema.declare(&label, TypeKind::Attribute)?;
            if let Some(value) = decl.value {
                schema.value_types.insert(label.clone(), value);
            }
            declared.push((label, decl.owns, decl.plays));
        }

        for (label, owns, plays) in declared {
            for attribute in owns {
                let attribute = TypeLabel::from(attribute);
                schema.expect_kind(&attribute, TypeKind::Attribute)?;
                schema.owns.entry(label.clone()).or_default().insert(attribute);
            }
            for raw in plays {
                let (relation, role) = schema.parse_plays(&label, &raw)?;
                schema
                    .players
                    .entry((relation.clone(), role.clone()))
                    .or_default()
                    .insert(label.clone());
                schema.plays.entry(label.clone()).or_default().insert((relation, role));
            }
        }
        Ok(schema)
    }

    /// Returns the declared value datatype of an attribute type.
    #[must_use]
    pub fn value_type(&self, attribute: &TypeLabel) -> Option<&str> {
        self.value_types.get(attribute).map(String::as_str)
    }

    /// Returns whether instances of `owner` may own `attribute`.
    #[must_use]
    pub fn may_own(&self, owner: &TypeLabel, attribute: &TypeLabel) -> bool {
        self.owns.get(owner).is_some_and(|owned| owned.contains(attribute))
    }

    /// Returns whether instances of `player` may play `role` in `relation`.
    #[must_use]
    pub fn may_play(&self, player: &TypeLabel, relation: &TypeLabel, role: &RoleLabel) -> bool {
        self.players
            .get(&(relation.clone(), role.clone()))
            .is_some_and(|types| types.contains(player))
    }

    pub(crate) fn kind(&self, label: &TypeLabel) -> Result<TypeKind, MemoryStoreError> {
        self.kinds
            .get(label)
            .copied()
            .ok_or_else(|| MemoryStoreError::UnknownType { label: label.clone() })
    }

    pub(crate) fn expect_kind(&self, label: &TypeLabel, expected: TypeKind) -> Result<(), MemoryStoreError> {
        let found = self.kind(label)?;
        if found == expected {
            Ok(())
        } else {
            Err(MemoryStoreError::KindMismatch {
                label: label.clone(),
                expected,
                found,
            })
        }
    }

    pub(crate) fn relates(&self, relation: &TypeLabel, role: &RoleLabel) -> bool {
        self.relates.get(relation).is_some_and(|roles| roles.contains(role))
    }

    fn declare(&mut self, label: &str, kind: TypeKind) -> Result<TypeLabel, MemoryStoreError> {
        let label = TypeLabel::from(label);
        if self.kinds.insert(label.clone(), kind).is_some() {
            return Err(MemoryStoreError::DuplicateType { label });
        }
        Ok(label)
    }

    fn parse_plays(&self, owner: &TypeLabel, raw: &str) -> Result<(TypeLabel, RoleLabel), MemoryStoreError> {
        let malformed = || MemoryStoreError::MalformedPlays {
            owner: owner.clone(),
            raw: raw.to_owned(),
        };
        let (relation, role) = raw.split_once(':').ok_or_else(malformed)?;
        let (relation, role) = (relation.trim(), role.trim());
        if relation.is_empty() || role.is_empty() {
            return Err(malformed());
        }
        let relation = TypeLabel::from(relation);
        let role = RoleLabel::from(role);
        self.expect_kind(&relation, TypeKind::Relation)?;
        if !self.relates(&relation, &role) {
            return Err(MemoryStoreError::UnknownRole { relation, role });
        }
        Ok((relation, role))
    }

    fn known(&self, label: &TypeLabel) -> StoreResult<TypeKind> {
        self.kinds
            .get(label)
            .copied()
            .ok_or_else(|| StoreError::UnknownType { label: label.clone() })
    }
}

impl SchemaIntrospector for Schema {
    fn thing_types(&self) -> StoreResult<BTreeSet<TypeLabel>> {
        Ok(self.kinds.keys().cloned().collect())
    }

    fn kind_of(&self, type_label: &TypeLabel) -> StoreResult<TypeKind> {
        self.known(type_label)
    }

    fn roles_of(&self, relation: &TypeLabel) -> StoreResult<BTreeSet<RoleLabel>> {
        self.known(relation)?;
        Ok(self.relates.get(relation).cloned().unwrap_or_default())
    }

    fn roles_played_by(&self, type_label: &TypeLabel) -> StoreResult<BTreeSet<(TypeLabel, RoleLabel)>> {
        self.known(type_label)?;
        Ok(self.plays.get(type_label).cloned().unwrap_or_default())
    }

    fn legal_role_player_types(
        &self,
        relation: &TypeLabel,
        role: &RoleLabel,
    ) -> StoreResult<BTreeSet<TypeLabel>> {
        self.known(relation)?;
        if !self.relates(relation, role) {
            return Err(StoreError::UnknownRole {
                relation: relation.clone(),
                role: role.clone(),
            });
        }
        Ok(self
            .players
            .get(&(relation.clone(), role.clone()))
            .cloned()
            .unwrap_or_default())
    }

    fn legal_attribute_types(&self, owner: &TypeLabel) -> StoreResult<BTreeSet<TypeLabel>> {
        self.known(owner)?;
        Ok(self.owns.get(owner).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use kgbench_test_support::fixtures::EMPLOYMENT_SCHEMA_YAML;
    use rstest::rstest;

    fn employment() -> Schema {
        Schema::from_yaml_str(EMPLOYMENT_SCHEMA_YAML).expect("fixture schema must load")
    }

    #[test]
    fn fixture_schema_resolves_every_reference() {
        let schema = employment();
        assert_eq!(schema.thing_types().expect("types").len(), 7);
        assert_eq!(
            schema
                .legal_role_player_types(&"employment".into(), &"employee".into())
                .expect("players"),
            BTreeSet::from([TypeLabel::from("person")])
        );
        assert!(schema.may_own(&"employment".into(), &"start-date".into()));
        assert!(!schema.may_own(&"company".into(), &"age".into()));
        assert_eq!(schema.value_type(&"age".into()), Some("long"));
        assert_eq!(
            schema.types_of_kind(TypeKind::Relation).expect("relations"),
            BTreeSet::from([TypeLabel::from("employment"), TypeLabel::from("friendship")])
        );
    }

    #[test]
    fn relates_lists_become_relation_roles() {
        let schema = employment();
        assert_eq!(
            schema.roles_of(&"employment".into()).expect("declared relation"),
            BTreeSet::from([RoleLabel::from("employee"), RoleLabel::from("employer")])
        );
        assert_eq!(
            schema.roles_of(&"friendship".into()).expect("declared relation"),
            BTreeSet::from([RoleLabel::from("friend")])
        );
        assert!(schema.relates(&"employment".into(), &"employer".into()));
        assert!(!schema.relates(&"friendship".into(), &"employer".into()));
    }

    #[rstest]
    #[case::missing_colon("entities: { p: { plays: [friend] } }", "malformed")]
    #[case::empty_role("entities: { p: { plays: [\"f:\"] } }\nrelations: { f: { relates: [x] } }", "malformed")]
    #[case::unknown_relation("entities: { p: { plays: [\"f:x\"] } }", "unknown type")]
    #[case::unknown_role("entities: { p: { plays: [\"f:y\"] } }\nrelations: { f: { relates: [x] } }", "unknown role")]
    #[case::owns_entity("entities: { p: { owns: [q] }, q: {} }", "kind")]
    #[case::empty_relation("relations: { f: {} }", "empty relation")]
    #[case::duplicate("entities: { a: {} }\nattributes: { a: {} }", "duplicate")]
    fn rejects_invalid_schemas(#[case] yaml: &str, #[case] expected: &str) {
        let err = Schema::from_yaml_str(yaml).expect_err("schema must be rejected");
        let matched = match &err {
            MemoryStoreError::MalformedPlays { .. } => expected == "malformed",
            MemoryStoreError::UnknownType { .. } => expected == "unknown type",
            MemoryStoreError::UnknownRole { .. } => expected == "unknown role",
            MemoryStoreError::KindMismatch { .. } => expected == "kind",
            MemoryStoreError::EmptyRelation { .. } => expected == "empty relation",
            MemoryStoreError::DuplicateType { .. } => expected == "duplicate",
            _ => false,
        };
        assert!(matched, "expected {expected}, got {err:?}");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = Schema::from_yaml_str("entities: { p: { owns: [], extends: thing } }")
            .expect_err("unknown key must fail");
        assert!(matches!(err, MemoryStoreError::Yaml(_)));
    }

    #[test]
    fn introspection_reports_unknown_labels() {
        let schema = employment();
        assert_eq!(
            schema.kind_of(&"robot".into()),
            Err(StoreError::UnknownType { label: "robot".into() })
        );
        assert!(matches!(
            schema.legal_role_player_types(&"employment".into(), &"friend".into()),
            Err(StoreError::UnknownRole { .. })
        ));
        assert!(schema.roles_of(&"person".into()).expect("entity").is_empty());
    }
}
