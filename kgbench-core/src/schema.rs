//! Schema introspection consumed by query synthesis.

use std::{collections::BTreeSet, fmt};

use crate::{
    error::StoreResult,
    ids::{RoleLabel, TypeLabel},
};

/// Kind of a schema thing type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeKind {
    /// Independent thing that can own attributes and play roles.
    Entity,
    /// Thing that relates role players.
    Relation,
    /// Typed value owned by other things.
    Attribute,
}

impl TypeKind {
    /// Returns the lowercase keyword for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::Relation => "relation",
            Self::Attribute => "attribute",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view over a typed schema.
///
/// Sets are returned ordered so that seeded generation is reproducible across
/// runs and implementations.
pub trait SchemaIntrospector {
    /// Returns every concrete thing type declared by the schema.
    fn thing_types(&self) -> StoreResult<BTreeSet<TypeLabel>>;

    /// Returns the kind of `type_label`.
    ///
    /// # Errors
    /// Returns [`crate::StoreError::UnknownType`] for undeclared labels.
    fn kind_of(&self, type_label: &TypeLabel) -> StoreResult<TypeKind>;

    /// Returns the roles declared by `relation`.
    fn roles_of(&self, relation: &TypeLabel) -> StoreResult<BTreeSet<RoleLabel>>;

    /// Returns `(relation, role)` pairs that instances of `type_label` may take.
    fn roles_played_by(&self, type_label: &TypeLabel) -> StoreResult<BTreeSet<(TypeLabel, RoleLabel)>>;

    /// Returns the types allowed to play `role` in `relation`.
    fn legal_role_player_types(
        &self,
        relation: &TypeLabel,
        role: &RoleLabel,
    ) -> StoreResult<BTreeSet<TypeLabel>>;

    /// Returns the attribute types `owner` may own.
    fn legal_attribute_types(&self, owner: &TypeLabel) -> StoreResult<BTreeSet<TypeLabel>>;

    /// Returns whether `type_label` is an attribute type.
    fn is_attribute_type(&self, type_label: &TypeLabel) -> StoreResult<bool> {
        Ok(self.kind_of(type_label)? == TypeKind::Attribute)
    }

    /// Returns the declared types of `kind`.
    fn types_of_kind(&self, kind: TypeKind) -> StoreResult<BTreeSet<TypeLabel>> {
        let mut matching = BTreeSet::new();
        for label in self.thing_types()? {
            if self.kind_of(&label)? == kind {
                matching.insert(label);
            }
        }
        Ok(matching)
    }
}

impl<S: SchemaIntrospector + ?Sized> SchemaIntrospector for &S {
    fn thing_types(&self) -> StoreResult<BTreeSet<TypeLabel>> {
        (**self).thing_types()
    }

    fn kind_of(&self, type_label: &TypeLabel) -> StoreResult<TypeKind> {
        (**self).kind_of(type_label)
    }

    fn roles_of(&self, relation: &TypeLabel) -> StoreResult<BTreeSet<RoleLabel>> {
        (**self).roles_of(relation)
    }

    fn roles_played_by(&self, type_label: &TypeLabel) -> StoreResult<BTreeSet<(TypeLabel, RoleLabel)>> {
        (**self).roles_played_by(type_label)
    }

    fn legal_role_player_types(
        &self,
        relation: &TypeLabel,
        role: &RoleLabel,
    ) -> StoreResult<BTreeSet<TypeLabel>> {
        (**self).legal_role_player_types(relation, role)
    }

    fn legal_attribute_types(&self, owner: &TypeLabel) -> StoreResult<BTreeSet<TypeLabel>> {
        (**self).legal_attribute_types(owner)
    }

    fn is_attribute_type(&self, type_label: &TypeLabel) -> StoreResult<bool> {
        (**self).is_attribute_type(type_label)
    }

    fn types_of_kind(&self, kind: TypeKind) -> StoreResult<BTreeSet<TypeLabel>> {
        (**self).types_of_kind(kind)
    }
}
