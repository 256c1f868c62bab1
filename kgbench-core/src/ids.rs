//! String-backed identifiers shared by every capability interface.
//!
//! Stores address vertices, concepts, types and roles by label. The newtypes
//! keep those namespaces apart so a role label can never be passed where a
//! type label is expected.

use std::{fmt, sync::Arc};

macro_rules! define_label {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(Arc<str>);

        impl $name {
            /// Creates an identifier from any string-like value.
            #[must_use]
            pub fn new(value: impl AsRef<str>) -> Self {
                Self(Arc::from(value.as_ref()))
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(Arc::from(value))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_label! {
    /// Identifier of a vertex exposed through [`crate::GraphProperties`].
    ///
    /// # Examples
    /// ```
    /// use kgbench_core::VertexId;
    ///
    /// let id = VertexId::from("v1");
    /// assert_eq!(id.as_str(), "v1");
    /// assert_eq!(id.to_string(), "v1");
    /// ```
    VertexId
}

define_label! {
    /// Identifier of a stored concept (entity, relation or attribute instance).
    ConceptId
}

define_label! {
    /// Label of a schema type.
    TypeLabel
}

define_label! {
    /// Label of a role declared by a relation type.
    RoleLabel
}

/// A concept returned by a single-result page lookup.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Concept {
    /// Identifier of the instance.
    pub id: ConceptId,
    /// Label of the type the instance belongs to.
    pub type_label: TypeLabel,
}

impl Concept {
    /// Creates a concept from its id and type label.
    #[must_use]
    pub fn new(id: impl Into<ConceptId>, type_label: impl Into<TypeLabel>) -> Self {
        Self {
            id: id.into(),
            type_label: type_label.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_order_lexicographically() {
        let mut labels = vec![TypeLabel::from("person"), TypeLabel::from("company")];
        labels.sort();
        assert_eq!(labels, vec![TypeLabel::from("company"), TypeLabel::from("person")]);
    }

    #[test]
    fn owned_and_borrowed_conversions_agree() {
        assert_eq!(RoleLabel::from("employee".to_owned()), RoleLabel::from("employee"));
    }
}
