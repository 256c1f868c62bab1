//! Immutable query patterns produced by a finished builder.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use crate::ids::{ConceptId, RoleLabel, TypeLabel};

use super::Variable;

/// A relation variable together with its role-player bindings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationStatement {
    /// The relation variable.
    pub variable: Variable,
    /// Role-player bindings in statement order.
    pub players: Vec<(RoleLabel, Variable)>,
}

/// Read query pattern in which every variable has exactly one type.
///
/// Renders as a `match ... get;` query, one statement per variable followed by
/// ownership and instance constraints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryPattern {
    variables: BTreeMap<Variable, TypeLabel>,
    relations: BTreeMap<Variable, RelationStatement>,
    ownership: BTreeMap<Variable, BTreeSet<Variable>>,
    pinned: BTreeMap<Variable, ConceptId>,
}

impl QueryPattern {
    pub(super) fn new(
        variables: BTreeMap<Variable, TypeLabel>,
        relations: Vec<RelationStatement>,
        ownership: BTreeMap<Variable, BTreeSet<Variable>>,
        pinned: BTreeMap<Variable, ConceptId>,
    ) -> Self {
        let relations = relations
            .into_iter()
            .map(|statement| (statement.variable, statement))
            .collect();
        Self {
            variables,
            relations,
            ownership,
            pinned,
        }
    }

    /// Returns the number of variables in the pattern.
    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Returns each variable with its type.
    pub fn variables(&self) -> impl Iterator<Item = (Variable, &TypeLabel)> + '_ {
        self.variables.iter().map(|(variable, label)| (*variable, label))
    }

    /// Returns the type of `variable`.
    #[must_use]
    pub fn type_of(&self, variable: Variable) -> Option<&TypeLabel> {
        self.variables.get(&variable)
    }

    /// Returns the relation statements in variable order.
    pub fn relations(&self) -> impl Iterator<Item = &RelationStatement> + '_ {
        self.relations.values()
    }

    /// Returns the attribute variables owned by each owner.
    #[must_use]
    pub fn attribute_ownership(&self) -> &BTreeMap<Variable, BTreeSet<Variable>> {
        &self.ownership
    }

    /// Returns the instance each pinned variable is restricted to.
    #[must_use]
    pub fn pinned(&self) -> &BTreeMap<Variable, ConceptId> {
        &self.pinned
    }
}

impl fmt::Display for QueryPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("match")?;
        for (variable, label) in &self.variables {
            write!(f, " {variable}")?;
            if let Some(statement) = self
                .relations
                .get(variable)
                .filter(|statement| !statement.players.is_empty())
            {
                f.write_str(" (")?;
                for (index, (role, player)) in statement.players.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{role}: {player}")?;
                }
                f.write_str(")")?;
            }
            write!(f, " isa {label};")?;
        }
        for (owner, owned) in &self.ownership {
            for attribute in owned {
                let label = self
                    .variables
                    .get(attribute)
                    .map_or("attribute", TypeLabel::as_str);
                write!(f, " {owner} has {label} {attribute};")?;
            }
        }
        for (variable, id) in &self.pinned {
            write!(f, " {variable} id {id};")?;
        }
        f.write_str(" get;")
    }
}
