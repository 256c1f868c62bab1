//! Single-use mutable builder for one query.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    error::QueryGenError,
    ids::{ConceptId, RoleLabel, TypeLabel},
    schema::SchemaIntrospector,
};

use super::{
    Variable,
    pattern::{QueryPattern, RelationStatement},
};

/// Lifecycle position of a [`QueryBuilder`].
///
/// Completion is represented by [`QueryPattern`], produced by
/// [`QueryBuilder::finish`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuilderState {
    /// No variable has been allocated.
    Empty,
    /// Variables are being added.
    Growing,
}

/// Role-player slot of a planned relation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    /// Reuse a variable that is already typed.
    Existing(Variable),
    /// Allocate a new variable of the given type.
    Fresh(TypeLabel),
}

/// A fully planned growth step applied by [`QueryBuilder::apply`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Extension {
    /// Add a relation variable and bind its role players.
    Relation {
        /// Type of the new relation variable.
        relation_type: TypeLabel,
        /// Role-player bindings in statement order.
        players: Vec<(RoleLabel, Slot)>,
    },
    /// Add an attribute variable owned by `owner`.
    Attribute {
        /// Owning variable.
        owner: Variable,
        /// Type of the new attribute variable.
        attribute_type: TypeLabel,
    },
}

/// Incrementally grows one query.
///
/// Every allocated variable receives its type in the same step, so the type
/// map always holds exactly [`QueryBuilder::next_var`] entries. Extensions
/// are validated before anything is allocated: a rejected extension leaves the
/// builder untouched.
///
/// # Examples
/// ```
/// use kgbench_core::{Extension, QueryBuilder, Slot, Variable};
///
/// let mut builder = QueryBuilder::new();
/// let person = builder.add_variable("person");
/// builder.apply(Extension::Attribute { owner: person, attribute_type: "name".into() })?;
/// builder.apply(Extension::Relation {
///     relation_type: "employment".into(),
///     players: vec![
///         ("employee".into(), Slot::Existing(person)),
///         ("employer".into(), Slot::Fresh("company".into())),
///     ],
/// })?;
/// assert_eq!(builder.next_var(), 4);
/// let pattern = builder.finish()?;
/// assert_eq!(
///     pattern.to_string(),
///     "match $x0 isa person; $x1 isa name; \
///      $x2 (employee: $x0, employer: $x3) isa employment; $x3 isa company; \
///      $x0 has name $x1; get;"
/// );
/// # Ok::<(), kgbench_core::QueryGenError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct QueryBuilder {
    variable_type_map: BTreeMap<Variable, TypeLabel>,
    attribute_ownership: BTreeMap<Variable, BTreeSet<Variable>>,
    relations: BTreeMap<Variable, Vec<(RoleLabel, Variable)>>,
    pinned: BTreeMap<Variable, ConceptId>,
    next_var: usize,
}

impl QueryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> BuilderState {
        if self.next_var == 0 {
            BuilderState::Empty
        } else {
            BuilderState::Growing
        }
    }

    /// Returns the allocation counter.
    #[must_use]
    pub fn next_var(&self) -> usize {
        self.next_var
    }

    /// Returns the type of every allocated variable.
    #[must_use]
    pub fn variable_type_map(&self) -> &BTreeMap<Variable, TypeLabel> {
        &self.variable_type_map
    }

    /// Returns the attribute variables owned by each owner variable.
    #[must_use]
    pub fn attribute_ownership(&self) -> &BTreeMap<Variable, BTreeSet<Variable>> {
        &self.attribute_ownership
    }

    /// Returns the resolved type of `variable`.
    #[must_use]
    pub fn get_type(&self, variable: Variable) -> Option<&TypeLabel> {
        self.variable_type_map.get(&variable)
    }

    /// Returns the concept `variable` is pinned to, if any.
    #[must_use]
    pub fn pinned(&self, variable: Variable) -> Option<&ConceptId> {
        self.pinned.get(&variable)
    }

    /// Allocates a fresh variable of `type_label`.
    pub fn add_variable(&mut self, type_label: impl Into<TypeLabel>) -> Variable {
        let variable = Variable::new(self.next_var);
        self.variable_type_map.insert(variable, type_label.into());
        self.next_var += 1;
        variable
    }

    /// Restricts `variable` to one concrete instance.
    ///
    /// # Errors
    /// Returns [`QueryGenError::UnboundVariable`] if `variable` was never
    /// allocated.
    pub fn pin(&mut self, variable: Variable, id: ConceptId) -> Result<(), QueryGenError> {
        self.require(variable)?;
        self.pinned.insert(variable, id);
        Ok(())
    }

    /// Applies `extension` and returns the variables it allocated, in
    /// allocation order.
    ///
    /// # Errors
    /// Returns [`QueryGenError::UnboundVariable`] when the extension refers to
    /// a variable that does not exist. The builder is unchanged on error.
    pub fn apply(&mut self, extension: Extension) -> Result<Vec<Variable>, QueryGenError> {
        match extension {
            Extension::Attribute {
                owner,
                attribute_type,
            } => {
                self.require(owner)?;
                let attribute = self.add_variable(attribute_type);
                self.attribute_ownership
                    .entry(owner)
                    .or_default()
                    .insert(attribute);
                Ok(vec![attribute])
            }
            Extension::Relation {
                relation_type,
                players,
            } => {
                for (_, slot) in &players {
                    if let Slot::Existing(variable) = slot {
                        self.require(*variable)?;
                    }
                }
                let relation = self.add_variable(relation_type);
                let mut allocated = vec![relation];
                let mut bindings = Vec::with_capacity(players.len());
                for (role, slot) in players {
                    let player = match slot {
                        Slot::Existing(variable) => variable,
                        Slot::Fresh(type_label) => {
                            let variable = self.add_variable(type_label);
                            allocated.push(variable);
                            variable
                        }
                    };
                    bindings.push((role, player));
                }
                self.relations.insert(relation, bindings);
                Ok(allocated)
            }
        }
    }

    /// Checks that every owned attribute variable resolves to an attribute
    /// type in `schema`.
    ///
    /// # Errors
    /// Returns [`QueryGenError::SchemaViolation`] for the first offending
    /// variable and [`QueryGenError::Store`] when the schema lookup fails.
    pub fn verify_attribute_ownership<S: SchemaIntrospector + ?Sized>(
        &self,
        schema: &S,
    ) -> Result<(), QueryGenError> {
        for attribute in self.attribute_ownership.values().flatten() {
            let label = self.require(*attribute)?;
            if !schema.is_attribute_type(label)? {
                return Err(QueryGenError::schema_violation(
                    0,
                    format!("{attribute} is owned but has non-attribute type {label}"),
                ));
            }
        }
        Ok(())
    }

    /// Consumes the builder into an immutable pattern.
    ///
    /// # Errors
    /// Returns [`QueryGenError::EmptyQuery`] for an empty builder,
    /// [`QueryGenError::CounterMismatch`] when the counter disagrees with the
    /// type map and [`QueryGenError::UnboundVariable`] when a statement refers
    /// to an untyped variable.
    pub fn finish(self) -> Result<QueryPattern, QueryGenError> {
        if self.state() == BuilderState::Empty {
            return Err(QueryGenError::EmptyQuery);
        }
        if self.next_var != self.variable_type_map.len() {
            return Err(QueryGenError::CounterMismatch {
                next_var: self.next_var,
                mapped: self.variable_type_map.len(),
            });
        }
        let referenced = self
            .relations
            .iter()
            .flat_map(|(relation, players)| {
                std::iter::once(*relation).chain(players.iter().map(|(_, player)| *player))
            })
            .chain(
                self.attribute_ownership
                    .iter()
                    .flat_map(|(owner, owned)| std::iter::once(*owner).chain(owned.iter().copied())),
            )
            .chain(self.pinned.keys().copied());
        for variable in referenced {
            self.require(variable)?;
        }
        let relations = self
            .relations
            .into_iter()
            .map(|(variable, players)| RelationStatement { variable, players })
            .collect();
        Ok(QueryPattern::new(
            self.variable_type_map,
            relations,
            self.attribute_ownership,
            self.pinned,
        ))
    }

    fn require(&self, variable: Variable) -> Result<&TypeLabel, QueryGenError> {
        self.variable_type_map
            .get(&variable)
            .ok_or(QueryGenError::UnboundVariable { variable })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use rstest::{fixture, rstest};

    use crate::test_utils::suite_proptest_config;

    #[fixture]
    fn person_builder() -> (QueryBuilder, Variable) {
        let mut builder = QueryBuilder::new();
        let person = builder.add_variable("person");
        (builder, person)
    }

    #[test]
    fn new_builder_is_empty() {
        let builder = QueryBuilder::new();
        assert_eq!(builder.state(), BuilderState::Empty);
        assert_eq!(builder.finish().err(), Some(QueryGenError::EmptyQuery));
    }

    #[rstest]
    fn attribute_extension_records_ownership(person_builder: (QueryBuilder, Variable)) {
        let (mut builder, person) = person_builder;
        let allocated = builder
            .apply(Extension::Attribute {
                owner: person,
                attribute_type: TypeLabel::from("name"),
            })
            .expect("owner exists");
        assert_eq!(allocated, vec![Variable::new(1)]);
        assert_eq!(builder.state(), BuilderState::Growing);
        assert_eq!(
            builder.attribute_ownership().get(&person),
            Some(&BTreeSet::from([Variable::new(1)]))
        );
        assert_eq!(builder.get_type(Variable::new(1)), Some(&TypeLabel::from("name")));
    }

    #[rstest]
    fn rejected_relation_leaves_builder_untouched(person_builder: (QueryBuilder, Variable)) {
        let (mut builder, person) = person_builder;
        let err = builder
            .apply(Extension::Relation {
                relation_type: TypeLabel::from("employment"),
                players: vec![
                    (RoleLabel::from("employee"), Slot::Existing(person)),
                    (RoleLabel::from("employer"), Slot::Existing(Variable::new(7))),
                ],
            })
            .expect_err("unknown variable must be rejected");
        assert_eq!(
            err,
            QueryGenError::UnboundVariable {
                variable: Variable::new(7)
            }
        );
        assert_eq!(builder.next_var(), 1);
        assert_eq!(builder.variable_type_map().len(), 1);
    }

    #[rstest]
    fn relation_allocates_relation_then_fresh_players(person_builder: (QueryBuilder, Variable)) {
        let (mut builder, person) = person_builder;
        let allocated = builder
            .apply(Extension::Relation {
                relation_type: TypeLabel::from("friendship"),
                players: vec![
                    (RoleLabel::from("friend"), Slot::Existing(person)),
                    (RoleLabel::from("friend"), Slot::Fresh(TypeLabel::from("person"))),
                ],
            })
            .expect("players are valid");
        assert_eq!(allocated, vec![Variable::new(1), Variable::new(2)]);
        assert_eq!(builder.next_var(), builder.variable_type_map().len());
    }

    #[rstest]
    fn pin_requires_an_allocated_variable(person_builder: (QueryBuilder, Variable)) {
        let (mut builder, person) = person_builder;
        builder
            .pin(person, ConceptId::from("p1"))
            .expect("person is allocated");
        assert_eq!(builder.pinned(person), Some(&ConceptId::from("p1")));
        assert!(builder.pin(Variable::new(4), ConceptId::from("p2")).is_err());
    }

    #[rstest]
    fn finish_renders_pinned_ids(person_builder: (QueryBuilder, Variable)) {
        let (mut builder, person) = person_builder;
        builder
            .pin(person, ConceptId::from("p1"))
            .expect("person is allocated");
        let pattern = builder.finish().expect("builder is consistent");
        assert_eq!(pattern.to_string(), "match $x0 isa person; $x0 id p1; get;");
    }

    /// Step description whose variable indices may point past the allocated
    /// range, so some steps are rejected.
    #[derive(Clone, Debug)]
    enum Step {
        Attribute(usize),
        Relation(Vec<Option<usize>>),
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            (0_usize..12).prop_map(Step::Attribute),
            prop::collection::vec(prop::option::of(0_usize..12), 0..4).prop_map(Step::Relation),
        ]
    }

    fn extension(step: Step) -> Extension {
        match step {
            Step::Attribute(owner) => Extension::Attribute {
                owner: Variable::new(owner),
                attribute_type: TypeLabel::from("name"),
            },
            Step::Relation(slots) => Extension::Relation {
                relation_type: TypeLabel::from("link"),
                players: slots
                    .into_iter()
                    .map(|slot| {
                        let slot = slot.map_or_else(
                            || Slot::Fresh(TypeLabel::from("person")),
                            |index| Slot::Existing(Variable::new(index)),
                        );
                        (RoleLabel::from("end"), slot)
                    })
                    .collect(),
            },
        }
    }

    fn references_unallocated(step: &Step, next_var: usize) -> bool {
        match step {
            Step::Attribute(owner) => *owner >= next_var,
            Step::Relation(slots) => slots.iter().flatten().any(|index| *index >= next_var),
        }
    }

    proptest! {
        #![proptest_config(suite_proptest_config(64))]

        #[test]
        fn counter_tracks_type_map_across_extensions(
            steps in prop::collection::vec(step(), 0..24),
        ) {
            let mut builder = QueryBuilder::new();
            builder.add_variable("person");
            for step in steps {
                let before = builder.clone();
                let rejected = references_unallocated(&step, builder.next_var());
                match builder.apply(extension(step)) {
                    Ok(allocated) => {
                        prop_assert!(!rejected);
                        prop_assert_eq!(builder.next_var(), before.next_var() + allocated.len());
                        prop_assert!(allocated.iter().all(|variable| builder.get_type(*variable).is_some()));
                    }
                    Err(error) => {
                        prop_assert!(rejected);
                        let is_unbound_variable = matches!(error, QueryGenError::UnboundVariable { .. });
                        prop_assert!(is_unbound_variable);
                        prop_assert_eq!(builder.variable_type_map(), before.variable_type_map());
                        prop_assert_eq!(builder.attribute_ownership(), before.attribute_ownership());
                        prop_assert_eq!(builder.clone().finish(), before.finish());
                    }
                }
                prop_assert_eq!(builder.next_var(), builder.variable_type_map().len());
            }
            prop_assert!(builder.finish().is_ok());
        }
    }
}
