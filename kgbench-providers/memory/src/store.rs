//! Validated in-memory knowledge graph.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::Path,
};

use kgbench_core::{
    Concept, ConceptId, ConceptStore, EdgePair, GraphProperties, IdStore, RoleLabel,
    SchemaIntrospector, StoreResult, TypeKind, TypeLabel, VertexId,
};
use kgbench_providers_edgelist::EdgeListGraph;
use tracing::{info, instrument};

use crate::{
    data::DataDocument,
    errors::MemoryStoreError,
    schema::{Schema, SchemaDocument},
};

/// Typed knowledge graph held entirely in memory.
///
/// Instances of each type are kept in insertion order, which fixes the
/// ordinal offsets served through [`ConceptStore`]. The graph statistics view
/// treats entity instances as vertices and each relation instance as one edge
/// through the entity occurrences among its role players. Role players may
/// repeat, so loops count towards the maximum allowed degree.
///
/// # Examples
/// ```
/// use kgbench_core::{ConceptStore, GraphProperties, TypeLabel};
/// use kgbench_providers_memory::KnowledgeGraph;
///
/// let schema = "entities: { person: { plays: [\"friendship:friend\"] } }\n\
///               relations: { friendship: { relates: [friend] } }\n";
/// let data = "things: [{ id: a, type: person }, { id: b, type: person }]\n\
///             relations:\n  - { id: f, type: friendship, players: [{ role: friend, player: a }, { role: friend, player: b }] }\n";
/// let graph = KnowledgeGraph::from_yaml_str("friends", schema, Some(data))?;
/// assert_eq!(graph.instance_count(&TypeLabel::from("person"))?, 2);
/// assert_eq!(graph.degree_sequence(2)?, vec![1, 1]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct KnowledgeGraph {
    schema: Schema,
    types: BTreeMap<ConceptId, TypeLabel>,
    instances: BTreeMap<TypeLabel, Vec<ConceptId>>,
    values: BTreeMap<ConceptId, serde_yaml::Value>,
    role_players: BTreeMap<(TypeLabel, RoleLabel), BTreeSet<ConceptId>>,
    ownerships: BTreeSet<(ConceptId, ConceptId)>,
    graph: EdgeListGraph,
}

impl KnowledgeGraph {
    /// Creates an empty knowledge graph over `schema`.
    #[must_use]
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            schema,
            types: BTreeMap::new(),
            instances: BTreeMap::new(),
            values: BTreeMap::new(),
            role_players: BTreeMap::new(),
            ownerships: BTreeSet::new(),
            graph: EdgeListGraph::new(name).with_loop_edges(true),
        }
    }

    /// Parses a schema and optional data document from YAML strings.
    ///
    /// # Errors
    /// Returns [`MemoryStoreError::Yaml`] for malformed documents and any
    /// schema or insertion validation error.
    pub fn from_yaml_str(
        name: impl Into<String>,
        schema: &str,
        data: Option<&str>,
    ) -> Result<Self, MemoryStoreError> {
        let schema: SchemaDocument = serde_yaml::from_str(schema)?;
        let data: DataDocument = match data {
            Some(data) => serde_yaml::from_str(data)?,
            None => DataDocument::default(),
        };
        Self::from_documents(name, schema, data)
    }

    /// Loads a schema and optional data document from disk.
    ///
    /// # Errors
    /// Returns [`MemoryStoreError::Io`] when a file cannot be read, plus the
    /// errors of [`KnowledgeGraph::from_yaml_str`].
    #[instrument(name = "memory.load", err, skip(name, schema_path, data_path), fields(schema = %schema_path.as_ref().display()))]
    pub fn from_paths(
        name: impl Into<String>,
        schema_path: impl AsRef<Path>,
        data_path: Option<&Path>,
    ) -> Result<Self, MemoryStoreError> {
        let schema = fs::read_to_string(schema_path.as_ref())?;
        let data = data_path.map(fs::read_to_string).transpose()?;
        let graph = Self::from_yaml_str(name, &schema, data.as_deref())?;
        info!(
            graph = %graph.graph.name(),
            concepts = graph.types.len(),
            vertices = graph.graph.vertices().len(),
            edges = graph.graph.edges().len(),
            "knowledge graph loaded"
        );
        Ok(graph)
    }

    /// Validates `schema` and inserts every record of `data` in order.
    ///
    /// # Errors
    /// As [`Schema::from_document`], [`KnowledgeGraph::insert_thing`],
    /// [`KnowledgeGraph::insert_relation`] and
    /// [`KnowledgeGraph::insert_ownership`].
    pub fn from_documents(
        name: impl Into<String>,
        schema: SchemaDocument,
        data: DataDocument,
    ) -> Result<Self, MemoryStoreError> {
        let mut graph = Self::new(name, Schema::from_document(schema)?);
        for thing in data.things {
            graph.insert_thing(thing.id.into(), thing.type_label.into(), thing.value)?;
        }
        for relation in data.relations {
            let players = relation
                .players
                .into_iter()
                .map(|player| (RoleLabel::from(player.role), ConceptId::from(player.player)))
                .collect();
            graph.insert_relation(relation.id.into(), relation.type_label.into(), players)?;
        }
        for ownership in data.ownerships {
            graph.insert_ownership(&ownership.owner.into(), &ownership.attribute.into())?;
        }
        Ok(graph)
    }

    /// Inserts an entity or attribute instance.
    ///
    /// # Errors
    /// Returns [`MemoryStoreError::UnknownType`] for undeclared types,
    /// [`MemoryStoreError::KindMismatch`] for relation types and
    /// [`MemoryStoreError::DuplicateConcept`] when `id` is taken.
    pub fn insert_thing(
        &mut self,
        id: ConceptId,
        type_label: TypeLabel,
        value: Option<serde_yaml::Value>,
    ) -> Result<(), MemoryStoreError> {
        let kind = self.schema.kind(&type_label)?;
        if kind == TypeKind::Relation {
            return Err(MemoryStoreError::KindMismatch {
                label: type_label,
                expected: TypeKind::Entity,
                found: kind,
            });
        }
        self.register(id.clone(), type_label)?;
        if let Some(value) = value {
            self.values.insert(id.clone(), value);
        }
        if kind == TypeKind::Entity {
            self.graph.add_vertex(VertexId::new(id));
        }
        Ok(())
    }

    /// Inserts a relation instance with its role players.
    ///
    /// # Errors
    /// Returns [`MemoryStoreError::NoRolePlayers`] for an empty player list,
    /// [`MemoryStoreError::UnknownConcept`] for players not yet inserted,
    /// [`MemoryStoreError::UnknownRole`] for roles the relation does not
    /// declare and [`MemoryStoreError::IllegalPlayer`] when the player's type
    /// may not take the role.
    pub fn insert_relation(
        &mut self,
        id: ConceptId,
        type_label: TypeLabel,
        players: Vec<(RoleLabel, ConceptId)>,
    ) -> Result<(), MemoryStoreError> {
        self.schema.expect_kind(&type_label, TypeKind::Relation)?;
        if players.is_empty() {
            return Err(MemoryStoreError::NoRolePlayers { id });
        }
        let mut endpoints = Vec::new();
        for (role, player) in &players {
            let player_type = self.type_of_concept(player)?;
            if !self.schema.relates(&type_label, role) {
                return Err(MemoryStoreError::UnknownRole {
                    relation: type_label,
                    role: role.clone(),
                });
            }
            if !self.schema.may_play(player_type, &type_label, role) {
                return Err(MemoryStoreError::IllegalPlayer {
                    player: player.clone(),
                    type_label: player_type.clone(),
                    relation: type_label,
                    role: role.clone(),
                });
            }
            if self.schema.kind(player_type)? == TypeKind::Entity {
                endpoints.push(VertexId::new(player));
            }
        }
        self.register(id, type_label.clone())?;
        for (role, player) in players {
            self.role_players
                .entry((type_label.clone(), role))
                .or_default()
                .insert(player);
        }
        if !endpoints.is_empty() {
            self.graph.add_edge(endpoints);
        }
        Ok(())
    }

    /// Records that `owner` owns the attribute instance `attribute`.
    ///
    /// # Errors
    /// Returns [`MemoryStoreError::UnknownConcept`] for missing instances,
    /// [`MemoryStoreError::KindMismatch`] when `attribute` is not an attribute
    /// and [`MemoryStoreError::IllegalOwnership`] when the owner's type may not
    /// own the attribute's type.
    pub fn insert_ownership(&mut self, owner: &ConceptId, attribute: &ConceptId) -> Result<(), MemoryStoreError> {
        let owner_type = self.type_of_concept(owner)?;
        let attribute_type = self.type_of_concept(attribute)?;
        self.schema.expect_kind(attribute_type, TypeKind::Attribute)?;
        if !self.schema.may_own(owner_type, attribute_type) {
            return Err(MemoryStoreError::IllegalOwnership {
                owner: owner.clone(),
                owner_type: owner_type.clone(),
                attribute: attribute.clone(),
                attribute_type: attribute_type.clone(),
            });
        }
        self.ownerships.insert((owner.clone(), attribute.clone()));
        Ok(())
    }

    /// Returns the validated schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the entity projection used for graph statistics.
    #[must_use]
    pub fn entity_graph(&self) -> &EdgeListGraph {
        &self.graph
    }

    /// Returns the number of stored concepts of every kind.
    #[must_use]
    pub fn concept_count(&self) -> usize {
        self.types.len()
    }

    /// Returns the type of a stored concept.
    #[must_use]
    pub fn type_of(&self, id: &ConceptId) -> Option<&TypeLabel> {
        self.types.get(id)
    }

    /// Returns the value recorded for an attribute instance.
    #[must_use]
    pub fn value_of(&self, id: &ConceptId) -> Option<&serde_yaml::Value> {
        self.values.get(id)
    }

    /// Returns whether `owner` owns `attribute`.
    #[must_use]
    pub fn owns(&self, owner: &ConceptId, attribute: &ConceptId) -> bool {
        self.ownerships.contains(&(owner.clone(), attribute.clone()))
    }

    fn type_of_concept(&self, id: &ConceptId) -> Result<&TypeLabel, MemoryStoreError> {
        self.types
            .get(id)
            .ok_or_else(|| MemoryStoreError::UnknownConcept { id: id.clone() })
    }

    fn register(&mut self, id: ConceptId, type_label: TypeLabel) -> Result<(), MemoryStoreError> {
        if self.types.contains_key(&id) {
            return Err(MemoryStoreError::DuplicateConcept { id });
        }
        self.instances.entry(type_label.clone()).or_default().push(id.clone());
        self.types.insert(id, type_label);
        Ok(())
    }

    fn declared(&self, type_label: &TypeLabel) -> StoreResult<()> {
        self.schema.kind_of(type_label).map(|_| ())
    }
}

impl ConceptStore for KnowledgeGraph {
    fn instance_count(&self, type_label: &TypeLabel) -> StoreResult<usize> {
        self.declared(type_label)?;
        Ok(self.instances.get(type_label).map_or(0, Vec::len))
    }

    fn instance_at(&self, type_label: &TypeLabel, offset: usize) -> StoreResult<Option<Concept>> {
        self.declared(type_label)?;
        Ok(self
            .instances
            .get(type_label)
            .and_then(|ids| ids.get(offset))
            .map(|id| Concept::new(id.clone(), type_label.clone())))
    }
}

impl IdStore for KnowledgeGraph {
    fn ids_not_playing_role(
        &self,
        type_label: &TypeLabel,
        relation: &TypeLabel,
        role: &RoleLabel,
    ) -> StoreResult<Vec<ConceptId>> {
        self.declared(type_label)?;
        self.schema.legal_role_player_types(relation, role)?;
        let taken = self.role_players.get(&(relation.clone(), role.clone()));
        Ok(self
            .instances
            .get(type_label)
            .into_iter()
            .flatten()
            .filter(|id| taken.is_none_or(|players| !players.contains(*id)))
            .cloned()
            .collect())
    }
}

impl SchemaIntrospector for KnowledgeGraph {
    fn thing_types(&self) -> StoreResult<BTreeSet<TypeLabel>> {
        self.schema.thing_types()
    }

    fn kind_of(&self, type_label: &TypeLabel) -> StoreResult<TypeKind> {
        self.schema.kind_of(type_label)
    }

    fn roles_of(&self, relation: &TypeLabel) -> StoreResult<BTreeSet<RoleLabel>> {
        self.schema.roles_of(relation)
    }

    fn roles_played_by(&self, type_label: &TypeLabel) -> StoreResult<BTreeSet<(TypeLabel, RoleLabel)>> {
        self.schema.roles_played_by(type_label)
    }

    fn legal_role_player_types(
        &self,
        relation: &TypeLabel,
        role: &RoleLabel,
    ) -> StoreResult<BTreeSet<TypeLabel>> {
        self.schema.legal_role_player_types(relation, role)
    }

    fn legal_attribute_types(&self, owner: &TypeLabel) -> StoreResult<BTreeSet<TypeLabel>> {
        self.schema.legal_attribute_types(owner)
    }
}

impl GraphProperties for KnowledgeGraph {
    fn name(&self) -> &str {
        self.graph.name()
    }

    fn vertex_count(&self) -> StoreResult<u64> {
        self.graph.vertex_count()
    }

    fn degree_sequence(&self, arity: u32) -> StoreResult<Vec<u64>> {
        self.graph.degree_sequence(arity)
    }

    fn max_allowed_degree(&self, arity: u32) -> StoreResult<u64> {
        self.graph.max_allowed_degree(arity)
    }

    fn neighbors(&self, vertex: &VertexId) -> StoreResult<BTreeSet<VertexId>> {
        self.graph.neighbors(vertex)
    }

    fn connected_edge_pairs(&self, filter_degenerate: bool) -> StoreResult<Vec<EdgePair>> {
        self.graph.connected_edge_pairs(filter_degenerate)
    }

    fn connected_vertex_degrees(&self) -> StoreResult<Vec<(u64, u64)>> {
        self.graph.connected_vertex_degrees()
    }
}
