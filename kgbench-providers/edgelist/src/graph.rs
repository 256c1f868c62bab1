//! In-memory hypergraph held as a list of endpoint slots per edge.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use kgbench_core::{EdgePair, GraphProperties, StoreError, StoreResult, VertexId, max_allowed_degree};
use tracing::{info, instrument};

use crate::{errors::EdgeListError, parse};

/// Hypergraph whose edges are ordered endpoint lists.
///
/// An edge's arity is its number of endpoints. A vertex listed twice in one
/// edge is a loop and gains one degree per listing. Loops are considered
/// possible when the loaded edges contain one, unless overridden with
/// [`EdgeListGraph::with_loop_edges`].
///
/// # Examples
/// ```
/// use kgbench_core::{GraphProperties, VertexId};
/// use kgbench_providers_edgelist::EdgeListGraph;
///
/// let graph = EdgeListGraph::new("triangle")
///     .with_edge(["a", "b"])
///     .with_edge(["b", "c"])
///     .with_edge(["c", "a"])
///     .with_vertex("d");
/// assert_eq!(graph.vertex_count()?, 4);
/// assert_eq!(graph.degree_sequence(2)?, vec![2, 2, 2]);
/// assert_eq!(graph.max_allowed_degree(2)?, 3);
/// assert_eq!(graph.neighbors(&VertexId::from("a"))?.len(), 2);
/// # Ok::<(), kgbench_core::StoreError>(())
/// ```
#[derive(Clone, Debug)]
pub struct EdgeListGraph {
    name: String,
    vertices: BTreeSet<VertexId>,
    edges: Vec<Vec<VertexId>>,
    loop_override: Option<bool>,
}

impl EdgeListGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertices: BTreeSet::new(),
            edges: Vec::new(),
            loop_override: None,
        }
    }

    /// Adds an edge through the given endpoints, registering new vertices.
    #[must_use]
    pub fn with_edge<I, V>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<VertexId>,
    {
        self.push_edge(endpoints.into_iter().map(Into::into).collect());
        self
    }

    /// Adds a vertex, which stays isolated unless an edge touches it.
    #[must_use]
    pub fn with_vertex(mut self, vertex: impl Into<VertexId>) -> Self {
        self.vertices.insert(vertex.into());
        self
    }

    /// Overrides whether loops count towards the maximum allowed degree.
    #[must_use]
    pub fn with_loop_edges(mut self, allowed: bool) -> Self {
        self.loop_override = Some(allowed);
        self
    }

    /// Adds an edge in place.
    pub fn add_edge(&mut self, endpoints: Vec<VertexId>) {
        self.push_edge(endpoints);
    }

    /// Adds a vertex in place.
    pub fn add_vertex(&mut self, vertex: VertexId) {
        self.vertices.insert(vertex);
    }

    /// Loads edges from `reader`, one per line.
    ///
    /// # Errors
    /// Returns [`EdgeListError::InvalidDelimiter`] for whitespace or `#`,
    /// [`EdgeListError::EmptyEndpoint`] for blank endpoints and
    /// [`EdgeListError::Io`] when reading fails.
    #[instrument(name = "edgelist.load", err, skip(name, reader))]
    pub fn try_from_reader<R: BufRead>(
        name: impl Into<String>,
        reader: R,
        delimiter: char,
    ) -> Result<Self, EdgeListError> {
        let mut graph = Self::new(name);
        for edge in parse::read_edges(reader, delimiter)? {
            graph.push_edge(edge);
        }
        info!(
            graph = %graph.name,
            vertices = graph.vertices.len(),
            edges = graph.edges.len(),
            loops = graph.allows_loops(),
            "edge list loaded"
        );
        Ok(graph)
    }

    /// Loads edges from the file at `path`.
    ///
    /// # Errors
    /// As [`EdgeListGraph::try_from_reader`], plus [`EdgeListError::Io`] when
    /// the file cannot be opened.
    pub fn try_from_path(
        name: impl Into<String>,
        path: impl AsRef<Path>,
        delimiter: char,
    ) -> Result<Self, EdgeListError> {
        let file = File::open(path)?;
        Self::try_from_reader(name, BufReader::new(file), delimiter)
    }

    /// Returns the loaded edges in input order.
    #[must_use]
    pub fn edges(&self) -> &[Vec<VertexId>] {
        &self.edges
    }

    /// Returns every vertex, including isolated ones.
    #[must_use]
    pub fn vertices(&self) -> &BTreeSet<VertexId> {
        &self.vertices
    }

    /// Returns whether loops count towards the maximum allowed degree.
    #[must_use]
    pub fn allows_loops(&self) -> bool {
        self.loop_override
            .unwrap_or_else(|| self.edges.iter().any(|edge| is_loop(edge)))
    }

    fn push_edge(&mut self, endpoints: Vec<VertexId>) {
        self.vertices.extend(endpoints.iter().cloned());
        self.edges.push(endpoints);
    }

    fn degrees(&self, arity: usize) -> BTreeMap<&VertexId, u64> {
        let mut degrees = BTreeMap::new();
        for edge in self.edges.iter().filter(|edge| edge.len() == arity) {
            for endpoint in edge {
                *degrees.entry(endpoint).or_insert(0) += 1;
            }
        }
        degrees
    }
}

fn is_loop(edge: &[VertexId]) -> bool {
    edge.iter().collect::<BTreeSet<_>>().len() < edge.len()
}

impl GraphProperties for EdgeListGraph {
    fn name(&self) -> &str {
        &self.name
    }

    fn vertex_count(&self) -> StoreResult<u64> {
        Ok(self.vertices.len() as u64)
    }

    fn degree_sequence(&self, arity: u32) -> StoreResult<Vec<u64>> {
        let Ok(arity) = usize::try_from(arity) else {
            return Ok(Vec::new());
        };
        Ok(self.degrees(arity).into_values().collect())
    }

    fn max_allowed_degree(&self, arity: u32) -> StoreResult<u64> {
        let vertices = self.vertices.len() as u64;
        max_allowed_degree(vertices, arity, self.allows_loops()).ok_or_else(|| StoreError::Backend {
            message: format!("maximum degree for {vertices} vertices and arity {arity} overflows")
                .into(),
        })
    }

    fn neighbors(&self, vertex: &VertexId) -> StoreResult<BTreeSet<VertexId>> {
        if !self.vertices.contains(vertex) {
            return Err(StoreError::UnknownVertex {
                vertex: vertex.clone(),
            });
        }
        let mut neighbors = BTreeSet::new();
        for edge in &self.edges {
            let occurrences = edge.iter().filter(|endpoint| *endpoint == vertex).count();
            if occurrences == 0 {
                continue;
            }
            neighbors.extend(edge.iter().filter(|endpoint| *endpoint != vertex).cloned());
            if occurrences > 1 {
                neighbors.insert(vertex.clone());
            }
        }
        Ok(neighbors)
    }

    fn connected_edge_pairs(&self, filter_degenerate: bool) -> StoreResult<Vec<EdgePair>> {
        let endpoint_sets: Vec<BTreeSet<VertexId>> = self
            .edges
            .iter()
            .map(|edge| edge.iter().cloned().collect())
            .collect();
        let mut incident: BTreeMap<&VertexId, Vec<usize>> = BTreeMap::new();
        for (index, endpoints) in endpoint_sets.iter().enumerate() {
            for vertex in endpoints {
                incident.entry(vertex).or_default().push(index);
            }
        }
        let mut pairs = BTreeSet::new();
        for edges in incident.values() {
            for (position, &first) in edges.iter().enumerate() {
                for &second in &edges[position + 1..] {
                    pairs.insert((first, second));
                }
            }
        }
        Ok(pairs
            .into_iter()
            .map(|(first, second)| EdgePair {
                first: endpoint_sets[first].clone(),
                second: endpoint_sets[second].clone(),
            })
            .filter(|pair| !filter_degenerate || pair.is_non_degenerate())
            .collect())
    }

    fn connected_vertex_degrees(&self) -> StoreResult<Vec<(u64, u64)>> {
        let degrees = self.degrees(2);
        let degree_of = |vertex: &VertexId| degrees.get(vertex).copied().unwrap_or(0);
        Ok(self
            .edges
            .iter()
            .filter_map(|edge| match edge.as_slice() {
                [left, right] => Some((degree_of(left), degree_of(right))),
                _ => None,
            })
            .collect())
    }
}
