//! Random hypergraph generation.

use kgbench_core::VertexId;
use kgbench_providers_edgelist::EdgeListGraph;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::SyntheticError;

/// Configuration for a uniformly random hypergraph.
///
/// Each edge draws its endpoints independently and uniformly, so loops occur
/// naturally and are counted towards the maximum allowed degree.
#[derive(Clone, Copy, Debug)]
pub struct SyntheticGraphConfig {
    /// Number of vertices, all of which are registered even when isolated.
    pub vertices: usize,
    /// Number of edges.
    pub edges: usize,
    /// Number of endpoints per edge.
    pub arity: usize,
    /// Seed for the generator.
    pub seed: u64,
}

impl SyntheticGraphConfig {
    /// Generates the graph.
    ///
    /// # Errors
    /// Returns [`SyntheticError::ZeroVertices`] or
    /// [`SyntheticError::ZeroArity`] for empty shapes.
    pub fn generate(&self) -> Result<EdgeListGraph, SyntheticError> {
        if self.vertices == 0 {
            return Err(SyntheticError::ZeroVertices);
        }
        if self.arity == 0 {
            return Err(SyntheticError::ZeroArity);
        }
        let names: Vec<VertexId> = (0..self.vertices).map(|index| VertexId::new(format!("v{index}"))).collect();
        let mut graph = EdgeListGraph::new(format!("synthetic-{}", self.seed)).with_loop_edges(true);
        for name in &names {
            graph.add_vertex(name.clone());
        }
        let mut rng = SmallRng::seed_from_u64(self.seed);
        for _ in 0..self.edges {
            let endpoints = (0..self.arity)
                .filter_map(|_| names.get(rng.gen_range(0..names.len())).cloned())
                .collect();
            graph.add_edge(endpoints);
        }
        Ok(graph)
    }
}
