use kgbench_core::{EdgePair, GraphProperties, StoreError, VertexId, max_allowed_degree};
use std::collections::BTreeSet;

/// Graph reporting a fixed binary degree sequence.
#[derive(Clone, Debug)]
pub struct FixedDegrees {
    vertices: u64,
    touched: Vec<u64>,
    loops: bool,
    bound: Option<u64>,
    failure: Option<StoreError>,
}

impl FixedDegrees {
    #[must_use]
    pub fn new(vertices: u64, touched: &[u64]) -> Self {
        Self {
            vertices,
            touched: touched.to_vec(),
            loops: false,
            bound: None,
            failure: None,
        }
    }

    #[must_use]
    pub fn with_loops(mut self) -> Self {
        self.loops = true;
        self
    }

    #[must_use]
    pub fn with_bound(mut self, bound: u64) -> Self {
        self.bound = Some(bound);
        self
    }

    #[must_use]
    pub fn failing(mut self, error: StoreError) -> Self {
        self.failure = Some(error);
        self
    }
}

impl GraphProperties for FixedDegrees {
    fn name(&self) -> &str {
        "fixed"
    }

    fn vertex_count(&self) -> Result<u64, StoreError> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(self.vertices),
        }
    }

    fn degree_sequence(&self, arity: u32) -> Result<Vec<u64>, StoreError> {
        Ok(if arity == 2 {
            self.touched.clone()
        } else {
            Vec::new()
        })
    }

    fn max_allowed_degree(&self, arity: u32) -> Result<u64, StoreError> {
        if let Some(bound) = self.bound {
            return Ok(bound);
        }
        max_allowed_degree(self.vertices, arity, self.loops).ok_or_else(|| StoreError::Backend {
            message: "bound overflows".into(),
        })
    }

    fn neighbors(&self, _vertex: &VertexId) -> Result<BTreeSet<VertexId>, StoreError> {
        Ok(BTreeSet::new())
    }

    fn connected_edge_pairs(&self, _filter_degenerate: bool) -> Result<Vec<EdgePair>, StoreError> {
        Ok(Vec::new())
    }
}
