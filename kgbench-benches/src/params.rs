//! Benchmark parameter types used as Criterion benchmark ids.

use std::fmt;

/// Parameters for a graph statistics benchmark run.
#[derive(Clone, Debug)]
pub struct GraphBenchParams {
    /// Number of vertices in the graph.
    pub vertices: usize,
    /// Number of edges in the graph.
    pub edges: usize,
}

impl fmt::Display for GraphBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v={},e={}", self.vertices, self.edges)
    }
}

/// Parameters for an offset or picker benchmark run.
#[derive(Clone, Debug)]
pub struct PickBenchParams {
    /// Number of candidates available.
    pub candidates: usize,
    /// Number of distinct candidates drawn.
    pub drawn: usize,
}

impl fmt::Display for PickBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},k={}", self.candidates, self.drawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_compact() {
        let graph = GraphBenchParams {
            vertices: 10,
            edges: 40,
        };
        assert_eq!(graph.to_string(), "v=10,e=40");
        let pick = PickBenchParams {
            candidates: 1_000,
            drawn: 5,
        };
        assert_eq!(pick.to_string(), "n=1000,k=5");
    }
}
