//! Read-only graph capability interface used by the statistics pass.

use std::collections::BTreeSet;

use crate::{error::StoreResult, ids::VertexId};

/// Pair of edges that share at least one vertex, each given by its endpoint set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgePair {
    /// Endpoints of the first edge.
    pub first: BTreeSet<VertexId>,
    /// Endpoints of the second edge.
    pub second: BTreeSet<VertexId>,
}

impl EdgePair {
    /// Returns whether both edges touch more than one distinct vertex.
    #[must_use]
    pub fn is_non_degenerate(&self) -> bool {
        self.first.len() > 1 && self.second.len() > 1
    }
}

/// Abstract read-only view of a (hyper)graph.
///
/// An edge's arity is the number of endpoint slots it has. A vertex occupying
/// several slots of one edge gains one degree per slot, so a self-loop adds
/// two to its vertex. Implementations must report a stable vertex count for
/// the duration of one statistics pass.
///
/// # Examples
/// ```
/// use std::collections::BTreeSet;
/// use kgbench_core::{EdgePair, GraphProperties, StoreError, VertexId};
///
/// struct Star;
///
/// impl GraphProperties for Star {
///     fn name(&self) -> &str { "star" }
///     fn vertex_count(&self) -> Result<u64, StoreError> { Ok(4) }
///     fn degree_sequence(&self, arity: u32) -> Result<Vec<u64>, StoreError> {
///         Ok(if arity == 2 { vec![3, 1, 1, 1] } else { Vec::new() })
///     }
///     fn max_allowed_degree(&self, arity: u32) -> Result<u64, StoreError> {
///         Ok(kgbench_core::max_allowed_degree(4, arity, false).unwrap_or(0))
///     }
///     fn neighbors(&self, _: &VertexId) -> Result<BTreeSet<VertexId>, StoreError> {
///         Ok(BTreeSet::new())
///     }
///     fn connected_edge_pairs(&self, _: bool) -> Result<Vec<EdgePair>, StoreError> {
///         Ok(Vec::new())
///     }
/// }
///
/// assert_eq!(Star.max_degree_present()?, 3);
/// # Ok::<(), StoreError>(())
/// ```
pub trait GraphProperties {
    /// Returns a human-readable name used in diagnostics.
    fn name(&self) -> &str;

    /// Returns the number of vertices, including isolated ones.
    fn vertex_count(&self) -> StoreResult<u64>;

    /// Returns one degree per vertex touched by at least one edge of exactly
    /// `arity` endpoints, in unspecified order. Untouched vertices are omitted.
    fn degree_sequence(&self, arity: u32) -> StoreResult<Vec<u64>>;

    /// Returns the largest degree a vertex could have given `arity`-ary edges
    /// and the current vertex count.
    fn max_allowed_degree(&self, arity: u32) -> StoreResult<u64>;

    /// Returns the vertices sharing an edge with `vertex`.
    fn neighbors(&self, vertex: &VertexId) -> StoreResult<BTreeSet<VertexId>>;

    /// Returns pairs of distinct edges that share a vertex.
    ///
    /// When `filter_degenerate` is set, pairs where either edge touches a
    /// single distinct vertex are dropped.
    fn connected_edge_pairs(&self, filter_degenerate: bool) -> StoreResult<Vec<EdgePair>>;

    /// Returns the largest binary-edge degree present in the graph.
    fn max_degree_present(&self) -> StoreResult<u64> {
        Ok(self.degree_sequence(2)?.into_iter().max().unwrap_or(0))
    }

    /// Returns the degree pair of the endpoints of every binary edge.
    ///
    /// The default implementation reports nothing; stores that can enumerate
    /// their edges should override it.
    fn connected_vertex_degrees(&self) -> StoreResult<Vec<(u64, u64)>> {
        Ok(Vec::new())
    }
}

impl<G: GraphProperties + ?Sized> GraphProperties for &G {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn vertex_count(&self) -> StoreResult<u64> {
        (**self).vertex_count()
    }

    fn degree_sequence(&self, arity: u32) -> StoreResult<Vec<u64>> {
        (**self).degree_sequence(arity)
    }

    fn max_allowed_degree(&self, arity: u32) -> StoreResult<u64> {
        (**self).max_allowed_degree(arity)
    }

    fn neighbors(&self, vertex: &VertexId) -> StoreResult<BTreeSet<VertexId>> {
        (**self).neighbors(vertex)
    }

    fn connected_edge_pairs(&self, filter_degenerate: bool) -> StoreResult<Vec<EdgePair>> {
        (**self).connected_edge_pairs(filter_degenerate)
    }

    fn max_degree_present(&self) -> StoreResult<u64> {
        (**self).max_degree_present()
    }

    fn connected_vertex_degrees(&self) -> StoreResult<Vec<(u64, u64)>> {
        (**self).connected_vertex_degrees()
    }
}

/// Computes the largest degree one vertex can reach in a graph of `vertices`
/// vertices whose edges all have `arity` endpoints.
///
/// With `loops` allowed an edge may occupy the anchor vertex in `i` of its
/// slots, contributing `i`, so the bound is `Σ_{i=1}^{m} i · C(V-1, m-i)`.
/// Without loops each edge holds the anchor once and the bound reduces to
/// `C(V-1, m-1)`. Returns `None` on overflow.
///
/// # Examples
/// ```
/// use kgbench_core::max_allowed_degree;
///
/// assert_eq!(max_allowed_degree(10, 2, false), Some(9));
/// assert_eq!(max_allowed_degree(10, 2, true), Some(11));
/// assert_eq!(max_allowed_degree(0, 2, true), Some(0));
/// ```
#[must_use]
pub fn max_allowed_degree(vertices: u64, arity: u32, loops: bool) -> Option<u64> {
    if vertices == 0 || arity == 0 {
        return Some(0);
    }
    let others = vertices - 1;
    let arity = u64::from(arity);
    if !loops {
        return binomial(others, arity - 1);
    }
    (1..=arity).try_fold(0_u64, |total, slots| {
        let ways = binomial(others, arity - slots)?;
        total.checked_add(slots.checked_mul(ways)?)
    })
}

/// Binomial coefficient with overflow detection.
///
/// The running product `C(n, i)` is always an integer, so dividing after each
/// multiplication is exact.
fn binomial(n: u64, k: u64) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        acc = acc.checked_mul(u128::from(n - i))? / u128::from(i + 1);
    }
    u64::try_from(acc).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(5, 0, Some(1))]
    #[case(5, 2, Some(10))]
    #[case(9, 1, Some(9))]
    #[case(3, 4, Some(0))]
    #[case(0, 0, Some(1))]
    #[case(64, 32, Some(1_832_624_140_942_590_534))]
    fn binomial_matches_known_values(#[case] n: u64, #[case] k: u64, #[case] expected: Option<u64>) {
        assert_eq!(binomial(n, k), expected);
    }

    #[test]
    fn binomial_reports_overflow() {
        assert_eq!(binomial(200, 100), None);
    }

    #[rstest]
    #[case::binary_without_loops(10, 2, false, 9)]
    #[case::binary_with_loops(10, 2, true, 11)]
    #[case::ternary_with_loops(5, 3, true, 6 + 2 * 4 + 3)]
    #[case::ternary_without_loops(5, 3, false, 6)]
    #[case::single_vertex_loop(1, 2, true, 2)]
    #[case::single_vertex_no_loop(1, 2, false, 0)]
    #[case::unary(7, 1, true, 1)]
    fn max_allowed_degree_sums_slot_contributions(
        #[case] vertices: u64,
        #[case] arity: u32,
        #[case] loops: bool,
        #[case] expected: u64,
    ) {
        assert_eq!(max_allowed_degree(vertices, arity, loops), Some(expected));
    }
}
