//! Percentile-compressed degree distributions.
//!
//! The sorted per-vertex degree sequence of a graph, including the vertices no
//! edge touches, is summarised by the values found at a caller-supplied list of
//! percentiles. The normalised variant divides each value by the combinatorial
//! bound reported by [`GraphProperties::max_allowed_degree`].

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    error::{MetricError, StoreError},
    graph::GraphProperties,
};

/// Arity of ordinary edges.
pub const BINARY_ARITY: u32 = 2;

/// Sorted degree sequence with its zero-degree vertices held as a count.
///
/// Zero-degree vertices always sort first, so they are never materialised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DegreeSequence {
    zeros: u64,
    nonzero: Vec<u64>,
}

impl DegreeSequence {
    /// Builds the full sequence for a graph of `vertices` vertices from the
    /// degrees of the vertices touched by at least one edge.
    ///
    /// # Errors
    /// Returns [`MetricError::InconsistentDegreeData`] when more degrees are
    /// reported than vertices exist.
    pub fn new(graph: &str, vertices: u64, mut touched: Vec<u64>) -> Result<Self, MetricError> {
        let reported = touched.len();
        let zeros = u64::try_from(reported)
            .ok()
            .and_then(|reported| vertices.checked_sub(reported))
            .ok_or_else(|| MetricError::InconsistentDegreeData {
                graph: Arc::from(graph),
                reported,
                vertices,
            })?;
        touched.sort_unstable();
        Ok(Self {
            zeros,
            nonzero: touched,
        })
    }

    /// Reads the degree sequence of `arity`-ary edges from `graph`.
    ///
    /// # Errors
    /// Returns [`MetricError::UnsupportedArity`] for arity zero,
    /// [`MetricError::Store`] when a graph query fails, and
    /// [`MetricError::InconsistentDegreeData`] when the graph reports more
    /// touched vertices than it holds.
    #[instrument(
        name = "metrics.degree_sequence",
        err,
        skip(graph),
        fields(graph = %graph.name(), arity = arity),
    )]
    pub fn from_graph<G: GraphProperties + ?Sized>(graph: &G, arity: u32) -> Result<Self, MetricError> {
        if arity == 0 {
            return Err(MetricError::UnsupportedArity { arity });
        }
        let vertices = graph.vertex_count().map_err(|error| store_error(graph, error))?;
        let touched = graph
            .degree_sequence(arity)
            .map_err(|error| store_error(graph, error))?;
        let sequence = Self::new(graph.name(), vertices, touched)?;
        debug!(
            vertices,
            zero_degree = sequence.zeros,
            "degree sequence assembled"
        );
        Ok(sequence)
    }

    /// Returns the total number of vertices in the sequence.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.zeros + self.nonzero.len() as u64
    }

    /// Returns whether the sequence covers no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of vertices without an edge.
    #[must_use]
    pub fn zero_degree_count(&self) -> u64 {
        self.zeros
    }

    /// Returns the largest degree, or zero for an empty sequence.
    #[must_use]
    pub fn max(&self) -> u64 {
        self.nonzero.last().copied().unwrap_or(0)
    }

    /// Returns the degree at sorted position `index`.
    #[must_use]
    pub fn get(&self, index: u64) -> Option<u64> {
        if index >= self.len() {
            return None;
        }
        if index < self.zeros {
            return Some(0);
        }
        usize::try_from(index - self.zeros)
            .ok()
            .and_then(|offset| self.nonzero.get(offset))
            .copied()
    }

    /// Returns the degree found at each percentile.
    ///
    /// An empty sequence yields an empty histogram. Percentiles are taken in the
    /// order given.
    ///
    /// # Errors
    /// Returns [`MetricError::InvalidPercentile`] for values outside `[0, 100]`.
    ///
    /// # Examples
    /// ```
    /// use kgbench_core::DegreeSequence;
    ///
    /// let degrees = DegreeSequence::new("g", 11, vec![1, 1, 2, 2, 3, 3, 4, 10])?;
    /// assert_eq!(degrees.percentiles(&[0.0, 20.0, 50.0, 80.0, 100.0])?, vec![0, 0, 2, 3, 10]);
    /// # Ok::<(), kgbench_core::MetricError>(())
    /// ```
    pub fn percentiles(&self, percentiles: &[f64]) -> Result<Vec<u64>, MetricError> {
        validate_percentiles(percentiles)?;
        if self.is_empty() {
            return Ok(Vec::new());
        }
        let last = self.len() - 1;
        Ok(percentiles
            .iter()
            .map(|&percentile| {
                self.get(percentile_index(percentile, last))
                    .unwrap_or_default()
            })
            .collect())
    }

    /// Returns the degree found at each percentile divided by `bound`.
    ///
    /// # Errors
    /// Returns [`MetricError::InvalidPercentile`] for values outside `[0, 100]`
    /// and [`MetricError::DegreeExceedsBound`] when a selected degree is larger
    /// than `bound`.
    pub fn normalized_percentiles(
        &self,
        percentiles: &[f64],
        bound: u64,
    ) -> Result<Vec<f64>, MetricError> {
        self.percentiles(percentiles)?
            .into_iter()
            .map(|degree| normalize(degree, bound))
            .collect()
    }
}

/// Computes the percentile histogram of `arity`-ary edge degrees.
///
/// # Errors
/// See [`DegreeSequence::from_graph`] and [`DegreeSequence::percentiles`].
#[instrument(
    name = "metrics.degree_distribution",
    err,
    skip(graph, percentiles),
    fields(graph = %graph.name(), arity = arity, percentiles = percentiles.len()),
)]
pub fn degree_distribution<G: GraphProperties + ?Sized>(
    graph: &G,
    arity: u32,
    percentiles: &[f64],
) -> Result<Vec<u64>, MetricError> {
    validate_percentiles(percentiles)?;
    DegreeSequence::from_graph(graph, arity)?.percentiles(percentiles)
}

/// Computes the percentile histogram of `arity`-ary edge degrees, each value
/// divided by the graph's maximum allowed degree for that arity.
///
/// A zero bound yields zeros, as every degree must then be zero.
///
/// # Errors
/// As [`degree_distribution`], plus [`MetricError::DegreeExceedsBound`].
#[instrument(
    name = "metrics.normalized_degree_distribution",
    err,
    skip(graph, percentiles),
    fields(graph = %graph.name(), arity = arity, percentiles = percentiles.len()),
)]
pub fn normalized_degree_distribution<G: GraphProperties + ?Sized>(
    graph: &G,
    arity: u32,
    percentiles: &[f64],
) -> Result<Vec<f64>, MetricError> {
    validate_percentiles(percentiles)?;
    let sequence = DegreeSequence::from_graph(graph, arity)?;
    if sequence.is_empty() {
        return Ok(Vec::new());
    }
    let bound = graph
        .max_allowed_degree(arity)
        .map_err(|error| store_error(graph, error))?;
    debug!(bound, "normalising by maximum allowed degree");
    sequence.normalized_percentiles(percentiles, bound)
}

/// Shorthand for [`degree_distribution`] over binary edges.
///
/// # Errors
/// See [`degree_distribution`].
pub fn binary_edge_degree_distribution<G: GraphProperties + ?Sized>(
    graph: &G,
    percentiles: &[f64],
) -> Result<Vec<u64>, MetricError> {
    degree_distribution(graph, BINARY_ARITY, percentiles)
}

/// Shorthand for [`normalized_degree_distribution`] over binary edges.
///
/// # Errors
/// See [`normalized_degree_distribution`].
pub fn normalized_binary_edge_degree_distribution<G: GraphProperties + ?Sized>(
    graph: &G,
    percentiles: &[f64],
) -> Result<Vec<f64>, MetricError> {
    normalized_degree_distribution(graph, BINARY_ARITY, percentiles)
}

fn validate_percentiles(percentiles: &[f64]) -> Result<(), MetricError> {
    match percentiles
        .iter()
        .find(|value| !(value.is_finite() && (0.0..=100.0).contains(*value)))
    {
        Some(&value) => Err(MetricError::InvalidPercentile { value }),
        None => Ok(()),
    }
}

/// Maps a percentile onto a sorted position in `0..=last`, rounding up.
fn percentile_index(percentile: f64, last: u64) -> u64 {
    // Multiply before dividing so whole-number positions stay exact.
    let scaled = (percentile * last as f64 / 100.0).ceil();
    if scaled <= 0.0 {
        0
    } else {
        (scaled as u64).min(last)
    }
}

fn normalize(degree: u64, bound: u64) -> Result<f64, MetricError> {
    if degree > bound {
        return Err(MetricError::DegreeExceedsBound { degree, bound });
    }
    if bound == 0 {
        return Ok(0.0);
    }
    Ok(degree as f64 / bound as f64)
}

fn store_error<G: GraphProperties + ?Sized>(graph: &G, error: StoreError) -> MetricError {
    MetricError::Store {
        graph: Arc::from(graph.name()),
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use rstest::rstest;

    use crate::test_utils::suite_proptest_config;

    const PERCENTILES: [f64; 5] = [0.0, 20.0, 50.0, 70.0, 100.0];

    #[rstest]
    #[case(0.0, 9, 0)]
    #[case(20.0, 9, 2)]
    #[case(50.0, 9, 5)]
    #[case(70.0, 9, 7)]
    #[case(100.0, 9, 9)]
    #[case(80.0, 10, 8)]
    #[case(1.0, 0, 0)]
    fn percentile_index_rounds_up(#[case] percentile: f64, #[case] last: u64, #[case] expected: u64) {
        assert_eq!(percentile_index(percentile, last), expected);
    }

    #[test]
    fn binary_fixture_matches_expected_histogram() {
        let sequence =
            DegreeSequence::new("binary", 10, vec![3, 1, 2, 2, 2, 3, 2, 1, 2, 2]).expect("consistent");
        assert_eq!(sequence.percentiles(&PERCENTILES).ok(), Some(vec![1, 2, 2, 2, 3]));
    }

    #[test]
    fn zero_degree_vertices_are_padded() {
        let sequence = DegreeSequence::new("sparse", 5, vec![4]).expect("consistent");
        assert_eq!(sequence.zero_degree_count(), 4);
        assert_eq!(sequence.percentiles(&[0.0, 75.0, 100.0]).ok(), Some(vec![0, 0, 4]));
    }

    #[test]
    fn more_degrees_than_vertices_is_rejected() {
        let err = DegreeSequence::new("broken", 1, vec![1, 1]).expect_err("must reject");
        assert_eq!(
            err,
            MetricError::InconsistentDegreeData {
                graph: Arc::from("broken"),
                reported: 2,
                vertices: 1,
            }
        );
    }

    #[rstest]
    #[case(-1.0)]
    #[case(100.5)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn invalid_percentiles_are_rejected(#[case] value: f64) {
        let sequence = DegreeSequence::new("g", 2, vec![1, 1]).expect("consistent");
        let err = sequence.percentiles(&[0.0, value]).expect_err("must reject");
        assert_eq!(err.code(), crate::MetricErrorCode::InvalidPercentile);
    }

    #[rstest]
    #[case(0, 0, Some(0.0))]
    #[case(2, 4, Some(0.5))]
    #[case(4, 4, Some(1.0))]
    #[case(5, 4, None)]
    #[case(1, 0, None)]
    fn normalize_divides_by_bound(#[case] degree: u64, #[case] bound: u64, #[case] expected: Option<f64>) {
        assert_eq!(normalize(degree, bound).ok(), expected);
    }

    fn degrees_strategy() -> impl Strategy<Value = (u64, Vec<u64>)> {
        prop::collection::vec(1_u64..50, 0..40)
            .prop_flat_map(|touched| {
                let min = touched.len() as u64;
                (min..min + 20, Just(touched))
            })
    }

    fn percentiles_strategy() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(0.0_f64..=100.0, 1..8).prop_map(|mut values| {
            values.sort_by(f64::total_cmp);
            values
        })
    }

    proptest! {
        #![proptest_config(suite_proptest_config(64))]

        #[test]
        fn histogram_matches_materialised_sequence(
            (vertices, touched) in degrees_strategy(),
            percentiles in percentiles_strategy(),
        ) {
            let sequence = DegreeSequence::new("prop", vertices, touched.clone())
                .expect("generated data is consistent");
            let histogram = sequence.percentiles(&percentiles).expect("percentiles are valid");

            let mut full = touched;
            full.resize(vertices as usize, 0);
            full.sort_unstable();
            if full.is_empty() {
                prop_assert!(histogram.is_empty());
            } else {
                prop_assert_eq!(histogram.len(), percentiles.len());
                let last = (full.len() - 1) as u64;
                for (value, percentile) in histogram.iter().zip(&percentiles) {
                    prop_assert_eq!(*value, full[percentile_index(*percentile, last) as usize]);
                }
                prop_assert!(histogram.windows(2).all(|pair| pair[0] <= pair[1]));
            }
        }
    }
}
