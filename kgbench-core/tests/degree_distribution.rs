mod common;

use common::FixedDegrees;
use kgbench_core::{
    MetricError, MetricErrorCode, StoreError, StoreErrorCode, binary_edge_degree_distribution,
    degree_distribution, normalized_binary_edge_degree_distribution,
};
use kgbench_test_support::{
    fixtures::{ALL_GRAPHS, GraphFixture, REFERENCE_PERCENTILES},
    recording::RecordingLayer,
};
use rstest::rstest;

fn fixture_graph(fixture: &GraphFixture) -> FixedDegrees {
    let graph = FixedDegrees::new(fixture.vertices, fixture.sorted_degrees);
    if fixture.max_allowed_degree > fixture.vertices - 1 {
        graph.with_loops()
    } else {
        graph
    }
}

#[test]
fn reference_graphs_produce_expected_histograms() {
    for fixture in &ALL_GRAPHS {
        let graph = fixture_graph(fixture);
        let discrete = binary_edge_degree_distribution(&graph, &REFERENCE_PERCENTILES)
            .expect("fixture must compute");
        assert_eq!(discrete, fixture.distribution.to_vec(), "{}", fixture.name);

        let normalized = normalized_binary_edge_degree_distribution(&graph, &REFERENCE_PERCENTILES)
            .expect("fixture must normalise");
        let expected: Vec<f64> = fixture
            .distribution
            .iter()
            .map(|degree| *degree as f64 / fixture.max_allowed_degree as f64)
            .collect();
        assert_eq!(normalized, expected, "{}", fixture.name);
    }
}

#[test]
fn zero_degree_vertices_take_the_low_percentiles() {
    let graph = FixedDegrees::new(11, &[1, 1, 2, 2, 3, 3, 4, 10]);
    let percentiles = [0.0, 20.0, 50.0, 80.0, 100.0];
    assert_eq!(
        binary_edge_degree_distribution(&graph, &percentiles).ok(),
        Some(vec![0, 0, 2, 3, 10])
    );
    let normalized = normalized_binary_edge_degree_distribution(&graph.with_bound(11), &percentiles)
        .expect("bound is eleven");
    assert_eq!(normalized, vec![0.0, 0.0, 2.0 / 11.0, 3.0 / 11.0, 10.0 / 11.0]);
}

#[rstest]
#[case(0.0, 1)]
#[case(100.0, 9)]
fn extremes_select_minimum_and_maximum(#[case] percentile: f64, #[case] expected: u64) {
    let graph = FixedDegrees::new(4, &[9, 1, 4, 2]);
    assert_eq!(
        binary_edge_degree_distribution(&graph, &[percentile]).ok(),
        Some(vec![expected])
    );
}

#[test]
fn empty_graph_yields_empty_histograms() {
    let graph = FixedDegrees::new(0, &[]);
    assert_eq!(
        binary_edge_degree_distribution(&graph, &REFERENCE_PERCENTILES).ok(),
        Some(Vec::new())
    );
    assert_eq!(
        normalized_binary_edge_degree_distribution(&graph, &REFERENCE_PERCENTILES).ok(),
        Some(Vec::new())
    );
}

#[test]
fn inconsistent_degree_data_is_fatal() {
    let graph = FixedDegrees::new(2, &[1, 1, 1]);
    let err = binary_edge_degree_distribution(&graph, &REFERENCE_PERCENTILES)
        .expect_err("three degrees for two vertices");
    assert_eq!(err.code(), MetricErrorCode::InconsistentDegreeData);
}

#[test]
fn degrees_reported_for_a_vertexless_graph_are_fatal() {
    let graph = FixedDegrees::new(0, &[1, 1]);
    let err = binary_edge_degree_distribution(&graph, &REFERENCE_PERCENTILES)
        .expect_err("two degrees for zero vertices");
    assert_eq!(err.code(), MetricErrorCode::InconsistentDegreeData);
    let err = normalized_binary_edge_degree_distribution(&graph, &REFERENCE_PERCENTILES)
        .expect_err("two degrees for zero vertices");
    assert_eq!(err.code(), MetricErrorCode::InconsistentDegreeData);
}

#[test]
fn degrees_above_the_bound_are_rejected() {
    let graph = FixedDegrees::new(3, &[5, 1, 1]);
    let err = normalized_binary_edge_degree_distribution(&graph, &[100.0])
        .expect_err("degree 5 exceeds C(2, 1)");
    assert_eq!(err, MetricError::DegreeExceedsBound { degree: 5, bound: 2 });
}

#[test]
fn zero_arity_is_unsupported() {
    let graph = FixedDegrees::new(3, &[1, 1]);
    let err = degree_distribution(&graph, 0, &[50.0]).expect_err("arity zero");
    assert_eq!(err, MetricError::UnsupportedArity { arity: 0 });
}

#[test]
fn store_failures_carry_the_graph_name() {
    let graph = FixedDegrees::new(3, &[1]).failing(StoreError::Backend {
        message: "offline".into(),
    });
    let err = binary_edge_degree_distribution(&graph, &[50.0]).expect_err("store is offline");
    assert_eq!(err.code(), MetricErrorCode::StoreFailure);
    assert_eq!(err.store_code(), Some(StoreErrorCode::Backend));
    assert!(err.to_string().contains("fixed"));
}

#[test]
fn distribution_is_instrumented() {
    let graph = FixedDegrees::new(5, &[1, 1]);
    let (result, layer) =
        RecordingLayer::capture(|| binary_edge_degree_distribution(&graph, &[0.0, 100.0]));
    assert_eq!(result.ok(), Some(vec![0, 1]));
    let span = layer
        .span("metrics.degree_distribution")
        .expect("distribution span must close");
    assert_eq!(span.fields.get("graph").map(String::as_str), Some("fixed"));
    assert_eq!(span.fields.get("arity").map(String::as_str), Some("2"));
    assert!(layer.span("metrics.degree_sequence").is_some());
}
