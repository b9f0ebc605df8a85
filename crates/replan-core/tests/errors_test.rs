//! Tests for the replan error handling system.

use replan_core::errors::error_code::{self, ReplanErrorCode};
use replan_core::errors::*;
use replan_core::VertexId;

#[test]
fn test_all_errors_have_error_code() {
    let graph = GraphError::UnknownVertex {
        id: VertexId::new(3),
    };
    assert_eq!(graph.error_code(), error_code::UNKNOWN_VERTEX);

    let key = GraphError::UnknownVertexKey { key: "Z".into() };
    assert_eq!(key.error_code(), error_code::UNKNOWN_VERTEX);

    let dup = GraphError::DuplicateVertex { key: "A".into() };
    assert_eq!(dup.error_code(), error_code::DUPLICATE_VERTEX);

    let edge = GraphError::UnknownEdge {
        from: VertexId::new(0),
        to: VertexId::new(1),
    };
    assert_eq!(edge.error_code(), error_code::UNKNOWN_EDGE);

    let weight = GraphError::InvalidWeight {
        from: VertexId::new(0),
        to: VertexId::new(1),
        weight: -1.0,
    };
    assert_eq!(weight.error_code(), error_code::INVALID_WEIGHT);

    let budget = SearchError::IterationBudgetExceeded {
        iterations: 10,
        budget: 10,
    };
    assert_eq!(budget.error_code(), error_code::BUDGET_EXCEEDED);

    let config = ConfigError::FileNotFound {
        path: "/tmp".into(),
    };
    assert_eq!(config.error_code(), error_code::CONFIG_ERROR);
}

#[test]
fn test_search_error_forwards_inner_code() {
    let err: SearchError = GraphError::UnknownVertex {
        id: VertexId::new(9),
    }
    .into();
    assert!(matches!(err, SearchError::Graph(GraphError::UnknownVertex { .. })));
    assert_eq!(err.error_code(), error_code::UNKNOWN_VERTEX);

    let err: SearchError = ConfigError::InvalidValue {
        field: "x".into(),
        message: "bad".into(),
    }
    .into();
    assert_eq!(err.error_code(), error_code::CONFIG_ERROR);
}

#[test]
fn test_boundary_string_format() {
    let err = GraphError::UnknownEdge {
        from: VertexId::new(1),
        to: VertexId::new(2),
    };
    let rendered = err.boundary_string();
    assert!(rendered.starts_with("[UNKNOWN_EDGE] "), "{rendered}");
    assert!(rendered.contains("v1"));
    assert!(rendered.contains("v2"));
}

#[test]
fn test_budget_and_no_path_are_distinct_messages() {
    let budget = SearchError::IterationBudgetExceeded {
        iterations: 64,
        budget: 64,
    };
    let reconstruction = SearchError::ReconstructionFailed {
        opposite: VertexId::new(4),
        estimate: 3.0,
    };
    assert_ne!(budget.error_code(), reconstruction.error_code());
    assert!(budget.to_string().contains("64"));
    assert!(reconstruction.to_string().contains("v4"));
}
