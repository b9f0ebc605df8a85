//! Tests for shared identifier and collection types.

use replan_core::types::collections::{FxHashMap, FxHashSet, SmallVec8};
use replan_core::VertexId;

#[test]
fn test_vertex_id_round_trip_index() {
    let id = VertexId::new(42);
    assert_eq!(id.index(), 42);
    assert_eq!(VertexId::from(42u32), id);
    assert_eq!(id.to_string(), "v42");
}

#[test]
fn test_vertex_id_serializes_transparently() {
    let json = serde_json::to_string(&VertexId::new(7)).unwrap();
    assert_eq!(json, "7");
    let back: VertexId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, VertexId::new(7));
}

#[test]
fn test_vertex_id_ordering_is_total() {
    let mut ids = vec![VertexId::new(3), VertexId::new(1), VertexId::new(2)];
    ids.sort();
    assert_eq!(ids, vec![VertexId::new(1), VertexId::new(2), VertexId::new(3)]);
}

#[test]
fn test_collections_usable_with_vertex_ids() {
    let mut g: FxHashMap<VertexId, f64> = FxHashMap::default();
    g.insert(VertexId::new(0), 0.0);
    let mut seen: FxHashSet<VertexId> = FxHashSet::default();
    assert!(seen.insert(VertexId::new(0)));
    assert!(!seen.insert(VertexId::new(0)));

    let mut neighbors: SmallVec8<VertexId> = SmallVec8::new();
    neighbors.extend((0..8).map(VertexId::new));
    assert!(!neighbors.spilled());
    assert_eq!(g.get(&VertexId::new(0)), Some(&0.0));
}
