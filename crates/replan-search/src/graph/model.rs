//! `Graph`: the mutable weighted graph searched by every engine.

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::{Directed, Direction};
use replan_core::errors::GraphError;
use replan_core::types::collections::{FxHashMap, SmallVec8};
use replan_core::VertexId;

use super::types::{EdgeData, VertexData};

/// The underlying petgraph storage. Undirected graphs still store one arc per edge.
type Storage = StableGraph<VertexData, EdgeData, Directed>;

/// Weighted graph with blockable edges.
///
/// Neighbor queries return vertices in ascending [`VertexId`] order without duplicates;
/// search engines rely on that order for deterministic tie-breaks.
#[derive(Debug, Clone)]
pub struct Graph {
    inner: Storage,
    keys: FxHashMap<String, VertexId>,
    directed: bool,
}

impl Graph {
    /// Create an empty graph.
    pub fn new(directed: bool) -> Self {
        Self {
            inner: StableGraph::default(),
            keys: FxHashMap::default(),
            directed,
        }
    }

    /// Create an empty directed graph.
    pub fn directed() -> Self {
        Self::new(true)
    }

    /// Create an empty undirected graph.
    pub fn undirected() -> Self {
        Self::new(false)
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Add a vertex. Keys must be unique.
    pub fn add_vertex(&mut self, vertex: VertexData) -> Result<VertexId, GraphError> {
        if self.keys.contains_key(&vertex.key) {
            return Err(GraphError::DuplicateVertex { key: vertex.key });
        }
        let key = vertex.key.clone();
        let id = to_vertex(self.inner.add_node(vertex));
        self.keys.insert(key, id);
        Ok(id)
    }

    /// Add an edge, or update the weight of the existing edge with the same identity.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, weight: f64) -> Result<(), GraphError> {
        self.ensure_vertex(from)?;
        self.ensure_vertex(to)?;
        validate_weight(from, to, weight)?;

        match self.arc(from, to) {
            Some(edge) => {
                if let Some(data) = self.inner.edge_weight_mut(edge) {
                    data.weight = weight;
                }
            }
            None => {
                self.inner.add_edge(to_node(from), to_node(to), EdgeData::new(weight));
            }
        }
        Ok(())
    }

    /// Add an edge between two vertices looked up by key.
    pub fn connect(&mut self, from: &str, to: &str, weight: f64) -> Result<(), GraphError> {
        let from = self.require_key(from)?;
        let to = self.require_key(to)?;
        self.add_edge(from, to, weight)
    }

    /// Set weight and blocked flag of an existing edge, returning its previous payload.
    ///
    /// All validation happens before the edge is touched. While a search engine holds the
    /// graph this is only reachable through the engine's `update_edge_cost`.
    pub fn update_edge(
        &mut self,
        from: VertexId,
        to: VertexId,
        weight: f64,
        blocked: bool,
    ) -> Result<EdgeData, GraphError> {
        self.ensure_vertex(from)?;
        self.ensure_vertex(to)?;
        validate_weight(from, to, weight)?;
        let edge = self.arc(from, to).ok_or(GraphError::UnknownEdge { from, to })?;
        let data = self
            .inner
            .edge_weight_mut(edge)
            .ok_or(GraphError::UnknownEdge { from, to })?;

        let previous = data.clone();
        data.weight = weight;
        data.blocked = blocked;
        Ok(previous)
    }

    pub fn vertex(&self, id: VertexId) -> Option<&VertexData> {
        self.inner.node_weight(to_node(id))
    }

    /// Look up a vertex by its key.
    pub fn vertex_id(&self, key: &str) -> Option<VertexId> {
        self.keys.get(key).copied()
    }

    /// Look up a vertex by key, failing with a descriptive error.
    pub fn require_key(&self, key: &str) -> Result<VertexId, GraphError> {
        self.vertex_id(key).ok_or_else(|| GraphError::UnknownVertexKey {
            key: key.to_string(),
        })
    }

    pub fn contains(&self, id: VertexId) -> bool {
        self.inner.contains_node(to_node(id))
    }

    /// Fail with `UnknownVertex` unless `id` belongs to this graph.
    pub fn ensure_vertex(&self, id: VertexId) -> Result<(), GraphError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(GraphError::UnknownVertex { id })
        }
    }

    /// Display name for traces: the label if set, else the key.
    pub fn name(&self, id: VertexId) -> String {
        match self.vertex(id) {
            Some(v) if !v.label.is_empty() => v.label.clone(),
            Some(v) => v.key.clone(),
            None => id.to_string(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// All vertex identifiers in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.inner.node_indices().map(to_vertex)
    }

    /// All edges as stored: `(from, to, payload)`.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId, &EdgeData)> + '_ {
        self.inner.edge_indices().filter_map(move |e| {
            let (a, b) = self.inner.edge_endpoints(e)?;
            let data = self.inner.edge_weight(e)?;
            Some((to_vertex(a), to_vertex(b), data))
        })
    }

    /// The edge that allows travelling `from -> to`, if any.
    pub fn edge(&self, from: VertexId, to: VertexId) -> Option<&EdgeData> {
        self.arc(from, to).and_then(|e| self.inner.edge_weight(e))
    }

    pub(super) fn edge_mut(&mut self, from: VertexId, to: VertexId) -> Option<&mut EdgeData> {
        let edge = self.arc(from, to)?;
        self.inner.edge_weight_mut(edge)
    }

    /// Cost of travelling `from -> to`: infinity if there is no such edge or it is blocked.
    pub fn edge_cost(&self, from: VertexId, to: VertexId) -> f64 {
        self.edge(from, to).map_or(f64::INFINITY, EdgeData::cost)
    }

    /// Vertices reachable from `u` over one edge (blocked edges included).
    pub fn successors(&self, u: VertexId) -> SmallVec8<VertexId> {
        if self.directed {
            self.collect_sorted(self.inner.neighbors_directed(to_node(u), Direction::Outgoing))
        } else {
            self.collect_sorted(self.inner.neighbors_undirected(to_node(u)))
        }
    }

    /// Vertices with an edge into `u` (blocked edges included).
    pub fn predecessors(&self, u: VertexId) -> SmallVec8<VertexId> {
        if self.directed {
            self.collect_sorted(self.inner.neighbors_directed(to_node(u), Direction::Incoming))
        } else {
            self.collect_sorted(self.inner.neighbors_undirected(to_node(u)))
        }
    }

    /// Union of successors and predecessors.
    pub fn neighbors(&self, u: VertexId) -> SmallVec8<VertexId> {
        self.collect_sorted(self.inner.neighbors_undirected(to_node(u)))
    }

    /// The stored arc carrying traffic `from -> to`.
    fn arc(&self, from: VertexId, to: VertexId) -> Option<EdgeIndex> {
        let (a, b) = (to_node(from), to_node(to));
        match self.inner.find_edge(a, b) {
            Some(e) => Some(e),
            None if !self.directed => self.inner.find_edge(b, a),
            None => None,
        }
    }

    fn collect_sorted(&self, nodes: impl Iterator<Item = NodeIndex>) -> SmallVec8<VertexId> {
        let mut out: SmallVec8<VertexId> = nodes.map(to_vertex).collect();
        out.sort_unstable();
        out.dedup();
        out
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::undirected()
    }
}

fn validate_weight(from: VertexId, to: VertexId, weight: f64) -> Result<(), GraphError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(GraphError::InvalidWeight { from, to, weight })
    }
}

fn to_node(id: VertexId) -> NodeIndex {
    NodeIndex::new(id.index())
}

fn to_vertex(node: NodeIndex) -> VertexId {
    VertexId::new(node.index() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(directed: bool) -> (Graph, [VertexId; 4]) {
        let mut g = Graph::new(directed);
        let a = g.add_vertex(VertexData::at("A", 0.0, 0.0)).unwrap();
        let b = g.add_vertex(VertexData::at("B", 1.0, 0.0)).unwrap();
        let c = g.add_vertex(VertexData::at("C", 1.0, 1.0)).unwrap();
        let d = g.add_vertex(VertexData::at("D", 0.0, 1.0)).unwrap();
        g.add_edge(a, b, 1.0).unwrap();
        g.add_edge(b, c, 1.0).unwrap();
        g.add_edge(c, d, 1.0).unwrap();
        g.add_edge(d, a, 1.0).unwrap();
        (g, [a, b, c, d])
    }

    #[test]
    fn test_undirected_neighbors_are_symmetric_and_sorted() {
        let (g, [a, b, _c, d]) = square(false);
        assert_eq!(g.successors(a).as_slice(), &[b, d]);
        assert_eq!(g.predecessors(a).as_slice(), &[b, d]);
        assert_eq!(g.edge_cost(b, a), 1.0);
    }

    #[test]
    fn test_directed_neighbors_follow_arcs() {
        let (g, [a, b, _c, d]) = square(true);
        assert_eq!(g.successors(a).as_slice(), &[b]);
        assert_eq!(g.predecessors(a).as_slice(), &[d]);
        assert!(g.edge_cost(b, a).is_infinite());
    }

    #[test]
    fn test_re_adding_edge_updates_weight() {
        let (mut g, [a, b, ..]) = square(false);
        g.add_edge(b, a, 4.0).unwrap();
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.edge_cost(a, b), 4.0);
    }

    #[test]
    fn test_blocked_edge_costs_infinity_but_stays() {
        let (mut g, [a, b, ..]) = square(false);
        let previous = g.update_edge(a, b, 1.0, true).unwrap();
        assert!(!previous.blocked);
        assert!(g.edge_cost(a, b).is_infinite());
        assert!(g.successors(a).contains(&b));
        g.update_edge(a, b, 1.0, false).unwrap();
        assert_eq!(g.edge_cost(a, b), 1.0);
    }

    #[test]
    fn test_malformed_input_leaves_graph_untouched() {
        let (mut g, [a, b, c, _]) = square(false);
        assert!(matches!(
            g.update_edge(a, c, 1.0, false),
            Err(GraphError::UnknownEdge { .. })
        ));
        assert!(matches!(
            g.update_edge(a, b, -2.0, false),
            Err(GraphError::InvalidWeight { .. })
        ));
        assert!(matches!(
            g.update_edge(a, b, f64::NAN, false),
            Err(GraphError::InvalidWeight { .. })
        ));
        assert!(matches!(
            g.update_edge(a, VertexId::new(99), 1.0, false),
            Err(GraphError::UnknownVertex { .. })
        ));
        assert_eq!(g.edge_cost(a, b), 1.0);
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let (mut g, _) = square(false);
        assert!(matches!(
            g.add_vertex(VertexData::new("A")),
            Err(GraphError::DuplicateVertex { .. })
        ));
        assert_eq!(g.vertex_count(), 4);
    }

    #[test]
    fn test_key_lookup_and_names() {
        let (mut g, [a, ..]) = square(false);
        assert_eq!(g.vertex_id("A"), Some(a));
        assert!(g.require_key("Z").is_err());
        let e = g.add_vertex(VertexData::new("E").with_label("Exit")).unwrap();
        assert_eq!(g.name(e), "Exit");
        assert_eq!(g.name(a), "A");
        g.connect("E", "A", 2.5).unwrap();
        assert_eq!(g.edge_cost(a, e), 2.5);
    }
}
