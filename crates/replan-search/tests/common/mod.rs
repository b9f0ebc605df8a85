//! Shared fixtures for replan-search integration tests.

#![allow(dead_code)]

use replan_core::config::TraceConfig;
use replan_core::VertexId;
use replan_search::reference;
use replan_search::{Graph, VertexData};

/// Install the workspace subscriber so engine logs show up under `REPLAN_LOG`.
pub fn init_logging() {
    replan_core::tracing::init_tracing();
}

/// The four-cycle A-B-C-D-A with unit weights.
pub fn four_cycle() -> (Graph, [VertexId; 4]) {
    let mut g = Graph::undirected();
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

/// Four-connected `width x height` grid with unit weights. Vertex `(x, y)` has key
/// `"x,y"` and id `y * width + x`.
pub fn grid(width: u32, height: u32) -> Graph {
    let mut g = Graph::undirected();
    for y in 0..height {
        for x in 0..width {
            g.add_vertex(VertexData::at(format!("{x},{y}"), f64::from(x), f64::from(y)))
                .unwrap();
        }
    }
    for y in 0..height {
        for x in 0..width {
            let id = cell(width, x, y);
            if x + 1 < width {
                g.add_edge(id, cell(width, x + 1, y), 1.0).unwrap();
            }
            if y + 1 < height {
                g.add_edge(id, cell(width, x, y + 1), 1.0).unwrap();
            }
        }
    }
    g
}

pub fn cell(width: u32, x: u32, y: u32) -> VertexId {
    VertexId::new(y * width + x)
}

/// Shortest-path cost according to the reference search.
pub fn oracle_cost(graph: &Graph, source: VertexId, target: VertexId) -> f64 {
    reference::dijkstra(graph, source, target, &TraceConfig::disabled())
        .unwrap()
        .cost
}

/// Whether every consecutive pair of `path` is a traversable edge.
pub fn path_is_traversable(graph: &Graph, path: &[VertexId]) -> bool {
    path.windows(2)
        .all(|w| graph.edge_cost(w[0], w[1]).is_finite())
}
