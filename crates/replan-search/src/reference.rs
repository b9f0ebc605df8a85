//! Dijkstra reference search.
//!
//! Non-incremental, recomputes from scratch on every call. Produces the same result and
//! trace contract as the incremental engines and serves as the oracle they are checked
//! against.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use replan_core::config::TraceConfig;
use replan_core::errors::SearchError;
use replan_core::types::collections::{FxHashMap, FxHashSet};
use replan_core::VertexId;
use tracing::debug;

use crate::graph::Graph;
use crate::incremental::{path_cost, SearchResult, SearchStatus};
use crate::trace::{Step, StepKind, StepTrace};

/// Shortest path from `source` to `target`, honoring directedness and blocked edges.
pub fn dijkstra(
    graph: &Graph,
    source: VertexId,
    target: VertexId,
    trace_config: &TraceConfig,
) -> Result<SearchResult, SearchError> {
    graph.ensure_vertex(source)?;
    graph.ensure_vertex(target)?;

    let mut trace = StepTrace::new(trace_config);
    let mut dist: FxHashMap<VertexId, f64> = FxHashMap::default();
    let mut prev: FxHashMap<VertexId, VertexId> = FxHashMap::default();
    let mut settled: FxHashSet<VertexId> = FxHashSet::default();
    let mut visited_order = Vec::new();
    let mut heap = BinaryHeap::new();
    let mut iterations = 0;

    dist.insert(source, 0.0);
    heap.push(DijkstraState {
        cost: 0.0,
        node: source,
    });
    trace.record(
        Step::new(
            StepKind::Init,
            format!("Dijkstra from {}", graph.name(source)),
        )
        .with_vertices([source, target]),
        || (vec![source], Vec::new()),
    );

    let mut reached = false;
    while let Some(DijkstraState { cost, node }) = heap.pop() {
        iterations += 1;
        if !settled.insert(node) {
            continue;
        }
        visited_order.push(node);
        if trace.is_enabled() {
            let step = Step::new(
                StepKind::Expand,
                format!("Expand {} (g = {cost})", graph.name(node)),
            )
            .with_vertex(node);
            trace.record(step, || (frontier(&heap, &settled), visited_order.clone()));
        }
        if node == target {
            reached = true;
            break;
        }

        for next in graph.successors(node) {
            let next_cost = cost + graph.edge_cost(node, next);
            if !next_cost.is_finite() {
                continue;
            }
            let is_better = dist.get(&next).map(|&d| next_cost < d).unwrap_or(true);
            if is_better {
                dist.insert(next, next_cost);
                prev.insert(next, node);
                heap.push(DijkstraState {
                    cost: next_cost,
                    node: next,
                });
            }
        }
    }

    let path = reached.then(|| {
        let mut path = vec![target];
        let mut current = target;
        while let Some(&p) = prev.get(&current) {
            path.push(p);
            current = p;
        }
        path.reverse();
        path
    });

    let (cost, status) = match &path {
        Some(p) => (path_cost(graph, p), SearchStatus::Found),
        None => (f64::INFINITY, SearchStatus::NoPath),
    };
    let closing = match &path {
        Some(p) => Step::new(StepKind::Found, format!("Path found with cost {cost}"))
            .with_vertices([source, target])
            .with_path(p.clone(), cost),
        None => Step::new(StepKind::Nopath, format!("No path to {}", graph.name(target)))
            .with_vertices([source, target]),
    };
    trace.record(closing, || (frontier(&heap, &settled), visited_order.clone()));
    debug!(iterations, visited = visited_order.len(), cost, "dijkstra finished");

    Ok(SearchResult {
        found: path.is_some(),
        path,
        cost,
        status,
        visited_order,
        steps: trace.steps().to_vec(),
        iterations_used: iterations,
        iteration_budget: iterations,
    })
}

/// Unsettled vertices still in the heap, ascending.
fn frontier(heap: &BinaryHeap<DijkstraState>, settled: &FxHashSet<VertexId>) -> Vec<VertexId> {
    let mut out: Vec<VertexId> = heap
        .iter()
        .map(|s| s.node)
        .filter(|v| !settled.contains(v))
        .collect();
    out.sort_unstable();
    out.dedup();
    out
}

#[derive(Debug, Clone, Copy)]
struct DijkstraState {
    cost: f64,
    node: VertexId,
}

impl PartialEq for DijkstraState {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DijkstraState {}

impl PartialOrd for DijkstraState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DijkstraState {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for min-heap; ties on the smaller vertex id.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}
