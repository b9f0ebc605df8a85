//! Blockage invalidation.
//!
//! When an edge is blocked, every vertex whose best link crosses it loses its solution,
//! and so does every vertex that reaches one of those through best links. The walk
//! covers the whole best-link subtree hanging off the blocked edge.

use std::collections::VecDeque;

use replan_core::types::collections::FxHashSet;
use replan_core::VertexId;

use super::state::ConsistencyState;
use super::types::SearchDirection;
use crate::graph::Graph;

/// Vertices whose solution depends on the edge `from -> to` (and `to -> from` when the
/// graph is undirected), ascending.
pub(crate) fn dependent_subtree(
    graph: &Graph,
    state: &ConsistencyState,
    direction: SearchDirection,
    from: VertexId,
    to: VertexId,
) -> Vec<VertexId> {
    let mut arcs = vec![(from, to)];
    if !graph.is_directed() && from != to {
        arcs.push((to, from));
    }

    let mut seen: FxHashSet<VertexId> = FxHashSet::default();
    let mut frontier = VecDeque::new();
    for (tail, head) in arcs {
        let (child, parent) = match direction {
            SearchDirection::Forward => (head, tail),
            SearchDirection::Backward => (tail, head),
        };
        if state.best_link(child) == Some(parent) && seen.insert(child) {
            frontier.push_back(child);
        }
    }

    while let Some(x) = frontier.pop_front() {
        for d in direction.dependents(graph, x) {
            if state.best_link(d) == Some(x) && seen.insert(d) {
                frontier.push_back(d);
            }
        }
    }

    let mut out: Vec<VertexId> = seen.into_iter().collect();
    out.sort_unstable();
    out
}
