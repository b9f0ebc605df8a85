//! Path reconstruction from consistency state.
//!
//! The primary method follows `best_link` pointers from the opposite endpoint to the
//! anchor. When those are stale, missing, or loop on a zero-cost plateau, it falls back
//! to a greedy descent over `g` with backtracking. The fallback is a heuristic repair:
//! it finds a path whenever one exists among traversable edges, but optimality is not
//! guaranteed.

use replan_core::constants::LINK_WALK_SLACK;
use replan_core::errors::SearchError;
use replan_core::types::collections::FxHashSet;
use replan_core::VertexId;
use tracing::debug;

use super::state::ConsistencyState;
use super::types::{ExtractedPath, ExtractionMethod, SearchDirection};
use crate::graph::Graph;

/// Endpoints and state an extraction reads.
pub(crate) struct PathQuery<'a> {
    pub graph: &'a Graph,
    pub state: &'a ConsistencyState,
    pub direction: SearchDirection,
    pub anchor: VertexId,
    pub opposite: VertexId,
}

/// Rebuild the current solution.
///
/// `Ok(None)` means the opposite endpoint is unreachable. An error means the state
/// claims a finite cost but neither method produced a path.
pub(crate) fn extract(query: &PathQuery<'_>) -> Result<Option<ExtractedPath>, SearchError> {
    let estimate = query.state.estimate(query.opposite);
    if estimate.is_infinite() {
        return Ok(None);
    }

    let (walk, method) = match walk_links(query) {
        Some(walk) => (walk, ExtractionMethod::Links),
        None => {
            debug!(opposite = %query.opposite, "best links stale, trying greedy descent");
            match walk_greedy(query) {
                Some(walk) => (walk, ExtractionMethod::Greedy),
                None => {
                    return Err(SearchError::ReconstructionFailed {
                        opposite: query.opposite,
                        estimate,
                    })
                }
            }
        }
    };

    let vertices = travel_order(walk, query.direction);
    let cost = path_cost(query.graph, &vertices);
    if cost.is_infinite() {
        return Err(SearchError::ReconstructionFailed {
            opposite: query.opposite,
            estimate,
        });
    }
    Ok(Some(ExtractedPath {
        vertices,
        cost,
        method,
    }))
}

/// Sum of edge costs along `path` in travel order.
pub fn path_cost(graph: &Graph, path: &[VertexId]) -> f64 {
    // fold from +0.0: an empty `sum` yields -0.0
    path.windows(2)
        .map(|w| graph.edge_cost(w[0], w[1]))
        .fold(0.0, |acc, c| acc + c)
}

fn step_limit(graph: &Graph) -> usize {
    graph.vertex_count() + LINK_WALK_SLACK
}

/// Follow best links from the opposite endpoint to the anchor.
fn walk_links(query: &PathQuery<'_>) -> Option<Vec<VertexId>> {
    let mut walk = vec![query.opposite];
    let mut seen: FxHashSet<VertexId> = FxHashSet::default();
    seen.insert(query.opposite);
    let mut current = query.opposite;

    for _ in 0..step_limit(query.graph) {
        if current == query.anchor {
            return Some(walk);
        }
        let next = query.state.best_link(current)?;
        let cost = query.direction.step_cost(query.graph, current, next);
        if !cost.is_finite() || !seen.insert(next) {
            return None;
        }
        walk.push(next);
        current = next;
    }
    (current == query.anchor).then_some(walk)
}

/// Descend over `g`: prefer the neighbor with the lowest `edge + g(neighbor)`, breaking
/// ties on how well the step matches `g(current)`. Dead ends are backtracked, so zero-cost
/// plateaus where best links point at each other do not strand the walk.
fn walk_greedy(query: &PathQuery<'_>) -> Option<Vec<VertexId>> {
    let mut seen: FxHashSet<VertexId> = FxHashSet::default();
    seen.insert(query.opposite);
    // Each frame holds a vertex and its untried candidates, best last.
    let mut stack = vec![(query.opposite, ranked_candidates(query, query.opposite, &seen))];
    let budget = step_limit(query.graph).saturating_mul(query.graph.vertex_count().max(1));

    for _ in 0..budget {
        let (current, candidates) = stack.last_mut()?;
        if *current == query.anchor {
            return Some(stack.into_iter().map(|(v, _)| v).collect());
        }
        match candidates.pop() {
            Some(next) if seen.insert(next) => {
                let ranked = ranked_candidates(query, next, &seen);
                stack.push((next, ranked));
            }
            Some(_) => {}
            None => {
                stack.pop();
            }
        }
    }
    None
}

/// Traversable lookahead neighbors of `current` not yet on the walk, best last.
fn ranked_candidates(
    query: &PathQuery<'_>,
    current: VertexId,
    seen: &FxHashSet<VertexId>,
) -> Vec<VertexId> {
    let here = query.state.estimate(current);
    let mut ranked: Vec<(f64, f64, VertexId)> = query
        .direction
        .lookahead(query.graph, current)
        .into_iter()
        .filter(|nb| !seen.contains(nb))
        .filter_map(|nb| {
            let step = query.direction.step_cost(query.graph, current, nb);
            let total = step + query.state.estimate(nb);
            total.is_finite().then(|| (total, (here - total).abs(), nb))
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.0.total_cmp(&a.0)
            .then_with(|| b.1.total_cmp(&a.1))
            .then_with(|| b.2.cmp(&a.2))
    });
    ranked.into_iter().map(|(_, _, nb)| nb).collect()
}

/// Walks run from the opposite endpoint to the anchor; forward searches are anchored at
/// the travel start, so their walk is reversed.
fn travel_order(mut walk: Vec<VertexId>, direction: SearchDirection) -> Vec<VertexId> {
    if direction == SearchDirection::Forward {
        walk.reverse();
    }
    walk
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::VertexData;

    fn line() -> (Graph, [VertexId; 3]) {
        let mut g = Graph::undirected();
        let a = g.add_vertex(VertexData::new("a")).unwrap();
        let b = g.add_vertex(VertexData::new("b")).unwrap();
        let c = g.add_vertex(VertexData::new("c")).unwrap();
        g.add_edge(a, b, 2.0).unwrap();
        g.add_edge(b, c, 3.0).unwrap();
        (g, [a, b, c])
    }

    fn settle(state: &mut ConsistencyState, v: VertexId, cost: f64, link: Option<VertexId>) {
        state.set_rhs(v, cost, link);
        state.set_g(v, cost);
    }

    #[test]
    fn test_links_walk_reversed_for_forward_search() {
        let (g, [a, b, c]) = line();
        let mut state = ConsistencyState::new();
        settle(&mut state, a, 0.0, None);
        settle(&mut state, b, 2.0, Some(a));
        settle(&mut state, c, 5.0, Some(b));
        let query = PathQuery {
            graph: &g,
            state: &state,
            direction: SearchDirection::Forward,
            anchor: a,
            opposite: c,
        };
        let path = extract(&query).unwrap().unwrap();
        assert_eq!(path.vertices, vec![a, b, c]);
        assert_eq!(path.cost, 5.0);
        assert_eq!(path.method, ExtractionMethod::Links);
    }

    #[test]
    fn test_greedy_fallback_when_links_missing() {
        let (g, [a, b, c]) = line();
        let mut state = ConsistencyState::new();
        settle(&mut state, c, 0.0, None);
        settle(&mut state, b, 3.0, None);
        settle(&mut state, a, 5.0, None);
        let query = PathQuery {
            graph: &g,
            state: &state,
            direction: SearchDirection::Backward,
            anchor: c,
            opposite: a,
        };
        let path = extract(&query).unwrap().unwrap();
        assert_eq!(path.vertices, vec![a, b, c]);
        assert_eq!(path.method, ExtractionMethod::Greedy);
    }

    #[test]
    fn test_zero_cost_link_loop_is_repaired() {
        let mut g = Graph::undirected();
        let a = g.add_vertex(VertexData::new("a")).unwrap();
        let b = g.add_vertex(VertexData::new("b")).unwrap();
        let c = g.add_vertex(VertexData::new("c")).unwrap();
        g.add_edge(a, b, 0.0).unwrap();
        g.add_edge(b, c, 0.0).unwrap();
        let mut state = ConsistencyState::new();
        settle(&mut state, a, 0.0, None);
        settle(&mut state, b, 0.0, Some(c));
        settle(&mut state, c, 0.0, Some(b));
        let query = PathQuery {
            graph: &g,
            state: &state,
            direction: SearchDirection::Forward,
            anchor: a,
            opposite: c,
        };
        let path = extract(&query).unwrap().unwrap();
        assert_eq!(path.vertices, vec![a, b, c]);
        assert_eq!(path.cost, 0.0);
        assert_eq!(path.method, ExtractionMethod::Greedy);
    }

    #[test]
    fn test_unreachable_and_failed_reconstruction() {
        let (mut g, [a, b, c]) = line();
        let state = ConsistencyState::new();
        let query = PathQuery {
            graph: &g,
            state: &state,
            direction: SearchDirection::Forward,
            anchor: a,
            opposite: c,
        };
        assert!(extract(&query).unwrap().is_none());

        // Finite estimate but the only edge is blocked: both methods fail.
        g.update_edge(b, c, 3.0, true).unwrap();
        let mut state = ConsistencyState::new();
        settle(&mut state, a, 0.0, None);
        settle(&mut state, b, 2.0, Some(a));
        settle(&mut state, c, 5.0, Some(b));
        let query = PathQuery {
            graph: &g,
            state: &state,
            direction: SearchDirection::Forward,
            anchor: a,
            opposite: c,
        };
        assert!(matches!(
            extract(&query),
            Err(SearchError::ReconstructionFailed { .. })
        ));
    }
}
