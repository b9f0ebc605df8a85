//! `IncrementalSearch`: LPA* and D* Lite over a shared drain loop.
//!
//! The two variants differ only in which endpoint anchors the search and which neighbor
//! set feeds the lookahead; [`SearchDirection`] carries that difference.

use std::sync::Arc;

use replan_core::config::{ReplanConfig, SearchConfig};
use replan_core::errors::SearchError;
use replan_core::types::collections::FxHashSet;
use replan_core::VertexId;
use tracing::{debug, info, warn};

use super::extract::{self, PathQuery};
use super::invalidation;
use super::state::{ConsistencyState, InvariantViolation};
use super::types::{EnginePhase, ExtractedPath, SearchDirection, SearchResult, SearchStatus};
use crate::graph::Graph;
use crate::heuristic::{HeuristicFn, HeuristicKind};
use crate::queue::{Key, KeyedQueue};
use crate::trace::recorder::Snapshot;
use crate::trace::{Step, StepKind, StepTrace, TraceSink};

/// Incremental shortest-path search over a mutable graph.
///
/// The engine borrows the graph mutably for its whole life: edge edits go through
/// [`update_edge_cost`](Self::update_edge_cost), which keeps the consistency state in
/// sync with the graph.
///
/// Invariants between public calls:
/// * `rhs(v)` equals the one-step lookahead of `v` (0 for the anchor).
/// * The queue holds exactly the locally inconsistent vertices.
pub struct IncrementalSearch<'g> {
    graph: &'g mut Graph,
    direction: SearchDirection,
    anchor: VertexId,
    opposite: VertexId,
    heuristic_kind: HeuristicKind,
    heuristic: HeuristicFn,
    search_config: SearchConfig,
    state: ConsistencyState,
    queue: KeyedQueue<VertexId>,
    key_modifier: f64,
    phase: EnginePhase,
    trace: StepTrace,
    /// First index of the trace not yet returned in a result.
    step_cursor: usize,
    visited_order: Vec<VertexId>,
    visited: FxHashSet<VertexId>,
}

struct DrainOutcome {
    converged: bool,
    iterations: usize,
    budget: usize,
}

impl<'g> IncrementalSearch<'g> {
    /// Build an engine anchored at `anchor`, solving for `opposite`.
    ///
    /// Rejects a config that fails [`ReplanConfig::validate`] before touching anything.
    pub fn new(
        graph: &'g mut Graph,
        direction: SearchDirection,
        anchor: VertexId,
        opposite: VertexId,
        heuristic: HeuristicKind,
        config: &ReplanConfig,
    ) -> Result<Self, SearchError> {
        ReplanConfig::validate(config)?;
        graph.ensure_vertex(anchor)?;
        graph.ensure_vertex(opposite)?;
        Ok(Self {
            graph,
            direction,
            anchor,
            opposite,
            heuristic_kind: heuristic,
            heuristic: heuristic.resolve(),
            search_config: config.search.clone(),
            state: ConsistencyState::new(),
            queue: KeyedQueue::new(),
            key_modifier: 0.0,
            phase: EnginePhase::Uninitialized,
            trace: StepTrace::new(&config.trace),
            step_cursor: 0,
            visited_order: Vec::new(),
            visited: FxHashSet::default(),
        })
    }

    /// Forward search from `source` to `target` (Lifelong Planning A*).
    pub fn lifelong(
        graph: &'g mut Graph,
        source: VertexId,
        target: VertexId,
        heuristic: HeuristicKind,
        config: &ReplanConfig,
    ) -> Result<Self, SearchError> {
        Self::new(graph, SearchDirection::Forward, source, target, heuristic, config)
    }

    /// Backward search from `goal` for a moving `start` (D* Lite).
    pub fn dynamic(
        graph: &'g mut Graph,
        start: VertexId,
        goal: VertexId,
        heuristic: HeuristicKind,
        config: &ReplanConfig,
    ) -> Result<Self, SearchError> {
        Self::new(graph, SearchDirection::Backward, goal, start, heuristic, config)
    }

    // ---- Lifecycle ----

    /// Reset all state and seed the queue with the anchor.
    pub fn initialize(&mut self) {
        self.phase = EnginePhase::Initializing;
        self.state.clear();
        self.queue.clear();
        self.key_modifier = 0.0;
        self.visited.clear();
        self.visited_order.clear();

        self.state.set_rhs(self.anchor, 0.0, None);
        let key = self.key(self.anchor);
        self.queue.push(self.anchor, key);

        if self.trace.is_enabled() {
            let step = Step::new(
                StepKind::Init,
                format!(
                    "Initialize {} search anchored at {}",
                    self.direction,
                    self.graph.name(self.anchor)
                ),
            )
            .with_vertices([self.anchor, self.opposite]);
            self.emit(step);
        }
        debug!(
            direction = %self.direction,
            anchor = %self.anchor,
            opposite = %self.opposite,
            heuristic = %self.heuristic_kind,
            "search initialized"
        );
    }

    /// Initialize from scratch and drain to convergence.
    pub fn run(&mut self) -> Result<SearchResult, SearchError> {
        self.initialize();
        self.compute_shortest_path()
    }

    /// Drain the queue until the opposite endpoint is settled.
    ///
    /// Initializes first if the engine was never initialized. Calling it again without
    /// intervening edits does no work.
    pub fn compute_shortest_path(&mut self) -> Result<SearchResult, SearchError> {
        if self.phase == EnginePhase::Uninitialized {
            self.initialize();
        }
        self.phase = EnginePhase::Settling;
        let outcome = self.drain();
        Ok(self.finish(outcome, false))
    }

    /// Resume the drain after edits, reusing all prior state.
    pub fn replan(&mut self) -> Result<SearchResult, SearchError> {
        if self.phase == EnginePhase::Uninitialized {
            self.initialize();
        }
        self.phase = EnginePhase::Replanning;
        if self.trace.is_enabled() {
            // Empty path: the previous solution may no longer be valid.
            let step = Step::new(StepKind::ReplanStart, "Replanning after graph changes")
                .with_vertices([self.anchor, self.opposite]);
            self.emit(step);
        }
        let outcome = self.drain();
        Ok(self.finish(outcome, true))
    }

    // ---- Mutation ----

    /// Change the weight and blocked flag of the edge `from -> to`.
    ///
    /// Input is validated before anything changes. Affected vertices are re-evaluated
    /// here; the new solution is computed by the next [`replan`](Self::replan).
    pub fn update_edge_cost(
        &mut self,
        from: VertexId,
        to: VertexId,
        weight: f64,
        blocked: bool,
    ) -> Result<(), SearchError> {
        let previous = self.graph.update_edge(from, to, weight, blocked)?;

        debug!(
            from = %from,
            to = %to,
            old_weight = previous.weight,
            weight,
            was_blocked = previous.blocked,
            blocked,
            "edge updated"
        );
        if self.trace.is_enabled() {
            let mut message = format!(
                "Edge {}-{}: {} -> {}",
                self.graph.name(from),
                self.graph.name(to),
                previous.weight,
                weight
            );
            if blocked != previous.blocked {
                message.push_str(if blocked { " (blocked)" } else { " (unblocked)" });
            }
            let step = Step::new(StepKind::EdgeChange, message).with_vertices([from, to]);
            self.emit(step);
        }

        if self.phase == EnginePhase::Uninitialized {
            return Ok(());
        }

        let invalidated = if blocked {
            invalidation::dependent_subtree(self.graph, &self.state, self.direction, from, to)
        } else {
            Vec::new()
        };
        for &v in &invalidated {
            self.state.invalidate(v);
        }
        if !invalidated.is_empty() {
            debug!(count = invalidated.len(), "invalidated best-link subtree");
        }

        let mut affected: Vec<VertexId> = invalidated.clone();
        for &v in &invalidated {
            affected.extend(self.direction.dependents(self.graph, v));
        }
        for endpoint in [from, to] {
            affected.push(endpoint);
            affected.extend(self.graph.neighbors(endpoint));
        }
        affected.sort_unstable();
        affected.dedup();
        for v in affected {
            self.update_vertex(v);
        }
        Ok(())
    }

    /// Move the travel start of a backward search to `new_start`.
    ///
    /// Queued keys stay valid through the key modifier; call [`replan`](Self::replan)
    /// afterwards.
    pub fn move_start(&mut self, new_start: VertexId) -> Result<(), SearchError> {
        if self.direction != SearchDirection::Backward {
            return Err(SearchError::UnsupportedOperation {
                operation: "move_start",
                direction: self.direction.as_str(),
            });
        }
        self.graph.ensure_vertex(new_start)?;
        let old_start = self.opposite;
        self.key_modifier += self.h_between(old_start, new_start);
        self.opposite = new_start;

        debug!(
            from = %old_start,
            to = %new_start,
            key_modifier = self.key_modifier,
            "start moved"
        );
        if self.trace.is_enabled() {
            let step = Step::new(
                StepKind::StartMoved,
                format!(
                    "Start moved {} -> {}",
                    self.graph.name(old_start),
                    self.graph.name(new_start)
                ),
            )
            .with_vertices([old_start, new_start]);
            self.emit(step);
        }
        Ok(())
    }

    /// Rebuild the current solution in travel order.
    ///
    /// `Ok(None)` when the opposite endpoint is unreachable.
    pub fn extract_path(&self) -> Result<Option<ExtractedPath>, SearchError> {
        extract::extract(&PathQuery {
            graph: self.graph,
            state: &self.state,
            direction: self.direction,
            anchor: self.anchor,
            opposite: self.opposite,
        })
    }

    /// Check the lookahead and queue invariants over every vertex of the graph.
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();
        for v in self.graph.vertices() {
            let stored = self.state.rhs(v);
            let expected = if v == self.anchor {
                0.0
            } else {
                self.lookahead(v).0
            };
            if !same_cost(stored, expected) {
                violations.push(InvariantViolation::StaleRhs {
                    vertex: v,
                    stored,
                    expected,
                });
            }
            let queued = self.queue.contains(v);
            let consistent = self.state.is_consistent(v);
            if !consistent && !queued {
                violations.push(InvariantViolation::NotQueued { vertex: v });
            } else if consistent && queued {
                violations.push(InvariantViolation::SpuriouslyQueued { vertex: v });
            }
        }
        for violation in &violations {
            warn!(%violation, "invariant violated");
        }
        violations
    }

    // ---- Accessors ----

    pub fn g(&self, v: VertexId) -> f64 {
        self.state.g(v)
    }

    pub fn rhs(&self, v: VertexId) -> f64 {
        self.state.rhs(v)
    }

    pub fn best_link(&self, v: VertexId) -> Option<VertexId> {
        self.state.best_link(v)
    }

    pub fn is_consistent(&self, v: VertexId) -> bool {
        self.state.is_consistent(v)
    }

    pub fn key_modifier(&self) -> f64 {
        self.key_modifier
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn direction(&self) -> SearchDirection {
        self.direction
    }

    pub fn anchor(&self) -> VertexId {
        self.anchor
    }

    pub fn opposite(&self) -> VertexId {
        self.opposite
    }

    pub fn heuristic(&self) -> HeuristicKind {
        self.heuristic_kind
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Queue key of `v` if queued.
    pub fn queued_key(&self, v: VertexId) -> Option<Key> {
        self.queue.key_of(v)
    }

    /// The full trace since construction.
    pub fn trace(&self) -> &StepTrace {
        &self.trace
    }

    pub fn graph(&self) -> &Graph {
        self.graph
    }

    /// Forward every future trace entry to `sink`.
    pub fn add_sink(&mut self, sink: Arc<dyn TraceSink>) {
        self.trace.add_sink(sink);
    }

    /// Iteration budget of one drain for the current graph size.
    pub fn iteration_budget(&self) -> usize {
        self.search_config.iteration_budget(self.graph.vertex_count())
    }

    // ---- Internals ----

    fn h(&self, v: VertexId) -> f64 {
        match self.direction {
            SearchDirection::Forward => self.h_between(v, self.opposite),
            SearchDirection::Backward => self.h_between(self.opposite, v),
        }
    }

    fn h_between(&self, a: VertexId, b: VertexId) -> f64 {
        match (self.graph.vertex(a), self.graph.vertex(b)) {
            (Some(va), Some(vb)) => (self.heuristic)(va, vb),
            _ => 0.0,
        }
    }

    fn key(&self, v: VertexId) -> Key {
        self.state.get(v).key(self.h(v), self.key_modifier)
    }

    /// Minimum of `step_cost + g(nb)` over the lookahead set, with the arg-min.
    ///
    /// Neighbors come in ascending order and only a strictly smaller total replaces the
    /// running best, so ties go to the lowest id.
    fn lookahead(&self, u: VertexId) -> (f64, Option<VertexId>) {
        let mut best = (f64::INFINITY, None);
        for nb in self.direction.lookahead(self.graph, u) {
            if nb == u {
                continue;
            }
            let total = self.direction.step_cost(self.graph, u, nb) + self.state.g(nb);
            if total < best.0 {
                best = (total, Some(nb));
            }
        }
        best
    }

    fn update_vertex(&mut self, u: VertexId) {
        if u != self.anchor {
            let (rhs, link) = self.lookahead(u);
            self.state.set_rhs(u, rhs, link);
        }
        self.queue.remove(u);
        if !self.state.is_consistent(u) {
            let key = self.key(u);
            self.queue.push(u, key);
        }
    }

    fn drain(&mut self) -> DrainOutcome {
        let budget = self.iteration_budget();
        let mut iterations = 0;
        self.visited.clear();
        self.visited_order.clear();

        loop {
            if self.queue.is_empty() {
                break;
            }
            let target_key = self.key(self.opposite);
            if self.queue.peek_key() >= target_key && self.state.is_consistent(self.opposite) {
                break;
            }
            if iterations >= budget {
                warn!(
                    iterations,
                    budget,
                    queue_len = self.queue.len(),
                    "iteration budget exhausted before convergence"
                );
                return DrainOutcome {
                    converged: false,
                    iterations,
                    budget,
                };
            }
            let Some((u, k_old)) = self.queue.pop() else {
                break;
            };
            iterations += 1;

            let k_new = self.key(u);
            if k_old < k_new {
                self.queue.push(u, k_new);
                continue;
            }
            if self.visited.insert(u) {
                self.visited_order.push(u);
            }

            let s = self.state.get(u);
            if s.g > s.rhs {
                self.state.set_g(u, s.rhs);
                if self.trace.is_enabled() {
                    let step = Step::new(
                        StepKind::Expand,
                        format!("Expand {} (g = {})", self.graph.name(u), s.rhs),
                    )
                    .with_vertex(u);
                    self.emit(step);
                }
            } else {
                self.state.set_g(u, f64::INFINITY);
                if self.trace.is_enabled() {
                    let step = Step::new(
                        StepKind::Raise,
                        format!("Raise {} (g was {})", self.graph.name(u), s.g),
                    )
                    .with_vertex(u);
                    self.emit(step);
                }
                self.update_vertex(u);
            }
            for d in self.direction.dependents(self.graph, u) {
                self.update_vertex(d);
            }
        }

        DrainOutcome {
            converged: true,
            iterations,
            budget,
        }
    }

    /// Turn a drain outcome into a result, recording the closing trace entry.
    fn finish(&mut self, outcome: DrainOutcome, replanning: bool) -> SearchResult {
        let (path, status) = if !outcome.converged {
            self.record_closing(StepKind::BudgetExhausted, None, &outcome);
            (None, SearchStatus::BudgetExhausted)
        } else {
            self.phase = EnginePhase::Consistent;
            match self.extract_path() {
                Ok(Some(path)) => {
                    let kind = if replanning {
                        StepKind::ReplanFound
                    } else {
                        StepKind::Found
                    };
                    self.record_closing(kind, Some(&path), &outcome);
                    (Some(path), SearchStatus::Found)
                }
                Ok(None) => {
                    let kind = if replanning {
                        StepKind::ReplanNopath
                    } else {
                        StepKind::Nopath
                    };
                    self.record_closing(kind, None, &outcome);
                    (None, SearchStatus::NoPath)
                }
                Err(err) => {
                    warn!(error = %err, "invariant violation: path reconstruction failed");
                    let kind = if replanning {
                        StepKind::ReplanNopath
                    } else {
                        StepKind::Nopath
                    };
                    self.record_closing(kind, None, &outcome);
                    (None, SearchStatus::ReconstructionFailed)
                }
            }
        };

        let steps = self.trace.since(self.step_cursor).to_vec();
        self.step_cursor = self.trace.len();

        let cost = path.as_ref().map_or(f64::INFINITY, |p| p.cost);
        info!(
            direction = %self.direction,
            status = ?status,
            iterations = outcome.iterations,
            visited = self.visited_order.len(),
            cost,
            "search finished"
        );

        SearchResult {
            found: status == SearchStatus::Found,
            path: path.map(|p| p.vertices),
            cost,
            status,
            visited_order: self.visited_order.clone(),
            steps,
            iterations_used: outcome.iterations,
            iteration_budget: outcome.budget,
        }
    }

    fn record_closing(
        &mut self,
        kind: StepKind,
        path: Option<&ExtractedPath>,
        outcome: &DrainOutcome,
    ) {
        if !self.trace.is_enabled() {
            return;
        }
        let target = self.graph.name(self.opposite);
        let message = match (kind, path) {
            (StepKind::BudgetExhausted, _) => format!(
                "Stopped after {} iterations (budget {})",
                outcome.iterations, outcome.budget
            ),
            (_, Some(p)) => format!(
                "Path found with cost {} ({} vertices, {} iterations)",
                p.cost,
                p.vertices.len(),
                outcome.iterations
            ),
            (_, None) => format!("No path to {target}"),
        };
        let mut step = Step::new(kind, message).with_vertices([self.anchor, self.opposite]);
        if let Some(p) = path {
            step = step.with_path(p.vertices.clone(), p.cost);
        }
        self.emit(step);
    }

    fn emit(&mut self, step: Step) {
        let (queue, visited) = (&self.queue, &self.visited_order);
        self.trace.record(step, || snapshot(queue, visited));
    }
}

fn snapshot(queue: &KeyedQueue<VertexId>, visited: &[VertexId]) -> Snapshot {
    let mut frontier: Vec<VertexId> = queue.vertices().collect();
    frontier.sort_unstable();
    (frontier, visited.to_vec())
}

fn same_cost(a: f64, b: f64) -> bool {
    if a.is_infinite() || b.is_infinite() {
        return a == b;
    }
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}
