//! Engine-facing types: direction, lifecycle phase, and the result contract.

use std::fmt;

use serde::{Deserialize, Serialize};

use replan_core::errors::SearchError;
use replan_core::types::collections::SmallVec8;
use replan_core::VertexId;

use crate::graph::Graph;
use crate::trace::Step;

/// Which endpoint the search is anchored at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchDirection {
    /// Anchored at the source; values are costs from the source (LPA*).
    Forward,
    /// Anchored at the goal; values are costs to the goal (D* Lite).
    Backward,
}

impl SearchDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
        }
    }

    /// Neighbors whose `g` feeds the lookahead of `u`.
    pub(crate) fn lookahead(self, graph: &Graph, u: VertexId) -> SmallVec8<VertexId> {
        match self {
            Self::Forward => graph.predecessors(u),
            Self::Backward => graph.successors(u),
        }
    }

    /// Neighbors whose lookahead reads `g(u)`.
    pub(crate) fn dependents(self, graph: &Graph, u: VertexId) -> SmallVec8<VertexId> {
        match self {
            Self::Forward => graph.successors(u),
            Self::Backward => graph.predecessors(u),
        }
    }

    /// Cost of the edge between `u` and its lookahead neighbor `nb`, in travel direction.
    pub(crate) fn step_cost(self, graph: &Graph, u: VertexId, nb: VertexId) -> f64 {
        match self {
            Self::Forward => graph.edge_cost(nb, u),
            Self::Backward => graph.edge_cost(u, nb),
        }
    }
}

impl fmt::Display for SearchDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnginePhase {
    Uninitialized,
    Initializing,
    Settling,
    Consistent,
    Replanning,
}

/// Outcome of a drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Found,
    /// The opposite endpoint is provably unreachable.
    NoPath,
    /// The drain stopped at the iteration budget before converging.
    BudgetExhausted,
    /// State claims a finite cost but no path could be rebuilt.
    ReconstructionFailed,
}

/// How a path was rebuilt from the consistency state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Followed `best_link` pointers.
    Links,
    /// Greedy descent over `g`, used when the links were stale.
    Greedy,
}

/// A path rebuilt by the extractor, ordered from the travel start to the travel end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedPath {
    pub vertices: Vec<VertexId>,
    /// Sum of traversed edge weights.
    pub cost: f64,
    pub method: ExtractionMethod,
}

/// Result of `run`, `compute_shortest_path` or `replan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub path: Option<Vec<VertexId>>,
    /// Path cost; infinite when no path was returned.
    pub cost: f64,
    pub found: bool,
    pub status: SearchStatus,
    /// Vertices popped for processing during this call, first visit only.
    pub visited_order: Vec<VertexId>,
    /// Trace entries appended since the previous result.
    pub steps: Vec<Step>,
    pub iterations_used: usize,
    /// Budget the drain ran under.
    pub iteration_budget: usize,
}

impl SearchResult {
    /// Turn a budget-exhausted result into an error; every other status passes through.
    pub fn ensure_converged(self) -> Result<Self, SearchError> {
        if self.status == SearchStatus::BudgetExhausted {
            return Err(SearchError::IterationBudgetExceeded {
                iterations: self.iterations_used,
                budget: self.iteration_budget,
            });
        }
        Ok(self)
    }

    /// Number of edges on the returned path.
    pub fn hop_count(&self) -> usize {
        self.path.as_ref().map_or(0, |p| p.len().saturating_sub(1))
    }
}
