//! Trace entry types.

use std::fmt;

use serde::{Deserialize, Serialize};

use replan_core::types::collections::SmallVec2;
use replan_core::VertexId;

/// Kind of a trace entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Search state seeded.
    Init,
    /// A vertex became consistent with a lower cost.
    Expand,
    /// A vertex was raised to infinity and re-evaluated.
    Raise,
    /// An edge weight or blocked flag changed.
    EdgeChange,
    /// The start of a backward search moved.
    StartMoved,
    ReplanStart,
    ReplanFound,
    ReplanNopath,
    Found,
    Nopath,
    BudgetExhausted,
}

impl StepKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Expand => "expand",
            Self::Raise => "raise",
            Self::EdgeChange => "edge_change",
            Self::StartMoved => "start_moved",
            Self::ReplanStart => "replan_start",
            Self::ReplanFound => "replan_found",
            Self::ReplanNopath => "replan_nopath",
            Self::Found => "found",
            Self::Nopath => "nopath",
            Self::BudgetExhausted => "budget_exhausted",
        }
    }

    /// Per-vertex entries are subject to sampling; milestones never are.
    pub fn is_per_vertex(&self) -> bool {
        matches!(self, Self::Expand | Self::Raise)
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable trace entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Position in the full trace, assigned on record.
    pub index: usize,
    pub kind: StepKind,
    /// Vertices the entry is about (the expanded vertex, the edited edge endpoints, ...).
    pub vertices: SmallVec2<VertexId>,
    /// Queued vertices at record time, ascending.
    #[serde(default)]
    pub frontier: Vec<VertexId>,
    /// Vertices visited so far in the current drain, in visitation order.
    #[serde(default)]
    pub visited: Vec<VertexId>,
    /// Current solution, if the entry carries one.
    #[serde(default)]
    pub path: Vec<VertexId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    pub message: String,
}

impl Step {
    pub fn new(kind: StepKind, message: impl Into<String>) -> Self {
        Self {
            index: 0,
            kind,
            vertices: SmallVec2::new(),
            frontier: Vec::new(),
            visited: Vec::new(),
            path: Vec::new(),
            cost: None,
            message: message.into(),
        }
    }

    pub fn with_vertex(mut self, vertex: VertexId) -> Self {
        self.vertices.push(vertex);
        self
    }

    pub fn with_vertices(mut self, vertices: impl IntoIterator<Item = VertexId>) -> Self {
        self.vertices.extend(vertices);
        self
    }

    pub fn with_path(mut self, path: Vec<VertexId>, cost: f64) -> Self {
        self.path = path;
        self.cost = Some(cost);
        self
    }
}
