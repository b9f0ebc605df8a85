//! # replan-search
//!
//! Incremental shortest-path search over a mutable weighted graph.
//!
//! - [`graph`]: the searched graph, backed by `petgraph::StableGraph`, plus its JSON form
//! - [`heuristic`]: distance estimates, resolved once per engine
//! - [`queue`]: keyed priority queue with arbitrary re-keying and removal
//! - [`incremental`]: LPA* (forward) and D* Lite (backward) engines
//! - [`trace`]: the step trace handed to the visualizer
//! - [`reference`]: Dijkstra, the from-scratch oracle

pub mod graph;
pub mod heuristic;
pub mod incremental;
pub mod queue;
pub mod reference;
pub mod trace;

pub use graph::{Graph, GraphDocument, VertexData};
pub use heuristic::HeuristicKind;
pub use incremental::{IncrementalSearch, SearchDirection, SearchResult, SearchStatus};
pub use trace::{Step, StepKind, StepTrace, TraceSink};
