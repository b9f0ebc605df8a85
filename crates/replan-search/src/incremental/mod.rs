//! Incremental replanning: Lifelong Planning A* (forward) and D* Lite (backward).
//!
//! Both variants keep `g`/`rhs` values and a keyed queue alive across edge edits, so a
//! replan only touches the part of the graph an edit affects.

pub mod engine;
pub mod extract;
pub mod invalidation;
pub mod state;
pub mod types;

pub use engine::IncrementalSearch;
pub use extract::path_cost;
pub use state::{ConsistencyState, InvariantViolation, VertexState};
pub use types::{
    EnginePhase, ExtractedPath, ExtractionMethod, SearchDirection, SearchResult, SearchStatus,
};
