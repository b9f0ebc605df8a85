//! Step trace consumed by the visualizer.
//!
//! Entries are appended in order and never mutated afterwards. Every recorded entry is
//! also forwarded to the registered [`TraceSink`]s.

pub mod recorder;
pub mod sink;
pub mod step;

pub use recorder::StepTrace;
pub use sink::{StepCollector, TraceSink};
pub use step::{Step, StepKind};
