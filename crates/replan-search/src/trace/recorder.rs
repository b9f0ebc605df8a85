//! `StepTrace`: the append-only log.

use std::fmt;
use std::sync::Arc;

use replan_core::config::TraceConfig;
use replan_core::VertexId;

use super::sink::TraceSink;
use super::step::{Step, StepKind};

/// Frontier and visited sets attached to an entry.
pub type Snapshot = (Vec<VertexId>, Vec<VertexId>);

/// Append-only trace with sink fan-out.
pub struct StepTrace {
    steps: Vec<Step>,
    enabled: bool,
    sample_every: usize,
    snapshots: bool,
    per_vertex_seen: usize,
    sinks: Vec<Arc<dyn TraceSink>>,
}

impl StepTrace {
    pub fn new(config: &TraceConfig) -> Self {
        Self {
            steps: Vec::new(),
            enabled: config.effective_enabled(),
            sample_every: config.effective_sample_every(),
            snapshots: config.effective_snapshots(),
            per_vertex_seen: 0,
            sinks: Vec::new(),
        }
    }

    /// Whether anything is recorded at all. Callers skip building entries otherwise.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Register a sink. It receives entries recorded from now on.
    pub fn add_sink(&mut self, sink: Arc<dyn TraceSink>) {
        self.sinks.push(sink);
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Append `step`, attaching a snapshot when configured. Returns whether it was kept.
    ///
    /// `snapshot` is only evaluated for entries that are kept.
    pub fn record(&mut self, mut step: Step, snapshot: impl FnOnce() -> Snapshot) -> bool {
        if !self.enabled {
            return false;
        }
        if step.kind.is_per_vertex() {
            let seen = self.per_vertex_seen;
            self.per_vertex_seen += 1;
            if seen % self.sample_every != 0 {
                return false;
            }
        }
        if self.snapshots {
            let (frontier, visited) = snapshot();
            step.frontier = frontier;
            step.visited = visited;
        }
        step.index = self.steps.len();
        self.dispatch(&step);
        self.steps.push(step);
        true
    }

    /// All entries, in order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Entries appended at or after `cursor`.
    pub fn since(&self, cursor: usize) -> &[Step] {
        self.steps.get(cursor..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// Kinds of all entries, in order.
    pub fn kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(|s| s.kind).collect()
    }

    fn dispatch(&self, step: &Step) {
        for sink in &self.sinks {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                sink.on_step(step);
            }));
            if result.is_err() {
                tracing::warn!(step = step.index, kind = %step.kind, "trace sink panicked");
            }
        }
    }
}

impl fmt::Debug for StepTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepTrace")
            .field("steps", &self.steps.len())
            .field("enabled", &self.enabled)
            .field("sample_every", &self.sample_every)
            .field("snapshots", &self.snapshots)
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::StepCollector;

    fn v(n: u32) -> VertexId {
        VertexId::new(n)
    }

    fn snap() -> Snapshot {
        (vec![v(1)], vec![v(0)])
    }

    #[test]
    fn test_record_assigns_indices_and_snapshots() {
        let mut trace = StepTrace::new(&TraceConfig::default());
        assert!(trace.record(Step::new(StepKind::Init, "init"), snap));
        assert!(trace.record(Step::new(StepKind::Expand, "expand").with_vertex(v(0)), snap));
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.steps()[1].index, 1);
        assert_eq!(trace.steps()[1].frontier, vec![v(1)]);
        assert_eq!(trace.since(1).len(), 1);
        assert!(trace.since(5).is_empty());
    }

    #[test]
    fn test_sampling_only_drops_per_vertex_entries() {
        let config = TraceConfig {
            sample_every: Some(3),
            snapshots: Some(false),
            ..TraceConfig::default()
        };
        let mut trace = StepTrace::new(&config);
        trace.record(Step::new(StepKind::Init, "init"), snap);
        for i in 0..6 {
            trace.record(Step::new(StepKind::Expand, "e").with_vertex(v(i)), snap);
        }
        trace.record(Step::new(StepKind::Found, "found"), snap);
        assert_eq!(
            trace.kinds(),
            vec![StepKind::Init, StepKind::Expand, StepKind::Expand, StepKind::Found]
        );
        assert!(trace.steps()[0].frontier.is_empty());
    }

    #[test]
    fn test_disabled_trace_records_nothing() {
        let mut trace = StepTrace::new(&TraceConfig::disabled());
        assert!(!trace.record(Step::new(StepKind::Init, "init"), || {
            panic!("snapshot must not be taken")
        }));
        assert!(trace.is_empty());
    }

    struct Exploding;

    impl TraceSink for Exploding {
        fn on_step(&self, _: &Step) {
            panic!("boom");
        }
    }

    #[test]
    fn test_panicking_sink_does_not_block_others() {
        let collector = Arc::new(StepCollector::new());
        let mut trace = StepTrace::new(&TraceConfig::default());
        trace.add_sink(Arc::new(Exploding));
        trace.add_sink(collector.clone());
        trace.record(Step::new(StepKind::Init, "init"), snap);
        trace.record(Step::new(StepKind::Nopath, "none"), snap);
        assert_eq!(collector.len(), 2);
        assert_eq!(trace.len(), 2);
    }
}
