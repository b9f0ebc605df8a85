//! Step trace configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the step trace handed to the visualizer.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct TraceConfig {
    /// Record trace entries at all. Default: true.
    pub enabled: Option<bool>,
    /// Keep one of every N per-vertex entries (`expand`, `raise`). Milestone entries are
    /// always kept. Default: 1.
    pub sample_every: Option<usize>,
    /// Attach frontier/visited snapshots to each entry. Default: true.
    pub snapshots: Option<bool>,
}

impl TraceConfig {
    /// A config that records nothing; used by benchmarks and bulk replays.
    pub fn disabled() -> Self {
        Self {
            enabled: Some(false),
            ..Self::default()
        }
    }

    /// Returns whether tracing is enabled, defaulting to true.
    pub fn effective_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// Returns the sampling stride, defaulting to 1 (keep everything).
    pub fn effective_sample_every(&self) -> usize {
        self.sample_every.unwrap_or(1).max(1)
    }

    /// Returns whether snapshots are attached, defaulting to true.
    pub fn effective_snapshots(&self) -> bool {
        self.snapshots.unwrap_or(true)
    }
}
