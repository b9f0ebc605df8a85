//! Per-vertex consistency state: `g`, `rhs` and the best link.

use std::fmt;

use replan_core::types::collections::FxHashMap;
use replan_core::VertexId;

use crate::queue::Key;

/// Values of one vertex. Vertices never touched read as `{∞, ∞, none}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexState {
    /// Best known cost.
    pub g: f64,
    /// One-step lookahead cost.
    pub rhs: f64,
    /// Neighbor that achieved `rhs`.
    pub best_link: Option<VertexId>,
}

impl Default for VertexState {
    fn default() -> Self {
        Self {
            g: f64::INFINITY,
            rhs: f64::INFINITY,
            best_link: None,
        }
    }
}

impl VertexState {
    pub fn is_consistent(&self) -> bool {
        self.g == self.rhs
    }

    /// `min(g, rhs)`, the second key component.
    pub fn settled_cost(&self) -> f64 {
        self.g.min(self.rhs)
    }

    /// Queue key under heuristic value `h` and key modifier `km`.
    pub fn key(&self, h: f64, km: f64) -> Key {
        let m = self.settled_cost();
        Key::new(m + h + km, m)
    }
}

/// Sparse map of vertex states for one search direction.
#[derive(Debug, Clone, Default)]
pub struct ConsistencyState {
    values: FxHashMap<VertexId, VertexState>,
}

impl ConsistencyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, v: VertexId) -> VertexState {
        self.values.get(&v).copied().unwrap_or_default()
    }

    pub fn g(&self, v: VertexId) -> f64 {
        self.get(v).g
    }

    pub fn rhs(&self, v: VertexId) -> f64 {
        self.get(v).rhs
    }

    pub fn best_link(&self, v: VertexId) -> Option<VertexId> {
        self.get(v).best_link
    }

    pub fn is_consistent(&self, v: VertexId) -> bool {
        self.get(v).is_consistent()
    }

    pub fn set_g(&mut self, v: VertexId, g: f64) {
        self.values.entry(v).or_default().g = g;
    }

    pub fn set_rhs(&mut self, v: VertexId, rhs: f64, best_link: Option<VertexId>) {
        let entry = self.values.entry(v).or_default();
        entry.rhs = rhs;
        entry.best_link = best_link;
    }

    /// Drop the solution through `v`: `g = ∞`, no best link. `rhs` is left for the next
    /// vertex update to recompute.
    pub fn invalidate(&mut self, v: VertexId) {
        let entry = self.values.entry(v).or_default();
        entry.g = f64::INFINITY;
        entry.best_link = None;
    }

    /// Cost estimate of `v`: `g`, or `rhs` when `g` is still infinite.
    pub fn estimate(&self, v: VertexId) -> f64 {
        let s = self.get(v);
        if s.g.is_finite() {
            s.g
        } else {
            s.rhs
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Number of vertices with stored state.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A broken invariant found by `IncrementalSearch::check_invariants`.
#[derive(Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    /// Stored `rhs` differs from the one-step lookahead.
    StaleRhs {
        vertex: VertexId,
        stored: f64,
        expected: f64,
    },
    /// Inconsistent vertex missing from the queue.
    NotQueued { vertex: VertexId },
    /// Consistent vertex left in the queue.
    SpuriouslyQueued { vertex: VertexId },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleRhs {
                vertex,
                stored,
                expected,
            } => write!(f, "{vertex}: rhs is {stored}, lookahead gives {expected}"),
            Self::NotQueued { vertex } => write!(f, "{vertex}: inconsistent but not queued"),
            Self::SpuriouslyQueued { vertex } => write!(f, "{vertex}: consistent but queued"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untouched_vertex_reads_infinite_and_consistent() {
        let state = ConsistencyState::new();
        let v = VertexId::new(3);
        assert!(state.g(v).is_infinite());
        assert!(state.rhs(v).is_infinite());
        assert_eq!(state.best_link(v), None);
        assert!(state.is_consistent(v));
        assert!(state.is_empty());
    }

    #[test]
    fn test_key_uses_min_of_g_and_rhs() {
        let s = VertexState {
            g: 7.0,
            rhs: 4.0,
            best_link: None,
        };
        assert_eq!(s.key(2.0, 1.0), Key::new(7.0, 4.0));
        assert!(VertexState::default().key(0.0, 0.0).is_infinite());
    }

    #[test]
    fn test_invalidate_keeps_rhs() {
        let mut state = ConsistencyState::new();
        let (a, b) = (VertexId::new(0), VertexId::new(1));
        state.set_rhs(a, 3.0, Some(b));
        state.set_g(a, 3.0);
        state.invalidate(a);
        assert!(state.g(a).is_infinite());
        assert_eq!(state.rhs(a), 3.0);
        assert_eq!(state.best_link(a), None);
        assert_eq!(state.estimate(a), 3.0);
    }
}
