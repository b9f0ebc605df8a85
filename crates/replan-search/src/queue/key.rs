//! Two-component lexicographic priority.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Priority of a queued vertex: `(min(g, rhs) + h + km, min(g, rhs))`.
///
/// Ordered lexicographically with `f64::total_cmp`, so the order is total even for
/// infinities.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Key {
    pub primary: f64,
    pub secondary: f64,
}

impl Key {
    /// The key of an empty queue; compares greater than or equal to every finite key.
    pub const INFINITE: Key = Key {
        primary: f64::INFINITY,
        secondary: f64::INFINITY,
    };

    pub fn new(primary: f64, secondary: f64) -> Self {
        Self { primary, secondary }
    }

    pub fn is_infinite(&self) -> bool {
        self.primary.is_infinite() && self.secondary.is_infinite()
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Key {}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.primary
            .total_cmp(&other.primary)
            .then_with(|| self.secondary.total_cmp(&other.secondary))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.primary, self.secondary)
    }
}
