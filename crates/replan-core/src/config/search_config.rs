//! Search engine configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ITERATION_FACTOR, DEFAULT_ITERATION_FLOOR};

/// Configuration for the incremental search engines.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Absolute cap on queue pops per drain. Overrides the derived budget when set.
    pub max_iterations: Option<usize>,
    /// Multiplier applied to the vertex count for the derived budget. Default: 8.
    pub iteration_factor: Option<usize>,
    /// Lower bound of the derived budget. Default: 64.
    pub iteration_floor: Option<usize>,
}

impl SearchConfig {
    /// Returns the effective iteration factor, defaulting to 8.
    pub fn effective_iteration_factor(&self) -> usize {
        self.iteration_factor.unwrap_or(DEFAULT_ITERATION_FACTOR)
    }

    /// Returns the effective iteration floor, defaulting to 64.
    pub fn effective_iteration_floor(&self) -> usize {
        self.iteration_floor.unwrap_or(DEFAULT_ITERATION_FLOOR)
    }

    /// Iteration budget for a graph with `vertex_count` vertices.
    pub fn iteration_budget(&self, vertex_count: usize) -> usize {
        match self.max_iterations {
            Some(cap) => cap,
            None => vertex_count
                .saturating_mul(self.effective_iteration_factor())
                .max(self.effective_iteration_floor()),
        }
    }
}
