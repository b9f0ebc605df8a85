//! Opaque vertex identifier.
//!
//! A `VertexId` is only meaningful inside the graph that issued it. Its ordering exists
//! so that neighbor enumeration and queue tie-breaks are deterministic; it carries no
//! semantic meaning.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a vertex within one graph instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(u32);

impl VertexId {
    /// Create an identifier from a dense slot index.
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// The dense slot index backing this identifier.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for VertexId {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}
