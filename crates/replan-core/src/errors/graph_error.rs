//! Graph model errors.

use super::error_code::{self, ReplanErrorCode};
use crate::types::VertexId;

/// Errors raised when graph input is malformed. Always returned before any mutation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("Unknown vertex {id}")]
    UnknownVertex { id: VertexId },

    #[error("Unknown vertex key '{key}'")]
    UnknownVertexKey { key: String },

    #[error("Vertex key '{key}' already exists")]
    DuplicateVertex { key: String },

    #[error("No edge between {from} and {to}")]
    UnknownEdge { from: VertexId, to: VertexId },

    #[error("Invalid weight {weight} for edge {from} -> {to}: must be finite and >= 0")]
    InvalidWeight {
        from: VertexId,
        to: VertexId,
        weight: f64,
    },
}

impl ReplanErrorCode for GraphError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownVertex { .. } | Self::UnknownVertexKey { .. } => {
                error_code::UNKNOWN_VERTEX
            }
            Self::DuplicateVertex { .. } => error_code::DUPLICATE_VERTEX,
            Self::UnknownEdge { .. } => error_code::UNKNOWN_EDGE,
            Self::InvalidWeight { .. } => error_code::INVALID_WEIGHT,
        }
    }
}
