//! Search engine errors.

use super::config_error::ConfigError;
use super::error_code::{self, ReplanErrorCode};
use super::graph_error::GraphError;
use crate::types::VertexId;

/// Errors surfaced by the search engines.
///
/// A search that proves the target unreachable is not an error; it is reported through
/// the result status instead.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Search did not converge within {budget} iterations (used {iterations})")]
    IterationBudgetExceeded { iterations: usize, budget: usize },

    #[error("Path reconstruction from {opposite} failed although the estimated cost is {estimate}")]
    ReconstructionFailed { opposite: VertexId, estimate: f64 },

    #[error("{operation} is not supported by the {direction} search")]
    UnsupportedOperation {
        operation: &'static str,
        direction: &'static str,
    },
}

impl ReplanErrorCode for SearchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Graph(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::IterationBudgetExceeded { .. } => error_code::BUDGET_EXCEEDED,
            Self::ReconstructionFailed { .. } => error_code::RECONSTRUCTION_FAILED,
            Self::UnsupportedOperation { .. } => error_code::UNSUPPORTED_OPERATION,
        }
    }
}

/// Convenience alias for search results.
pub type ReplanResult<T> = Result<T, SearchError>;
