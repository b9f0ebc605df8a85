//! # replan-core
//!
//! Shared foundation for the replan workspace: error enums, layered configuration,
//! tracing setup, collection aliases, and the vertex identifier type.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::ReplanConfig;
pub use errors::{ConfigError, GraphError, ReplanErrorCode, ReplanResult, SearchError};
pub use types::VertexId;
