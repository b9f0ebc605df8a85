//! Error handling for replan.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod graph_error;
pub mod search_error;

pub use config_error::ConfigError;
pub use error_code::ReplanErrorCode;
pub use graph_error::GraphError;
pub use search_error::{ReplanResult, SearchError};
