//! ReplanErrorCode trait for the visualizer boundary.

/// Every error enum implements this to give callers a stable machine-readable code
/// next to the human-readable message.
pub trait ReplanErrorCode {
    /// Returns the error code string (e.g., "UNKNOWN_VERTEX").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted boundary string: `[ERROR_CODE] message`.
    fn boundary_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants.
pub const UNKNOWN_VERTEX: &str = "UNKNOWN_VERTEX";
pub const DUPLICATE_VERTEX: &str = "DUPLICATE_VERTEX";
pub const UNKNOWN_EDGE: &str = "UNKNOWN_EDGE";
pub const INVALID_WEIGHT: &str = "INVALID_WEIGHT";
pub const BUDGET_EXCEEDED: &str = "BUDGET_EXCEEDED";
pub const RECONSTRUCTION_FAILED: &str = "RECONSTRUCTION_FAILED";
pub const UNSUPPORTED_OPERATION: &str = "UNSUPPORTED_OPERATION";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
