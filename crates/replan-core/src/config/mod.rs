//! Configuration for replan.
//! TOML-based, layered resolution: defaults < `replan.toml` < `REPLAN_*` env vars.

pub mod replan_config;
pub mod search_config;
pub mod trace_config;

pub use replan_config::ReplanConfig;
pub use search_config::SearchConfig;
pub use trace_config::TraceConfig;
