//! Observability for replan.
//! `tracing` crate with `EnvFilter`, per-module log levels via `REPLAN_LOG`.

pub mod setup;

pub use setup::init_tracing;
