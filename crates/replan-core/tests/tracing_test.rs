//! Tests for the replan tracing setup.

use std::sync::Mutex;

use replan_core::tracing::init_tracing;

/// Serializes tests that manipulate `REPLAN_LOG`.
static TRACING_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_replan_log_debug() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("REPLAN_LOG", "debug");
    init_tracing();
    tracing::debug!("tracing initialised at debug");
    std::env::remove_var("REPLAN_LOG");
}

#[test]
fn test_invalid_filter_falls_back() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("REPLAN_LOG", "not a [valid filter");
    init_tracing();
    std::env::remove_var("REPLAN_LOG");
}

#[test]
fn test_init_tracing_idempotent() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    init_tracing();
    init_tracing();
}
