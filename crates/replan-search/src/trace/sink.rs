//! Trace sinks.

use std::sync::Mutex;

use super::step::Step;

/// Receives every recorded trace entry, in order.
///
/// Implementations must not call back into the engine.
pub trait TraceSink: Send + Sync {
    fn on_step(&self, step: &Step);
}

/// Sink that keeps a copy of every entry it receives.
#[derive(Debug, Default)]
pub struct StepCollector {
    steps: Mutex<Vec<Step>>,
}

impl StepCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries received so far.
    pub fn steps(&self) -> Vec<Step> {
        match self.steps.lock() {
            Ok(steps) => steps.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self.steps.lock() {
            Ok(steps) => steps.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TraceSink for StepCollector {
    fn on_step(&self, step: &Step) {
        match self.steps.lock() {
            Ok(mut steps) => steps.push(step.clone()),
            Err(poisoned) => poisoned.into_inner().push(step.clone()),
        }
    }
}
