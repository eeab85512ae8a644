//! Per-scope teardown callbacks.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::error::GardenError;

pub type Teardown = Box<dyn FnOnce()>;

/// One list of callbacks per open scenario frame.
#[derive(Default)]
pub struct TeardownLedger {
    frames: Vec<Vec<Teardown>>,
}

impl TeardownLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.frames.push(Vec::new());
    }

    /// Register `callback` with the innermost open frame.
    pub fn register(&mut self, callback: Teardown) -> Result<(), GardenError> {
        let frame = self
            .frames
            .last_mut()
            .ok_or(GardenError::NoActiveScenario)?;
        frame.push(callback);
        Ok(())
    }

    /// Pop the innermost frame, returning its callbacks in run order
    /// (last registered first).
    pub fn close(&mut self) -> Vec<Teardown> {
        let mut callbacks = self.frames.pop().unwrap_or_default();
        callbacks.reverse();
        callbacks
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

impl std::fmt::Debug for TeardownLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sizes: Vec<usize> = self.frames.iter().map(Vec::len).collect();
        f.debug_struct("TeardownLedger")
            .field("frames", &sizes)
            .finish()
    }
}

/// Run callbacks returned by [`TeardownLedger::close`].
///
/// Stops at the first callback that panics and hands back its payload; the
/// remaining callbacks of that frame are dropped without running.
pub fn drain(callbacks: Vec<Teardown>) -> Result<(), Box<dyn Any + Send>> {
    for callback in callbacks {
        panic::catch_unwind(AssertUnwindSafe(callback))?;
    }
    Ok(())
}
