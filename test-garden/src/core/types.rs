//! Outcome counters and the run summary.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome recorded for one scenario node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Body ran to completion.
    Pass,
    /// Body raised the assertion-failed signal.
    Fail,
    /// Disabled by the pattern filter; body never ran.
    Skip,
    /// Body raised any other error.
    Error,
    /// Stub scenario without a body.
    Incomplete,
}

/// Counts per [`Status`]. Monotonic for the lifetime of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCounters(BTreeMap<Status, usize>);

impl StatusCounters {
    pub fn record(&mut self, status: Status) {
        *self.0.entry(status).or_insert(0) += 1;
    }

    pub fn get(&self, status: Status) -> usize {
        self.0.get(&status).copied().unwrap_or(0)
    }
}

/// Result of one top-level run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Topic of the outermost scenario.
    pub topic: String,
    /// Number of passes over the tree.
    pub passes: usize,
    pub counts: StatusCounters,
}

impl Summary {
    pub fn passed(&self) -> usize {
        self.counts.get(Status::Pass)
    }

    pub fn failed(&self) -> usize {
        self.counts.get(Status::Fail)
    }

    pub fn skipped(&self) -> usize {
        self.counts.get(Status::Skip)
    }

    pub fn errors(&self) -> usize {
        self.counts.get(Status::Error)
    }

    pub fn incomplete(&self) -> usize {
        self.counts.get(Status::Incomplete)
    }

    /// No failed assertions and no errors. Skips and stubs do not count
    /// against a run.
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.errors() == 0
    }
}

/// The summary line printed once per top-level run.
impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:3} passed, {:3} failed, {:3} skipped, {:3} errors",
            self.passed(),
            self.failed(),
            self.skipped(),
            self.errors()
        )?;
        if self.incomplete() > 0 {
            write!(f, ", {:3} incomplete", self.incomplete())?;
        }
        write!(f, " in {}", self.topic)
    }
}
