//! Test-only helpers for driving gardens and inspecting their output.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use tempfile::TempDir;

use crate::garden::Garden;
use crate::io::config::GardenConfig;
use crate::io::report::Reporter;

/// Reporter that keeps every line in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    lines: Rc<RefCell<Vec<String>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded lines, with multi-line entries split.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .flat_map(|line| line.lines().map(str::to_string).collect::<Vec<_>>())
            .collect()
    }

    /// Recorded lines starting with `prefix` (e.g. `"P: "`).
    pub fn tagged(&self, prefix: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.starts_with(prefix))
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn line(&self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }
}

/// A verbose garden reporting into a fresh [`RecordingReporter`].
pub fn recording_garden(config: GardenConfig) -> (Garden, RecordingReporter) {
    let reporter = RecordingReporter::new();
    let garden = Garden::with_reporter(config.verbose(true), reporter.clone())
        .expect("valid test config");
    (garden, reporter)
}

/// Shared append-only log for observing execution order inside bodies.
#[derive(Debug, Clone, Default)]
pub struct Trail(Rc<RefCell<Vec<String>>>);

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

/// Write `contents` to `garden.toml` inside a new temp dir.
///
/// The temp dir is returned so it outlives the test.
pub fn write_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("garden.toml");
    std::fs::write(&path, contents).expect("write config");
    (temp, path)
}
