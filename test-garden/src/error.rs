//! Errors that end a run instead of being counted against a scenario.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GardenError {
    /// `cleanup` was called with no scenario frame open.
    #[error("no active scenario")]
    NoActiveScenario,

    /// `scenario` or `stub` was called on a garden that is not running.
    #[error("garden is not running; start the tree with Garden::run or the free scenario function")]
    NotRunning,

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A teardown callback panicked. Teardowns are not classified.
    #[error("teardown in '{path}' panicked: {message}")]
    Teardown { path: String, message: String },

    /// A pass finished without reaching the position recorded by the previous
    /// pass: the scenario bodies did not make the same nested calls twice.
    #[error("scenario tree is not deterministic: position {target:?} was never reached")]
    UnreachedTarget { target: Vec<usize> },

    #[error("scenario tree still unexplored after {limit} passes")]
    PassLimit { limit: usize },

    /// The engine itself panicked outside any scenario body.
    #[error("scenario engine panicked: {0}")]
    Panicked(String),
}
