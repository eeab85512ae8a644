//! Report lines emitted while a garden runs.
//!
//! Each line starts with a one-letter tag followed by the topic path (topics
//! joined by `": "`):
//!
//! | Tag | When | Verbose only |
//! |-----|------|--------------|
//! | `T` | a scenario is entered | yes |
//! | `S` | a scenario is disabled by the pattern filter | yes |
//! | `P` | a scenario body completed | yes |
//! | `F` | an assertion failed (followed by the message line) | no |
//! | `E` | any other error | no |
//! | `I` | a stub scenario was reached | yes |

use std::fmt;

/// Sink for report lines. Lines may contain embedded newlines.
pub trait Reporter {
    fn line(&self, line: &str);
}

/// Prints every line to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutReporter;

impl Reporter for StdoutReporter {
    fn line(&self, line: &str) {
        println!("{line}");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<'a> {
    Enter {
        path: &'a str,
    },
    Skip {
        path: &'a str,
    },
    Pass {
        path: &'a str,
    },
    Fail {
        path: &'a str,
        location: &'a str,
        message: &'a str,
    },
    Error {
        path: &'a str,
        message: &'a str,
        kind: &'a str,
        trace: &'a str,
    },
    Incomplete {
        path: &'a str,
    },
}

impl Event<'_> {
    /// Lines that are only printed in verbose mode.
    pub fn is_verbose(&self) -> bool {
        !matches!(self, Event::Fail { .. } | Event::Error { .. })
    }
}

impl fmt::Display for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Enter { path } => write!(f, "T: {path}"),
            Event::Skip { path } => write!(f, "S: {path}"),
            Event::Pass { path } => write!(f, "P: {path}"),
            Event::Fail {
                path,
                location,
                message,
            } => write!(f, "F: {path}: failed assertion, at {location}\n{message}"),
            Event::Error {
                path,
                message,
                kind,
                trace,
            } => write!(f, "E: {path}: {message} ({kind}), at {trace}"),
            Event::Incomplete { path } => write!(f, "I: {path}"),
        }
    }
}

/// Join a topic stack into the path shown in report lines.
pub fn topic_path<S: AsRef<str>>(topics: &[S]) -> String {
    topics
        .iter()
        .map(|topic| topic.as_ref())
        .collect::<Vec<_>>()
        .join(": ")
}
