//! Classification of how a scenario body ended.
//!
//! A body ends in one of four ways: it returns normally, it raises the
//! assertion-failed signal, it raises anything else, or there was no body at
//! all. Raising means either returning `Err` (see [`IntoOutcome`]) or
//! panicking; both abandon the rest of the body. Panics that carry an
//! [`Escalation`] are not outcomes and must be re-raised by the caller.

use std::any::{Any, type_name};
use std::backtrace::BacktraceStatus;

use crate::assert::AssertionFailed;
use crate::core::types::Status;
use crate::error::GardenError;

/// Panic payload for conditions that end the whole run rather than one
/// scenario: usage errors, teardown panics, non-deterministic trees.
#[derive(Debug)]
pub struct Escalation(pub GardenError);

/// Where a panic was raised, as seen by the panic hook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanicSite {
    pub location: Option<String>,
    /// Rendered `std::backtrace::Backtrace`, present only when captured.
    pub backtrace: Option<String>,
}

/// Error returned by a scenario body.
#[derive(Debug)]
pub struct BodyError {
    pub error: anyhow::Error,
    /// Type name of the original error, shown as the error kind.
    pub kind: &'static str,
}

/// Return types accepted from scenario bodies: `()` or `Result<(), E>`.
pub trait IntoOutcome {
    fn into_outcome(self) -> Result<(), BodyError>;
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Result<(), BodyError> {
        Ok(())
    }
}

impl<E> IntoOutcome for Result<(), E>
where
    E: Into<anyhow::Error>,
{
    fn into_outcome(self) -> Result<(), BodyError> {
        self.map_err(|err| BodyError {
            error: err.into(),
            kind: type_name::<E>(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Failed {
        location: String,
        message: String,
    },
    Errored {
        message: String,
        kind: String,
        /// Raise location followed by `from <frame>` lines.
        trace: String,
    },
    Incomplete,
}

impl Outcome {
    pub fn status(&self) -> Status {
        match self {
            Outcome::Completed => Status::Pass,
            Outcome::Failed { .. } => Status::Fail,
            Outcome::Errored { .. } => Status::Error,
            Outcome::Incomplete => Status::Incomplete,
        }
    }
}

#[derive(Debug)]
pub enum Verdict {
    Settled(Outcome),
    /// Payload to resume unwinding with once the frame is closed.
    Escalate(Box<dyn Any + Send>),
}

/// Classify a body that returned. `call_site` is the location of the
/// `scenario` call, used when the error carries no location of its own.
pub fn classify_return(
    result: Result<(), BodyError>,
    call_site: &str,
    backtrace_depth: usize,
) -> Outcome {
    let BodyError { error, kind } = match result {
        Ok(()) => return Outcome::Completed,
        Err(err) => err,
    };

    if let Some(assertion) = error.downcast_ref::<AssertionFailed>() {
        return Outcome::Failed {
            location: assertion.location.clone(),
            message: assertion.message.clone(),
        };
    }

    let backtrace = error.backtrace();
    let frames = if backtrace.status() == BacktraceStatus::Captured {
        trim_backtrace(&backtrace.to_string(), backtrace_depth)
    } else {
        Vec::new()
    };
    Outcome::Errored {
        message: format!("{error:#}"),
        kind: kind.to_string(),
        trace: render_trace(call_site, &frames),
    }
}

/// Classify a panic caught at the frame boundary.
pub fn classify_panic(
    payload: Box<dyn Any + Send>,
    site: Option<PanicSite>,
    backtrace_depth: usize,
) -> Verdict {
    if payload.is::<Escalation>() {
        return Verdict::Escalate(payload);
    }

    let site = site.unwrap_or_default();
    let location = site
        .location
        .clone()
        .unwrap_or_else(|| "<unknown>".to_string());

    if let Some(assertion) = payload.downcast_ref::<AssertionFailed>() {
        return Verdict::Settled(Outcome::Failed {
            location,
            message: assertion.message.clone(),
        });
    }

    let message = panic_message(payload.as_ref());
    if is_assertion_message(&message) {
        return Verdict::Settled(Outcome::Failed { location, message });
    }

    let frames = site
        .backtrace
        .as_deref()
        .map(|raw| trim_backtrace(raw, backtrace_depth))
        .unwrap_or_default();
    Verdict::Settled(Outcome::Errored {
        message,
        kind: "panic".to_string(),
        trace: render_trace(&location, &frames),
    })
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    if let Some(assertion) = payload.downcast_ref::<AssertionFailed>() {
        return assertion.message.clone();
    }
    if let Some(Escalation(err)) = payload.downcast_ref::<Escalation>() {
        return err.to_string();
    }
    "<non-string panic payload>".to_string()
}

/// Messages produced by `assert!`, `assert_eq!` and `assert_ne!`.
fn is_assertion_message(message: &str) -> bool {
    message.starts_with("assertion failed") || message.starts_with("assertion `")
}

fn render_trace(location: &str, frames: &[String]) -> String {
    let mut trace = location.to_string();
    for frame in frames {
        trace.push_str("\n  from ");
        trace.push_str(frame);
    }
    trace
}

/// Keep the first `depth` frames of a rendered backtrace that belong to the
/// code under test, dropping runtime and engine frames.
pub fn trim_backtrace(raw: &str, depth: usize) -> Vec<String> {
    raw.lines()
        .filter_map(|line| {
            let (index, symbol) = line.trim().split_once(": ")?;
            index
                .chars()
                .all(|c| c.is_ascii_digit())
                .then_some(symbol)
        })
        .filter(|symbol| !is_engine_frame(symbol))
        .take(depth)
        .map(str::to_string)
        .collect()
}

/// Modules of this crate that sit between a scenario body and the panic.
/// The demo binary shares the crate name, so its `demos` frames are kept.
const ENGINE_MODULES: &[&str] = &["api", "assert", "core", "garden", "io", "signal"];

fn is_engine_frame(symbol: &str) -> bool {
    const RUNTIME: &[&str] = &[
        "std::",
        "core::",
        "alloc::",
        "rust_begin_unwind",
        "__rust",
        "anyhow::",
    ];
    let symbol = symbol.trim_start_matches('<');
    if RUNTIME.iter().any(|prefix| symbol.starts_with(prefix)) {
        return true;
    }
    symbol
        .strip_prefix("test_garden::")
        .and_then(|rest| rest.split_once("::"))
        .is_some_and(|(module, _)| ENGINE_MODULES.contains(&module))
}
