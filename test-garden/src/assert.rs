//! The assertion-failed signal.
//!
//! Scenario bodies may assert however they like: the standard `assert!`
//! family is recognized by its panic message. [`check!`](crate::check) and
//! [`fail`] raise a dedicated [`AssertionFailed`] payload instead, which also
//! works as an `Err` value for bodies returning `Result`.

use std::panic::{Location, panic_any};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AssertionFailed {
    pub message: String,
    /// `file:line:column` of the failing check.
    pub location: String,
}

impl AssertionFailed {
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: Location::caller().to_string(),
        }
    }
}

/// Abandon the current scenario with a failed assertion.
#[track_caller]
pub fn fail(message: impl Into<String>) -> ! {
    panic_any(AssertionFailed::new(message))
}

/// Assert a condition inside a scenario body.
///
/// ```no_run
/// # use test_garden::check;
/// let reply = "hello";
/// check!(reply == "hello");
/// check!(reply.len() == 5, "unexpected reply {reply:?}");
/// ```
#[macro_export]
macro_rules! check {
    ($cond:expr $(,)?) => {
        if !$cond {
            $crate::fail(concat!("check failed: ", stringify!($cond)));
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            $crate::fail(format!($($arg)+));
        }
    };
}
