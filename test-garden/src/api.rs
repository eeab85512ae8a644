//! Free functions that act on the garden currently running on this thread.
//!
//! The outermost [`scenario`] call starts a run with the thread's default
//! config (see [`configure`]); calls made while that run is active nest inside
//! it. A failing run panics with its summary line, so a tree can live directly
//! inside a `#[test]` function.

use std::cell::RefCell;
use std::fmt::Display;
use std::panic::Location;

use crate::core::classifier::IntoOutcome;
use crate::error::GardenError;
use crate::garden::{Body, Garden};
use crate::io::config::GardenConfig;

thread_local! {
    static ACTIVE: RefCell<Option<Garden>> = const { RefCell::new(None) };
    static DEFAULT_CONFIG: RefCell<Option<GardenConfig>> = const { RefCell::new(None) };
}

/// Makes a garden the target of the free functions until dropped, then
/// restores whatever was active before.
pub(crate) struct Activation {
    previous: Option<Garden>,
}

impl Activation {
    pub(crate) fn install(garden: Garden) -> Self {
        let previous = ACTIVE.with(|slot| slot.replace(Some(garden)));
        Self { previous }
    }
}

impl Drop for Activation {
    fn drop(&mut self) {
        let previous = self.previous.take();
        let _ = ACTIVE.try_with(|slot| slot.replace(previous));
    }
}

fn active() -> Option<Garden> {
    ACTIVE.with(|slot| slot.borrow().as_ref().map(Garden::handle))
}

/// Set the config used by top-level [`scenario`] calls on this thread.
pub fn configure(config: GardenConfig) {
    DEFAULT_CONFIG.with(|slot| *slot.borrow_mut() = Some(config));
}

fn default_config() -> GardenConfig {
    DEFAULT_CONFIG
        .with(|slot| slot.borrow().clone())
        .unwrap_or_default()
}

/// Declare a scenario.
///
/// # Panics
///
/// At top level, panics with the summary line when any scenario failed or
/// errored, or with the error that aborted the run.
#[track_caller]
pub fn scenario<T, F, R>(topic: T, mut body: F)
where
    T: Display,
    F: FnMut() -> R,
    R: IntoOutcome,
{
    let call_site = Location::caller();
    if let Some(garden) = active() {
        let nested: Body<'_> = Box::new(move |_: &Garden| body().into_outcome());
        garden.nest(topic.to_string(), Some(nested), call_site);
        return;
    }

    let mut root = |_: &Garden| body();
    finish(start().drive(topic.to_string(), Some(&mut root), call_site));
}

/// Declare a scenario that is not written yet.
#[track_caller]
pub fn stub<T: Display>(topic: T) {
    let call_site = Location::caller();
    match active() {
        Some(garden) => garden.nest(topic.to_string(), None, call_site),
        None => finish(start().drive(topic.to_string(), None::<&mut fn(&Garden)>, call_site)),
    }
}

/// Register a teardown for the innermost running scenario.
///
/// # Panics
///
/// Panics with "no active scenario" when called outside a scenario body.
#[track_caller]
pub fn cleanup<F: FnOnce() + 'static>(callback: F) {
    match active() {
        Some(garden) => garden.cleanup(callback),
        None => panic!("{}", GardenError::NoActiveScenario),
    }
}

/// Like [`cleanup`], but reports a missing scenario instead of panicking.
pub fn try_cleanup<F: FnOnce() + 'static>(callback: F) -> Result<(), GardenError> {
    active()
        .ok_or(GardenError::NoActiveScenario)?
        .try_cleanup(callback)
}

#[track_caller]
fn start() -> Garden {
    match Garden::new(default_config()) {
        Ok(garden) => garden,
        Err(err) => panic!("{err}"),
    }
}

#[track_caller]
fn finish(result: Result<crate::core::types::Summary, GardenError>) {
    match result {
        Ok(summary) if summary.is_success() => {}
        Ok(summary) => panic!("{summary}"),
        Err(err) => panic!("{err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check;
    use crate::test_support::Trail;

    #[test]
    fn nested_free_calls_share_one_run() {
        let trail = Trail::new();
        scenario("root", || {
            trail.push("root");
            scenario("a", || trail.push("a"));
            scenario("b", || trail.push("b"));
        });
        assert_eq!(trail.entries(), vec!["root", "a", "root", "b"]);
    }

    #[test]
    fn cleanup_runs_after_body() {
        let trail = Trail::new();
        let inner = trail.clone();
        scenario("with teardown", move || {
            let log = inner.clone();
            cleanup(move || log.push("teardown"));
            inner.push("body");
        });
        assert_eq!(trail.entries(), vec!["body", "teardown"]);
    }

    #[test]
    #[should_panic(expected = "1 failed")]
    fn failing_tree_panics_with_summary() {
        scenario("broken", || {
            scenario("bad", || check!(false));
        });
    }

    #[test]
    fn try_cleanup_outside_scenario_is_an_error() {
        assert!(matches!(
            try_cleanup(|| {}),
            Err(GardenError::NoActiveScenario)
        ));
    }

    #[test]
    #[should_panic(expected = "no active scenario")]
    fn cleanup_outside_scenario_panics() {
        cleanup(|| {});
    }

    #[test]
    fn activation_is_cleared_after_run() {
        scenario("done", || {});
        assert!(active().is_none());
    }

    #[test]
    fn stub_at_top_level_is_not_a_failure() {
        stub("later");
    }
}
