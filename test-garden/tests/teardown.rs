//! Teardown ordering, abandonment and teardown failures.

use test_garden::test_support::{Trail, recording_garden};
use test_garden::{GardenConfig, GardenError, check, cleanup};

#[test]
fn teardowns_run_in_reverse_once_per_entered_frame() {
    let trail = Trail::new();
    let (garden, _) = recording_garden(GardenConfig::default());
    garden
        .run("outer", |g| {
            let log = trail.clone();
            g.cleanup(move || log.push("outer 1"));
            let log = trail.clone();
            g.cleanup(move || log.push("outer 2"));
            g.scenario("a", |g| {
                let log = trail.clone();
                g.cleanup(move || log.push("a"));
            });
            g.scenario("b", |g| {
                let log = trail.clone();
                g.cleanup(move || log.push("b"));
            });
        })
        .expect("run");

    assert_eq!(
        trail.entries(),
        vec!["a", "outer 2", "outer 1", "b", "outer 2", "outer 1"]
    );
}

#[test]
fn teardowns_run_when_frame_is_abandoned() {
    let trail = Trail::new();
    let (garden, _) = recording_garden(GardenConfig::default());
    let summary = garden
        .run("root", |g| {
            g.scenario("fails", |g| {
                let log = trail.clone();
                g.cleanup(move || log.push("torn down"));
                check!(false);
                trail.push("unreachable");
            });
        })
        .expect("run");

    assert_eq!(summary.failed(), 1);
    assert_eq!(trail.entries(), vec!["torn down"]);
}

#[test]
fn teardowns_run_when_body_returns_error() {
    let trail = Trail::new();
    let (garden, _) = recording_garden(GardenConfig::default());
    let summary = garden
        .run("root", |g| {
            g.scenario("errs", |g| -> Result<(), std::io::Error> {
                let log = trail.clone();
                g.cleanup(move || log.push("closed"));
                Err(std::io::Error::other("connection refused"))
            });
        })
        .expect("run");

    assert_eq!(summary.errors(), 1);
    assert_eq!(trail.entries(), vec!["closed"]);
}

#[test]
fn panicking_teardown_aborts_the_run_after_outer_teardowns() {
    let trail = Trail::new();
    let (garden, reporter) = recording_garden(GardenConfig::default());
    let err = garden
        .run("outer", |g| {
            let log = trail.clone();
            g.cleanup(move || log.push("outer"));
            g.scenario("inner", |g| g.cleanup(|| panic!("teardown exploded")));
            g.scenario("never", |_| trail.push("never"));
        })
        .unwrap_err();

    let GardenError::Teardown { path, message } = err else {
        panic!("expected teardown error, got {err:?}");
    };
    assert_eq!(path, "outer: inner");
    assert_eq!(message, "teardown exploded");
    assert_eq!(trail.entries(), vec!["outer"]);
    assert!(reporter.tagged("E: ").is_empty());
    let last = reporter.lines().pop().expect("summary line");
    assert!(last.ends_with(" in outer"), "{last}");
}

#[test]
fn cleanup_from_root_teardown_is_a_usage_error() {
    let (garden, _) = recording_garden(GardenConfig::default());
    let err = garden
        .run("root", |g| {
            g.cleanup(|| cleanup(|| {}));
        })
        .unwrap_err();

    let GardenError::Teardown { path, message } = err else {
        panic!("expected teardown error, got {err:?}");
    };
    assert_eq!(path, "root");
    assert_eq!(message, "no active scenario");
}

#[test]
fn teardown_registered_in_parent_sees_child_effects_of_same_pass() {
    let trail = Trail::new();
    let (garden, _) = recording_garden(GardenConfig::default());
    garden
        .run("root", |g| {
            let state = std::rc::Rc::new(std::cell::RefCell::new(Vec::<&str>::new()));
            let seen = std::rc::Rc::clone(&state);
            let log = trail.clone();
            g.cleanup(move || log.push(seen.borrow().join(",")));
            g.scenario("x", |_| state.borrow_mut().push("x"));
            g.scenario("y", |_| state.borrow_mut().push("y"));
        })
        .expect("run");

    assert_eq!(trail.entries(), vec!["x", "y"]);
}

#[test]
fn first_teardown_failure_wins_when_an_outer_teardown_also_fails() {
    let trail = Trail::new();
    let (garden, _) = recording_garden(GardenConfig::default());
    let err = garden
        .run("root", |g| {
            let log = trail.clone();
            g.cleanup(move || log.push("root"));
            g.scenario("a", |g| {
                g.cleanup(|| panic!("a teardown failed too"));
                g.scenario("b", |g| g.cleanup(|| panic!("b teardown failed")));
            });
        })
        .unwrap_err();

    let GardenError::Teardown { path, message } = err else {
        panic!("expected teardown error, got {err:?}");
    };
    assert_eq!(path, "root: a: b");
    assert_eq!(message, "b teardown failed");
    assert_eq!(trail.entries(), vec!["root"]);
}
