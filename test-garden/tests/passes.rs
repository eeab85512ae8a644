//! Pass scheduling: one pass per leaf, fresh ancestor setup on every pass,
//! and one recorded outcome per tree node.

use test_garden::test_support::{Trail, recording_garden};
use test_garden::{AssertionFailed, GardenConfig, check};

#[test]
fn n_leaves_take_n_passes_in_document_order() {
    let trail = Trail::new();
    let (garden, _) = recording_garden(GardenConfig::default());
    let summary = garden
        .run("tree", |g| {
            g.scenario("a", |g| {
                g.scenario("a1", |_| trail.push("a1"));
                g.scenario("a2", |_| trail.push("a2"));
            });
            g.scenario("b", |_| trail.push("b"));
            g.scenario("c", |g| {
                g.scenario("c1", |g| g.scenario("c1x", |_| trail.push("c1x")));
            });
        })
        .expect("run");

    assert_eq!(summary.passes, 4);
    assert_eq!(trail.entries(), vec!["a1", "a2", "b", "c1x"]);
    assert_eq!(summary.passed(), 8);
}

#[test]
fn ancestor_setup_reruns_for_every_leaf() {
    let trail = Trail::new();
    let (garden, _) = recording_garden(GardenConfig::default());
    garden
        .run("root", |g| {
            trail.push("root setup");
            g.scenario("mid", |g| {
                trail.push("mid setup");
                g.scenario("x", |_| trail.push("x"));
                g.scenario("y", |_| trail.push("y"));
            });
        })
        .expect("run");

    assert_eq!(
        trail.entries(),
        vec![
            "root setup",
            "mid setup",
            "x",
            "root setup",
            "mid setup",
            "y"
        ]
    );
}

#[test]
fn sibling_mutations_are_invisible() {
    let (garden, _) = recording_garden(GardenConfig::default());
    let summary = garden
        .run("setup", |g| {
            let mut x: Vec<i32> = Vec::new();
            g.scenario("push one", |_| {
                x.push(1);
                check!(x == [1]);
            });
            g.scenario("push two", |_| {
                x.push(2);
                check!(x == [2], "saw {x:?}");
            });
            g.scenario("untouched", |_| check!(x.is_empty()));
        })
        .expect("run");

    assert_eq!(summary.failed(), 0);
    assert_eq!(summary.passed(), 4);
}

#[test]
fn parent_with_two_passing_leaves_and_one_error() {
    let (garden, reporter) = recording_garden(GardenConfig::default());
    let summary = garden
        .run("parent", |g| {
            let mut x: Vec<i32> = Vec::new();
            g.scenario("A", |_| {
                x.push(1);
                check!(x == [1]);
            });
            g.scenario("B", |_| check!(x.is_empty()));
            g.scenario("C", |_| -> anyhow::Result<()> { anyhow::bail!("plain error") });
        })
        .expect("run");

    assert_eq!(
        summary.to_string(),
        "  3 passed,   0 failed,   0 skipped,   1 errors in parent"
    );
    assert_eq!(summary.passes, 3);
    assert_eq!(
        reporter.tagged("P: "),
        vec!["P: parent: A", "P: parent: B", "P: parent"]
    );
    let errors = reporter.tagged("E: ");
    assert_eq!(errors.len(), 1);
    assert!(
        errors[0].starts_with("E: parent: C: plain error (anyhow::Error), at "),
        "{errors:?}"
    );
    assert!(errors[0].contains("passes.rs"), "{errors:?}");
}

#[test]
fn parent_is_counted_once_on_its_last_visit() {
    let (garden, reporter) = recording_garden(GardenConfig::default());
    garden
        .run("p", |g| {
            g.scenario("a", |_| {});
            g.scenario("b", |_| {});
        })
        .expect("run");

    assert_eq!(
        reporter.lines(),
        vec![
            "T: p",
            "T: p: a",
            "P: p: a",
            "T: p",
            "T: p: b",
            "P: p: b",
            "P: p",
            "  3 passed,   0 failed,   0 skipped,   0 errors in p",
        ]
    );
}

fn reset_socket() {
    panic!("socket reset");
}

#[test]
fn panics_are_errors_at_the_panic_site() {
    let (garden, reporter) = recording_garden(GardenConfig::default());
    let summary = garden
        .run("panics", |g| {
            g.scenario("explode", |_| reset_socket());
            g.scenario("after", |_| {});
        })
        .expect("run");

    assert_eq!(summary.errors(), 1);
    assert_eq!(summary.passed(), 2);
    let errors = reporter.tagged("E: ");
    assert!(
        errors[0].starts_with("E: panics: explode: socket reset (panic), at "),
        "{errors:?}"
    );
    assert!(errors[0].contains("passes.rs"), "{errors:?}");
}

#[test]
fn std_assertions_and_returned_failures_are_failures() {
    let (garden, reporter) = recording_garden(GardenConfig::default());
    let summary = garden
        .run("asserts", |g| {
            g.scenario("assert_eq", |_| assert_eq!(1 + 1, 3));
            g.scenario("assert", |_| assert!(Vec::<u8>::new().len() == 1));
            g.scenario("returned", |_| -> Result<(), AssertionFailed> {
                Err(AssertionFailed::new("reply was empty"))
            });
        })
        .expect("run");

    assert_eq!(summary.failed(), 3);
    assert_eq!(summary.errors(), 0);
    let failures = reporter.tagged("F: ");
    assert_eq!(failures.len(), 3);
    assert!(failures.iter().all(|line| line.contains("passes.rs")), "{failures:?}");
    assert!(reporter.lines().contains(&"reply was empty".to_string()));
}

#[test]
fn failed_leaf_does_not_fail_its_parent() {
    let trail = Trail::new();
    let (garden, _) = recording_garden(GardenConfig::default());
    let summary = garden
        .run("parent", |g| {
            g.scenario("bad", |_| {
                check!(false);
                trail.push("after failed check");
            });
            trail.push("parent continues");
        })
        .expect("run");

    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.passed(), 1);
    assert_eq!(trail.entries(), vec!["parent continues"]);
}
