//! CLI tests for the `test-garden` demo binary.
//!
//! Spawns the binary in a temp dir and checks exit codes and output.

use std::path::Path;
use std::process::{Command, Output};

use test_garden::exit_codes;
use test_garden::test_support::write_config_file;

fn garden_bin(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_test-garden"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("spawn test-garden")
}

#[test]
fn all_suites_pass() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = garden_bin(temp.path(), &[]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0 failed,   0 skipped,   0 errors in array"), "{stdout}");
    assert!(stdout.contains(" in ftp server"), "{stdout}");
    assert!(stdout.contains("1 incomplete in Thing"), "{stdout}");
}

#[test]
fn invalid_pattern_exits_invalid() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = garden_bin(temp.path(), &["("]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid pattern"), "{stderr}");
}

#[test]
fn json_prints_summary() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = garden_bin(temp.path(), &["--suite", "thing", "--json"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let last = stdout.lines().last().expect("json line");
    let summary: serde_json::Value = serde_json::from_str(last).expect("json");
    assert_eq!(summary["topic"], "Thing");
    assert_eq!(summary["counts"]["pass"], 3);
    assert_eq!(summary["counts"]["incomplete"], 1);
}

#[test]
fn config_file_enables_verbose_output() {
    let (temp, _path) = write_config_file("verbose = true\n");
    let output = garden_bin(temp.path(), &["--suite", "array"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("T: array: sort: lexicographically"), "{stdout}");
}

#[test]
fn patterns_narrow_the_ftp_suite() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = garden_bin(temp.path(), &["-v", "--suite", "ftp", "ftp", "bad"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("P: ftp server: bad login"), "{stdout}");
    assert!(stdout.contains("S: ftp server: good login"), "{stdout}");
    assert!(
        stdout.contains("  2 passed,   0 failed,   1 skipped,   0 errors in ftp server"),
        "{stdout}"
    );
}
