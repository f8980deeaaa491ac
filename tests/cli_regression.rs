// Regression tests for the `verity` binary.
// Requires: assert_cmd, predicates, tempfile crates in [dev-dependencies]

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::TempDir;

fn write_plan(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("plan.yaml");
    fs::write(&path, body).unwrap();
    path
}

const PASSING_PLAN: &str = r#"
setup:
  - "x = 42"
suites:
  - name: "Only"
    cases:
      - expr: "x == 42"
      - expr: "1 / 0"
        raises: DivisionByZero
"#;

#[test]
fn cli_exits_zero_when_all_pass() {
    let dir = TempDir::new().unwrap();
    let plan = write_plan(&dir, PASSING_PLAN);

    let mut cmd = Command::cargo_bin("verity").unwrap();
    cmd.arg("run").arg(&plan).arg("--color").arg("never");
    cmd.assert()
        .success()
        .stdout(contains("✔️ Only").and(contains("🚀 All 1 tests passed!")));
}

#[test]
fn cli_runs_demo_plan_with_failures() {
    let mut cmd = Command::cargo_bin("verity").unwrap();
    cmd.args(["run", "demos/questions.yaml", "--ascii", "--color", "never"]);
    cmd.assert().code(1).stdout(
        contains("[FAIL] Question 1")
            .and(contains("[FAIL] z == 42  =>  UndefinedName: name 'z' is not defined"))
            .and(contains("[PASS] Question 2"))
            .and(contains("[PASS] Question 3"))
            .and(contains("    2 passing"))
            .and(contains("    1 failing")),
    );
}

#[test]
fn cli_json_format() {
    let dir = TempDir::new().unwrap();
    let plan = write_plan(&dir, PASSING_PLAN);

    let mut cmd = Command::cargo_bin("verity").unwrap();
    cmd.arg("run").arg(&plan).args(["--format", "json"]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["summary"]["passing"], 1);
    assert_eq!(json["suites"][0]["cases"][1]["outcome"]["status"], "passed");
}

#[test]
fn cli_reports_miette_diagnostics_on_bad_setup() {
    let dir = TempDir::new().unwrap();
    let plan = write_plan(
        &dir,
        r#"
setup:
  - "x = (1 +"
suites: []
"#,
    );

    let mut cmd = Command::cargo_bin("verity").unwrap();
    cmd.arg("run").arg(&plan);
    cmd.assert()
        .code(2)
        .stderr(contains("verity::plan::setup").or(contains("verity::syntax")));
}

#[test]
fn cli_reports_missing_plan_file() {
    let mut cmd = Command::cargo_bin("verity").unwrap();
    cmd.args(["run", "does/not/exist.yaml"]);
    cmd.assert()
        .code(2)
        .stderr(contains("failed to read plan file"));
}

#[test]
fn cli_max_depth_flag() {
    let dir = TempDir::new().unwrap();
    let plan = write_plan(
        &dir,
        r#"
setup:
  - "down = fn(n) => n == 0 or down(n - 1)"
suites:
  - name: "Depth"
    cases:
      - expr: "down(10)"
"#,
    );

    let mut cmd = Command::cargo_bin("verity").unwrap();
    cmd.arg("run").arg(&plan).args(["--max-depth", "4", "--color", "never"]);
    cmd.assert()
        .code(1)
        .stdout(contains("RecursionLimit: maximum call depth of 4 exceeded"));
}

#[test]
fn cli_lists_failure_kinds() {
    let mut cmd = Command::cargo_bin("verity").unwrap();
    cmd.arg("kinds");
    cmd.assert().success().stdout(
        contains("DivisionByZero")
            .and(contains("ExpectedErrorMismatch"))
            .and(contains("harness")),
    );
}
