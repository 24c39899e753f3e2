//! CLI integration tests
//!
//! These tests run the `assert-that` binary and verify, for every command:
//! - check: exit codes, human and JSONL output
//! - eval: outcomes, value sources, faults
//! - list: declared assertions
//!
//! Each test runs the binary inside its own temporary directory.

mod common;

use assert_cmd::Command;
use common::write_file;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

const DECLARATIONS: &str = r##"
[[assert]]
id = "adult-or-guardian"
expression = "this.age >= 18 || !empty(this.parent)"
message = "minors need a parent"
property_node = "age"

[[assert]]
id = "known-grade"
expression = '#{@builtins.matches(this.grade, "[A-F]")}'
engine = "spel"
"##;

fn bin(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("assert-that").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

/// Creates a project with a declarations file and one clean input
fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "assertions.toml", DECLARATIONS);
    write_file(dir.path(), "data/ok.json", r#"{"age": 40, "parent": null, "grade": "A"}"#);
    dir
}

fn jsonl_records(output: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(output)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

// ============================================================================
// CHECK COMMAND TESTS
// ============================================================================

#[test]
fn test_check_passes() {
    let dir = setup_project();
    bin(dir.path())
        .args(["check", "--color", "never"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Check PASSED"))
        .stdout(predicate::str::contains("Checked 1 document(s) against 2 constraint(s)"));
}

#[test]
fn test_check_reports_violations() {
    let dir = setup_project();
    write_file(
        dir.path(),
        "data/people.jsonl",
        "{\"age\": 15, \"parent\": null, \"grade\": \"A\"}\n{\"age\": 50, \"parent\": null, \"grade\": \"Q\"}\n",
    );

    bin(dir.path())
        .args(["check", "--color", "never"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "people.jsonl:1: adult-or-guardian: age: minors need a parent",
        ))
        .stdout(predicate::str::contains("people.jsonl:2: known-grade: <root>"))
        .stdout(predicate::str::contains("Check FAILED"));
}

#[test]
fn test_check_jsonl_output() {
    let dir = setup_project();
    write_file(dir.path(), "data/child.json", r#"{"age": 4, "parent": null, "grade": "B"}"#);

    let output = bin(dir.path())
        .args(["check", "--format", "jsonl"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let records = jsonl_records(&output.stdout);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["type"], "violation");
    assert_eq!(records[0]["constraint"], "adult-or-guardian");
    assert_eq!(records[0]["property"], "age");
    assert!(records[0]["file"].as_str().unwrap().ends_with("child.json"));
    assert_eq!(records[1]["type"], "status");
    assert_eq!(records[1]["passed"], false);
    assert_eq!(records[1]["documents_checked"], 2);
}

#[test]
fn test_check_fault_exit_code() {
    let dir = setup_project();
    write_file(dir.path(), "data/odd.json", r#"{"name": "no age"}"#);

    let output = bin(dir.path())
        .args(["check", "-f", "jsonl"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));

    let records = jsonl_records(&output.stdout);
    let fault = records
        .iter()
        .find(|r| r["type"] == "fault")
        .expect("a fault record");
    assert_eq!(fault["constraint"], "adult-or-guardian");
    assert!(
        fault["error"]
            .as_str()
            .unwrap()
            .contains("Unresolved property 'age'")
    );
}

#[test]
fn test_check_explicit_paths() {
    let dir = setup_project();
    write_file(dir.path(), "data/bad.json", r#"{"age": 2, "parent": null, "grade": "A"}"#);

    bin(dir.path())
        .args(["check", "data/ok.json"])
        .assert()
        .code(0);
    bin(dir.path())
        .args(["check", "data/bad.json"])
        .assert()
        .code(1);
}

#[test]
fn test_check_missing_config() {
    let dir = TempDir::new().unwrap();
    bin(dir.path())
        .arg("check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("assertions.toml not found"));
}

#[test]
fn test_check_custom_config_path() {
    let dir = setup_project();
    write_file(
        dir.path(),
        "strict.toml",
        "[[assert]]\nid = \"old\"\nexpression = \"this.age > 100\"\n",
    );
    bin(dir.path())
        .args(["check", "--config", "strict.toml"])
        .assert()
        .code(1);
}

#[test]
fn test_check_invalid_config() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "assertions.toml", "[[assert]]\nid = \"a\"\n");
    bin(dir.path())
        .arg("check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_check_malformed_input() {
    let dir = setup_project();
    write_file(dir.path(), "data/broken.json", "{\"age\": ");
    bin(dir.path())
        .arg("check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Malformed JSON"));
}

#[test]
fn test_check_uses_config_output_format() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "assertions.toml",
        "[output]\nformat = \"jsonl\"\n\n[[assert]]\nid = \"t\"\nexpression = \"true\"\n",
    );
    write_file(dir.path(), "a.json", "1");

    let output = bin(dir.path()).arg("check").output().unwrap();
    assert_eq!(output.status.code(), Some(0));
    let records = jsonl_records(&output.stdout);
    assert_eq!(records.last().unwrap()["type"], "status");
}

// ============================================================================
// EVAL COMMAND TESTS
// ============================================================================

#[test]
fn test_eval_valid() {
    let dir = TempDir::new().unwrap();
    bin(dir.path())
        .args(["eval", "this.age >= 18", "--value", r#"{"age": 20}"#, "--color", "never"])
        .assert()
        .code(0)
        .stdout("valid\n");
}

#[test]
fn test_eval_invalid_with_property_node() {
    let dir = TempDir::new().unwrap();
    bin(dir.path())
        .args([
            "eval",
            "this.age >= 18",
            "--value",
            r#"{"age": 2}"#,
            "--property-node",
            "age",
            "--message",
            "too young",
            "--color",
            "never",
        ])
        .assert()
        .code(1)
        .stdout("invalid age: too young\n");
}

#[test]
fn test_eval_spel_from_stdin() {
    let dir = TempDir::new().unwrap();
    bin(dir.path())
        .args(["eval", "#{this.active}", "--engine", "spel", "--format", "jsonl"])
        .write_stdin(r#"{"active": "yes"}"#)
        .assert()
        .code(0)
        .stdout(predicate::str::contains(r#""valid":true"#));
}

#[test]
fn test_eval_from_file() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "person.json", r#"{"name": "ada"}"#);
    bin(dir.path())
        .args(["eval", r#"upper(this.name) == "ADA""#, "--file", "person.json"])
        .assert()
        .code(0);
}

#[test]
fn test_eval_fault() {
    let dir = TempDir::new().unwrap();
    let output = bin(dir.path())
        .args(["eval", "this + 1", "--value", "1", "--format", "jsonl"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));

    let records = jsonl_records(&output.stdout);
    assert_eq!(records[0]["type"], "fault");
    assert_eq!(records[0]["value"], "1");
    assert!(
        records[0]["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to validate [1] by expression 'this + 1'")
    );
}

#[test]
fn test_eval_invalid_json_value() {
    let dir = TempDir::new().unwrap();
    bin(dir.path())
        .args(["eval", "true", "--value", "{oops"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid JSON value"));
}

// ============================================================================
// LIST COMMAND TESTS
// ============================================================================

#[test]
fn test_list_human() {
    let dir = setup_project();
    bin(dir.path())
        .args(["list", "--color", "never"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("adult-or-guardian"))
        .stdout(predicate::str::contains("jexl"))
        .stdout(predicate::str::contains("-> age"))
        .stdout(predicate::str::contains("known-grade"));
}

#[test]
fn test_list_jsonl() {
    let dir = setup_project();
    let output = bin(dir.path())
        .args(["list", "--format", "jsonl"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let records = jsonl_records(&output.stdout);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["type"], "constraint");
    assert_eq!(records[0]["message"], "minors need a parent");
    assert_eq!(records[1]["engine"], "spel");
}

#[test]
fn test_list_empty() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "assertions.toml", "");
    bin(dir.path())
        .arg("list")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("No constraints are declared."));
}

#[test]
fn test_verbose_logging_goes_to_stderr() {
    let dir = setup_project();
    bin(dir.path())
        .args(["check", "-v", "--format", "jsonl"])
        .assert()
        .code(0)
        .stderr(predicate::str::contains("binding expression engine"));
}
