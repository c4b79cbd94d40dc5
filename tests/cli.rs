use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn working_copy(dir: &Path) -> PathBuf {
    let path = dir.join("spec.html");
    fs::copy(fixture("operations.html"), &path).unwrap();
    path
}

fn sdo_consolidate() -> Command {
    Command::cargo_bin("sdo-consolidate").unwrap()
}

#[test]
fn list_prints_groups_and_leaves_document_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = working_copy(dir.path());
    let before = fs::read_to_string(&path).unwrap();

    sdo_consolidate()
        .arg("--list")
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("BoundNames (2 clauses)")
                .and(predicate::str::contains("InstantiateFunctionObject (2 clauses)"))
                .and(predicate::str::contains("StringValue").not()),
        );

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn no_commit_rewrites_until_done() {
    let dir = tempfile::tempdir().unwrap();
    let path = working_copy(dir.path());

    sdo_consolidate()
        .arg("--no-commit")
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Rewrote BoundNames")
                .and(predicate::str::contains("Rewrote InstantiateFunctionObject"))
                .and(predicate::str::contains("out of clauses!")),
        );

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("aoid=\"BoundNames\""));
    assert!(text.contains("aoid=\"InstantiateFunctionObject\""));
}

#[test]
fn once_consolidates_a_single_operation() {
    let dir = tempfile::tempdir().unwrap();
    let path = working_copy(dir.path());

    sdo_consolidate()
        .args(["--no-commit", "--once"])
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Rewrote BoundNames")
                .and(predicate::str::contains("InstantiateFunctionObject").not()),
        );

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("aoid=\"BoundNames\""));
    assert!(!text.contains("aoid=\"InstantiateFunctionObject\""));
}

#[test]
fn document_defaults_to_spec_html_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    working_copy(dir.path());

    sdo_consolidate()
        .current_dir(dir.path())
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("BoundNames (2 clauses)"));
}

#[test]
fn missing_anchor_fails_and_names_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spec.html");
    let text = fs::read_to_string(fixture("operations.html"))
        .unwrap()
        .replace("<!-- insert sdos here -->\n", "");
    fs::write(&path, &text).unwrap();

    sdo_consolidate()
        .arg("--no-commit")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("insert sdos here"));

    assert_eq!(fs::read_to_string(&path).unwrap(), text);
}

#[test]
fn missing_document_fails() {
    let dir = tempfile::tempdir().unwrap();

    sdo_consolidate()
        .arg("--no-commit")
        .arg(dir.path().join("absent.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.html"));
}
