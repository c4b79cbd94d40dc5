use std::fs;
use std::path::{Path, PathBuf};

use sdo_consolidate::{report, run, Config, Error, Violation};

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

fn config(document: PathBuf) -> Config {
    Config {
        document,
        commit: false,
        max_steps: None,
    }
}

#[test]
fn report_lists_duplicated_operations_in_document_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(working_copy(dir.path()));
    let before = fs::read_to_string(&config.document).unwrap();

    let groups = report(&config).unwrap();
    let summary: Vec<(&str, usize)> = groups
        .iter()
        .map(|group| (group.operation.as_str(), group.len()))
        .collect();
    assert_eq!(
        summary,
        vec![("BoundNames", 2), ("InstantiateFunctionObject", 2)]
    );
    assert_eq!(fs::read_to_string(&config.document).unwrap(), before);
}

#[test]
fn run_consolidates_every_operation_once() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(working_copy(dir.path()));

    let done = run(&config).unwrap();
    assert_eq!(done, vec!["BoundNames", "InstantiateFunctionObject"]);

    let text = fs::read_to_string(&config.document).unwrap();
    assert_eq!(text.matches("Static Semantics: BoundNames").count(), 1);
    assert_eq!(
        text.matches("Runtime Semantics: InstantiateFunctionObject")
            .count(),
        1
    );
    assert!(text.contains(
        "  <emu-clause id=\"sec-static-semantics-boundnames\" type=\"sdo\" aoid=\"BoundNames\">\n"
    ));
    assert!(text.contains(
        "  <emu-clause id=\"sec-runtime-semantics-instantiatefunctionobject\" type=\"sdo\" aoid=\"InstantiateFunctionObject\">\n"
    ));
    assert!(!text.contains("emu-see-also-para"));
    assert_eq!(text.matches("With parameter _env_.").count(), 1);

    // excluded operations are never touched
    assert_eq!(text.matches("Static Semantics: StringValue").count(), 2);

    // merged clauses land before the anchor, in the order they were made
    let bound = text.find("aoid=\"BoundNames\"").unwrap();
    let instantiate = text.find("aoid=\"InstantiateFunctionObject\"").unwrap();
    let anchor = text.find("<!-- insert sdos here -->").unwrap();
    assert!(bound < instantiate && instantiate < anchor);

    // the nested clause trails every grammar of its operation
    let g = text.find("<emu-grammar>G : g</emu-grammar>").unwrap();
    let nested = text.find("<emu-clause id=\"sec-nested\">").unwrap();
    assert!(instantiate < g && g < nested && nested < anchor);
}

#[test]
fn run_is_idempotent_at_steady_state() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(working_copy(dir.path()));

    run(&config).unwrap();
    let settled = fs::read_to_string(&config.document).unwrap();

    assert!(run(&config).unwrap().is_empty());
    assert!(report(&config).unwrap().is_empty());
    assert_eq!(fs::read_to_string(&config.document).unwrap(), settled);
}

#[test]
fn max_steps_stops_early() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(working_copy(dir.path()));
    config.max_steps = Some(1);

    assert_eq!(run(&config).unwrap(), vec!["BoundNames"]);
    let groups = report(&config).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].operation, "InstantiateFunctionObject");
}

#[test]
fn structural_violation_is_reported_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spec.html");
    let broken = fs::read_to_string(fixture("operations.html"))
        .unwrap()
        .replace(
            "    <emu-see-also-para op=\"BoundNames\"></emu-see-also-para>\n",
            "    <emu-see-also-para op=\"BoundNames\"></emu-see-also-para>\n    <p>Surprise prose.</p>\n",
        );
    fs::write(&path, &broken).unwrap();

    let err = run(&config(path.clone())).unwrap_err();
    assert!(matches!(
        err.violation(),
        Some(Violation::UnexpectedNode { operation, found, .. })
            if operation == "BoundNames" && found == "p"
    ));
    assert_eq!(fs::read_to_string(&path).unwrap(), broken);
}

#[test]
fn missing_document_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = run(&config(dir.path().join("absent.html"))).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}
