/*
 * fixtures.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * End-to-end evaluation tests over paired fixture files.
 *
 * Each `tests/fixtures/NAME.arcl` is evaluated and compared against
 * `NAME.json`. When `NAME.arg.json` exists it is passed as the argument.
 */

use arcl::{Document, Value};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn sources() -> Vec<PathBuf> {
    let mut sources: Vec<PathBuf> = std::fs::read_dir(fixtures_dir())
        .expect("fixtures directory exists")
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "arcl"))
        .collect();
    sources.sort();
    sources
}

fn read_json(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("cannot read {}: {}", path.display(), err));
    serde_json::from_str(&text)
        .unwrap_or_else(|err| panic!("invalid JSON in {}: {}", path.display(), err))
}

fn evaluate_fixture(source: &Path) -> Option<Value> {
    let document = Document::parse_file(source)
        .unwrap_or_else(|err| panic!("{} failed to parse: {}", source.display(), err));

    let argument_path = source.with_extension("arg.json");
    let result = if argument_path.exists() {
        let argument = Value::try_from(read_json(&argument_path)).unwrap();
        document.evaluate_with_argument(&argument)
    } else {
        document.evaluate()
    };
    result.unwrap_or_else(|err| panic!("{} failed to evaluate: {}", source.display(), err))
}

#[test]
fn test_all_fixtures() {
    let sources = sources();
    assert!(!sources.is_empty(), "no fixtures found");

    for source in sources {
        let actual = evaluate_fixture(&source);
        let expected = Value::try_from(read_json(&source.with_extension("json"))).unwrap();
        assert_eq!(actual, Some(expected), "{}", source.display());
    }
}

#[test]
fn test_fixture_output_is_stable_json() {
    let actual = evaluate_fixture(&fixtures_dir().join("nested-maps.arcl"));
    insta::assert_snapshot!(
        serde_json::to_string(&actual).unwrap(),
        @r#"{"server":{"host":"localhost","port":"8080","tls":{"enabled":"false"}},"database":{"name":"production","pool":["primary","replica"]}}"#
    );
}

#[test]
fn test_documents_evaluate_repeatedly() {
    let document = Document::parse_file(&fixtures_dir().join("placeholders.arcl")).unwrap();
    let argument = Value::try_from(read_json(&fixtures_dir().join("placeholders.arg.json"))).unwrap();

    let first = document.evaluate_with_argument(&argument).unwrap();
    let second = document.evaluate_with_argument(&argument).unwrap();
    assert_eq!(first, second);

    // Without the argument the same document fails on its first placeholder
    let err = document.evaluate().unwrap_err();
    assert_eq!(err.code(), "A-5-2");
    assert_eq!(err.location().unwrap().line(), 2);
}
