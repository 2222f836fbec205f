/*
 * check.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! `arcl check`: run a directory of fixtures.
//!
//! Every `NAME.arcl` with a sibling `NAME.json` is a fixture. The document is
//! evaluated (with `NAME.arg.json` as its argument when present) and the
//! result compared with the expected JSON. Documents without an expected
//! file are skipped.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use arcl::Value;
use tracing::debug;
use walkdir::WalkDir;

use crate::source::{LoadedSource, read_argument};

/// Outcome of one fixture.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Passed,
    /// Evaluated, but to a different value
    Mismatch { expected: String, actual: String },
    /// Could not be read, parsed or evaluated
    Failed(String),
}

/// Find the fixtures under `dir`, sorted by path.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut fixtures = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "arcl") && path.with_extension("json").exists()
        {
            fixtures.push(path.to_path_buf());
        }
    }
    fixtures.sort();
    Ok(fixtures)
}

/// Evaluate one fixture and compare it with its expected value.
pub fn run_fixture(path: &Path) -> Outcome {
    match evaluate_and_compare(path) {
        Ok(outcome) => outcome,
        Err(err) => Outcome::Failed(render_error(&err)),
    }
}

fn evaluate_and_compare(path: &Path) -> Result<Outcome> {
    let source = LoadedSource::read(path)?;
    let document = source.parse()?;

    let argument_path = path.with_extension("arg.json");
    let actual = if argument_path.exists() {
        let argument = read_argument(&argument_path)?;
        document.evaluate_with_argument(&argument)
    } else {
        document.evaluate()
    }
    .map_err(|err| source.fail(err))?;

    let expected_path = path.with_extension("json");
    let expected_text = std::fs::read_to_string(&expected_path)
        .with_context(|| format!("Failed to read {}", expected_path.display()))?;
    let expected_json: serde_json::Value = serde_json::from_str(&expected_text)
        .with_context(|| format!("{} is not valid JSON", expected_path.display()))?;
    let expected = match expected_json {
        serde_json::Value::Null => None,
        json => Some(Value::try_from(json)?),
    };

    if actual == expected {
        Ok(Outcome::Passed)
    } else {
        Ok(Outcome::Mismatch {
            expected: serde_json::to_string_pretty(&expected)?,
            actual: serde_json::to_string_pretty(&actual)?,
        })
    }
}

fn render_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<crate::source::DocumentError>() {
        Some(document_error) => document_error
            .error
            .to_diagnostic()
            .to_text(Some(&document_error.context)),
        None => format!("{:#}", err),
    }
}

/// Execute the check command
pub fn execute(dir: &Path) -> Result<ExitCode> {
    let fixtures = discover(dir)?;
    if fixtures.is_empty() {
        anyhow::bail!("No fixtures found under {}", dir.display());
    }

    let mut failures = 0;
    for fixture in &fixtures {
        let name = fixture.strip_prefix(dir).unwrap_or(fixture).display();
        match run_fixture(fixture) {
            Outcome::Passed => {
                debug!(fixture = %name, "passed");
                println!("ok    {}", name);
            }
            Outcome::Mismatch { expected, actual } => {
                failures += 1;
                println!("FAIL  {}", name);
                println!("  expected:\n{}", indent(&expected));
                println!("  actual:\n{}", indent(&actual));
            }
            Outcome::Failed(message) => {
                failures += 1;
                println!("ERROR {}", name);
                println!("{}", indent(message.trim_end()));
            }
        }
    }

    println!(
        "\n{} passed, {} failed",
        fixtures.len() - failures,
        failures
    );
    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}
