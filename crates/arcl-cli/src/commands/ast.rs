/*
 * ast.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! `arcl ast`: print the syntax tree as JSON.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;

use crate::source::LoadedSource;

/// Execute the ast command
pub fn execute(file: &Path) -> Result<ExitCode> {
    let source = LoadedSource::read(file)?;
    let document = source.parse()?;
    println!("{}", serde_json::to_string_pretty(document.items())?);
    Ok(ExitCode::SUCCESS)
}
