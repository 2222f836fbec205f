/*
 * eval.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! `arcl eval`: evaluate a document and print its value as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use tracing::debug;

use crate::source::{LoadedSource, read_argument};

/// Arguments for the eval command
#[derive(Debug)]
pub struct EvalArgs {
    pub file: PathBuf,
    /// JSON file supplying the placeholder argument
    pub argument: Option<PathBuf>,
    pub compact: bool,
}

/// Execute the eval command
pub fn execute(args: EvalArgs) -> Result<ExitCode> {
    let source = LoadedSource::read(&args.file)?;
    let document = source.parse()?;

    let argument = args.argument.as_deref().map(read_argument).transpose()?;
    debug!(
        file = %args.file.display(),
        with_argument = argument.is_some(),
        "evaluating"
    );

    let value = match &argument {
        Some(argument) => document.evaluate_with_argument(argument),
        None => document.evaluate(),
    }
    .map_err(|err| source.fail(err))?;

    let output = if args.compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    println!("{}", output);
    Ok(ExitCode::SUCCESS)
}
