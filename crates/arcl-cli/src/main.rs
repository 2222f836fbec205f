/*
 * main.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! ARCL CLI - Main entry point

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod source;

use source::DocumentError;

#[derive(Parser)]
#[command(name = "arcl")]
#[command(version)]
#[command(about = "Evaluate ARCL configuration documents", long_about = None)]
struct Cli {
    /// Print errors as JSON diagnostics
    #[arg(long, global = true)]
    json_errors: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a document and print its value as JSON
    Eval {
        /// Document to evaluate
        file: PathBuf,

        /// JSON file whose value is available to placeholders
        #[arg(short, long)]
        argument: Option<PathBuf>,

        /// Print JSON on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Print the tokens of a document
    Tokens {
        file: PathBuf,

        /// Include whitespace tokens
        #[arg(long)]
        all: bool,
    },

    /// Print the syntax tree of a document as JSON
    Ast { file: PathBuf },

    /// Evaluate every .arcl fixture under a directory and compare it with
    /// the .json file next to it
    Check { dir: PathBuf },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "arcl=debug" } else { "arcl=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Eval {
            file,
            argument,
            compact,
        } => commands::eval::execute(commands::eval::EvalArgs {
            file,
            argument,
            compact,
        }),
        Commands::Tokens { file, all } => commands::tokens::execute(&file, all),
        Commands::Ast { file } => commands::ast::execute(&file),
        Commands::Check { dir } => commands::check::execute(&dir),
    }
}

fn report(err: &anyhow::Error, json: bool) {
    let diagnostic = match err.downcast_ref::<DocumentError>() {
        Some(document_error) => Some((
            document_error.error.to_diagnostic(),
            Some(&document_error.context),
        )),
        None => err
            .downcast_ref::<arcl::ArclError>()
            .map(|error| (error.to_diagnostic(), None)),
    };

    match (diagnostic, json) {
        (Some((diagnostic, _)), true) => eprintln!("{}", diagnostic.to_json()),
        (Some((diagnostic, context)), false) => eprint!("{}", diagnostic.to_text(context)),
        (None, true) => eprintln!(
            "{}",
            serde_json::json!({"kind": "error", "title": format!("{:#}", err)})
        ),
        (None, false) => eprintln!("Error: {:#}", err),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(code) => code,
        Err(err) => {
            report(&err, cli.json_errors);
            ExitCode::FAILURE
        }
    }
}
