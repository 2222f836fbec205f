/*
 * source.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Loading documents and arguments from disk.

use std::path::Path;

use anyhow::{Context, Result};
use arcl::{ArclError, Document, Value};
use arcl_source_map::SourceContext;
use thiserror::Error;

/// An error raised while reading a document, with the document's source so
/// the diagnostic can show a snippet.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct DocumentError {
    pub error: ArclError,
    pub context: SourceContext,
}

/// A document's text and the source context diagnostics render against.
pub struct LoadedSource {
    pub text: String,
    pub context: SourceContext,
    filename: String,
}

impl LoadedSource {
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let filename = path.display().to_string();
        // Documents parse into their own context where this is file 0
        let mut context = SourceContext::new();
        context.add_file(filename.clone(), Some(text.clone()));
        Ok(Self {
            text,
            context,
            filename,
        })
    }

    pub fn parse(&self) -> Result<Document> {
        Document::parse_with_filename(&self.text, &self.filename).map_err(|err| self.fail(err))
    }

    /// Attach this source to an ARCL error.
    pub fn fail(&self, error: ArclError) -> anyhow::Error {
        DocumentError {
            error,
            context: self.context.clone(),
        }
        .into()
    }
}

/// Read a JSON file as a placeholder argument.
pub fn read_argument(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read argument {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Argument {} is not valid JSON", path.display()))?;
    Ok(Value::try_from(json)?)
}
