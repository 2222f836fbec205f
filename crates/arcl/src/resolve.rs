/*
 * resolve.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Placeholder resolution and string-line joining.
//!
//! Placeholders resolve against the current argument. Inside strings and keys
//! a placeholder must name a non-empty string; a spread placeholder may name
//! any value.

use crate::ast::{Key, KeyLine, Path, Placeholder, PlaceholderEntry, StringElement, StringLine};
use crate::error::{ArclError, ArclResult};
use crate::value::Value;
use arcl_source_map::SourceInfo;

/// Look up `path` in the argument.
pub(crate) fn lookup<'v>(
    argument: Option<&'v Value>,
    path: &Path,
    location: SourceInfo,
) -> ArclResult<&'v Value> {
    argument
        .and_then(|argument| argument.get_path(&path.names()))
        .ok_or_else(|| ArclError::MissingPlaceholder {
            path: path.to_string(),
            location,
        })
}

/// Resolve a placeholder used inside a string or key.
pub(crate) fn resolve_string<'v>(
    argument: Option<&'v Value>,
    placeholder: &Placeholder,
) -> ArclResult<&'v str> {
    let location = placeholder.source_info;
    match lookup(argument, &placeholder.path, location)? {
        Value::String(text) if text.is_empty() => Err(ArclError::EmptyPlaceholder {
            path: placeholder.path.to_string(),
            location,
        }),
        Value::String(text) => Ok(text),
        other => Err(ArclError::PlaceholderNotString {
            path: placeholder.path.to_string(),
            shape: other.shape(),
            location,
        }),
    }
}

/// Resolve a spread placeholder.
///
/// `<<*>>` without an argument spreads nothing; any other unresolvable
/// spread is a missing value.
pub(crate) fn resolve_spread(
    argument: Option<&Value>,
    entry: &PlaceholderEntry,
) -> ArclResult<Option<Value>> {
    if entry.path.is_empty() && argument.is_none() {
        return Ok(None);
    }
    lookup(argument, &entry.path, entry.source_info).map(|value| Some(value.clone()))
}

/// Append one line of string fragments to `text`.
///
/// When `pending_newline` is set, a newline goes before the line's first
/// fragment unless a `+` comes first.
pub(crate) fn append_string_line(
    text: &mut String,
    mut pending_newline: bool,
    line: &StringLine,
    argument: Option<&Value>,
) -> ArclResult<()> {
    for element in &line.elements {
        let fragment = match element {
            StringElement::Plus { .. } => {
                pending_newline = false;
                continue;
            }
            StringElement::StringLiteral { value, .. } => value.as_str(),
            StringElement::Placeholder(placeholder) => resolve_string(argument, placeholder)?,
        };
        if pending_newline {
            text.push('\n');
            pending_newline = false;
        }
        text.push_str(fragment);
    }
    Ok(())
}

/// Join string lines with newlines, honoring `+` continuations.
pub(crate) fn join_lines<'l>(
    lines: impl IntoIterator<Item = &'l StringLine>,
    argument: Option<&Value>,
) -> ArclResult<String> {
    let mut text = String::new();
    let mut seen_line = false;
    let mut continued = false;
    for line in lines {
        append_string_line(&mut text, seen_line && !continued, line, argument)?;
        seen_line = true;
        continued = line.ends_with_plus();
    }
    Ok(text)
}

/// Evaluate a key to its text.
pub(crate) fn key_text(key: &Key, argument: Option<&Value>) -> ArclResult<String> {
    match key {
        Key::SimpleKey { text, .. } => Ok(text.clone()),
        Key::MultilineKey { lines, .. } => join_lines(
            lines.iter().filter_map(|line| match line {
                KeyLine::MultilineStringLine(line) => Some(line),
                KeyLine::Comment(_) => None,
            }),
            argument,
        ),
    }
}
