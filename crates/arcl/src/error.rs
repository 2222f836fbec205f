/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for scanning, parsing and evaluating ARCL documents.
//!
//! Every failure is fatal to the call that raised it. Each variant maps to a
//! stable error code from the `arcl-error-reporting` catalog and converts to a
//! [`DiagnosticMessage`] for display.

use crate::value::Shape;
use arcl_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder};
use arcl_source_map::SourceInfo;
use thiserror::Error;

/// Errors that can occur while reading or evaluating an ARCL document.
#[derive(Debug, Error)]
pub enum ArclError {
    /// The scanner found no rule matching the input in the current mode.
    #[error("Unexpected character {found:?} in {mode} mode at {location}")]
    UnexpectedCharacter {
        found: char,
        mode: &'static str,
        location: SourceInfo,
    },

    /// A string literal that cannot be decoded.
    #[error("Invalid string literal at {location}: {reason}")]
    InvalidStringLiteral { reason: String, location: SourceInfo },

    /// The token stream ended before the construct being read was complete.
    #[error("Unexpected end of input at {location}, expected {expected}")]
    UnexpectedEof {
        expected: String,
        location: SourceInfo,
    },

    /// A token the grammar does not allow at this position.
    #[error("Unexpected {found} at {location}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        location: SourceInfo,
    },

    #[error("Unknown directive {name} at {location}")]
    UnknownDirective { name: String, location: SourceInfo },

    /// A spread placeholder (`<<*>>`) sharing its line with other elements.
    #[error("Spread placeholder at {location} must stand alone on its line")]
    MisplacedSpread { location: SourceInfo },

    /// A block item whose shape conflicts with the block's locked shape.
    #[error("Cannot add {} to a {block} at {location}", .item.entry_name())]
    IncompatibleContent {
        block: Shape,
        item: Shape,
        location: SourceInfo,
    },

    #[error("@from must occur before content (at {location})")]
    FromAfterContent { location: SourceInfo },

    #[error("Nested templates are not allowed: {name} at {location}")]
    NestedTemplate { name: String, location: SourceInfo },

    #[error("No such template: {path} at {location}")]
    NoSuchTemplate { path: String, location: SourceInfo },

    #[error("Must provide a value for {path} (at {location})")]
    MissingPlaceholder { path: String, location: SourceInfo },

    #[error("Value provided for {path} must be a string, not a {shape} (at {location})")]
    PlaceholderNotString {
        path: String,
        shape: Shape,
        location: SourceInfo,
    },

    #[error("Value provided for {path} must not be empty (at {location})")]
    EmptyPlaceholder { path: String, location: SourceInfo },

    /// Two values of different shapes met in a merge.
    #[error("Cannot merge a {right} onto a {left}{} at {location}", at_path(.path))]
    IncompatibleMerge {
        left: Shape,
        right: Shape,
        /// Keys leading to the conflicting values, outermost first
        path: Vec<String>,
        location: SourceInfo,
    },

    #[error("Nesting too deep (max depth: {max_depth}) at {location}")]
    NestingTooDeep {
        max_depth: usize,
        location: SourceInfo,
    },

    /// A host-supplied argument that has no ARCL representation.
    #[error("Invalid argument value{}: {reason}", at_path(.path))]
    InvalidArgument { path: Vec<String>, reason: String },

    /// I/O error (e.g., reading a document from disk).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn at_path(path: &[String]) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" at `{}`", path.join("."))
    }
}

/// Result type for ARCL operations.
pub type ArclResult<T> = Result<T, ArclError>;

impl ArclError {
    /// The catalog error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ArclError::Io(_) => "A-0-2",
            ArclError::UnexpectedCharacter { .. } => "A-1-1",
            ArclError::InvalidStringLiteral { .. } => "A-1-2",
            ArclError::UnexpectedEof { .. } => "A-2-1",
            ArclError::UnexpectedToken { .. } => "A-2-2",
            ArclError::UnknownDirective { .. } => "A-2-3",
            ArclError::MisplacedSpread { .. } => "A-2-4",
            ArclError::IncompatibleContent { .. } => "A-3-1",
            ArclError::FromAfterContent { .. } => "A-4-1",
            ArclError::NestedTemplate { .. } => "A-4-2",
            ArclError::NoSuchTemplate { .. } => "A-5-1",
            ArclError::MissingPlaceholder { .. } => "A-5-2",
            ArclError::PlaceholderNotString { .. } => "A-5-3",
            ArclError::EmptyPlaceholder { .. } => "A-5-4",
            ArclError::IncompatibleMerge { .. } => "A-5-5",
            ArclError::NestingTooDeep { .. } => "A-6-1",
            ArclError::InvalidArgument { .. } => "A-7-1",
        }
    }

    /// Source location of the offending token or item, when there is one.
    pub fn location(&self) -> Option<SourceInfo> {
        match self {
            ArclError::UnexpectedCharacter { location, .. }
            | ArclError::InvalidStringLiteral { location, .. }
            | ArclError::UnexpectedEof { location, .. }
            | ArclError::UnexpectedToken { location, .. }
            | ArclError::UnknownDirective { location, .. }
            | ArclError::MisplacedSpread { location }
            | ArclError::IncompatibleContent { location, .. }
            | ArclError::FromAfterContent { location }
            | ArclError::NestedTemplate { location, .. }
            | ArclError::NoSuchTemplate { location, .. }
            | ArclError::MissingPlaceholder { location, .. }
            | ArclError::PlaceholderNotString { location, .. }
            | ArclError::EmptyPlaceholder { location, .. }
            | ArclError::IncompatibleMerge { location, .. }
            | ArclError::NestingTooDeep { location, .. } => Some(*location),
            ArclError::InvalidArgument { .. } | ArclError::Io(_) => None,
        }
    }

    /// Convert this error into a diagnostic message.
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        let builder = match self {
            ArclError::UnexpectedCharacter { found, mode, .. } => {
                DiagnosticMessageBuilder::error("Unexpected character")
                    .problem(format!("{:?} cannot appear here", found))
                    .add_info(format!("The scanner was in {} mode", mode))
            }
            ArclError::InvalidStringLiteral { reason, .. } => {
                DiagnosticMessageBuilder::error("Invalid string literal")
                    .problem(reason.clone())
                    .add_hint("String literals use JSON escapes such as `\\n`, `\\\"` and `\\u00e9`")
            }
            ArclError::UnexpectedEof { expected, .. } => {
                DiagnosticMessageBuilder::error("Unexpected end of input")
                    .problem(format!("The document ended where {} was expected", expected))
            }
            ArclError::UnexpectedToken {
                found, expected, ..
            } => DiagnosticMessageBuilder::error("Unexpected token")
                .problem(format!("Found {} where {} was expected", found, expected)),
            ArclError::UnknownDirective { name, .. } => {
                DiagnosticMessageBuilder::error("Unknown directive")
                    .problem(format!("`{}` is not a directive", name))
                    .add_hint("Did you mean `@from` or `@template`?")
            }
            ArclError::MisplacedSpread { .. } => {
                DiagnosticMessageBuilder::error("Misplaced spread placeholder")
                    .add_hint("Put the spread placeholder on a line of its own?")
            }
            ArclError::IncompatibleContent { block, item, .. } => {
                DiagnosticMessageBuilder::error("Incompatible block content")
                    .problem(format!(
                        "Cannot add {} to a block that already holds a {}",
                        item.entry_name(),
                        block
                    ))
                    .add_info(format!(
                        "The block's first content fixed its shape as a {}",
                        block
                    ))
            }
            ArclError::FromAfterContent { .. } => {
                DiagnosticMessageBuilder::error("@from after content")
                    .problem("@from must occur before any content in its block")
                    .add_hint("Move the @from line to the top of the block?")
            }
            ArclError::NestedTemplate { name, .. } => {
                DiagnosticMessageBuilder::error("Nested template")
                    .problem(format!(
                        "Template `{}` is declared inside a nested block",
                        name
                    ))
                    .add_hint("Declare templates at the top level of the document?")
            }
            ArclError::NoSuchTemplate { path, .. } => {
                DiagnosticMessageBuilder::error("No such template")
                    .problem(format!("`{}` does not name a declared template", path))
            }
            ArclError::MissingPlaceholder { path, .. } => {
                DiagnosticMessageBuilder::error("Missing placeholder value")
                    .problem(format!("Must provide a value for `{}`", path))
            }
            ArclError::PlaceholderNotString { path, shape, .. } => {
                DiagnosticMessageBuilder::error("Placeholder value is not a string")
                    .problem(format!(
                        "The value provided for `{}` must be a string, not a {}",
                        path, shape
                    ))
                    .add_hint("Use a spread placeholder (`<<path.*>>`) to insert lists and maps?")
            }
            ArclError::EmptyPlaceholder { path, .. } => {
                DiagnosticMessageBuilder::error("Empty placeholder value")
                    .problem(format!("The value provided for `{}` is empty", path))
            }
            ArclError::IncompatibleMerge {
                left, right, path, ..
            } => {
                let builder = DiagnosticMessageBuilder::error("Incompatible merge")
                    .problem(format!("Cannot merge a {} onto a {}", right, left));
                if path.is_empty() {
                    builder
                } else {
                    builder.add_detail(format!("The conflict is at `{}`", path.join(".")))
                }
            }
            ArclError::NestingTooDeep { max_depth, .. } => {
                DiagnosticMessageBuilder::error("Nesting too deep")
                    .problem(format!(
                        "Blocks and template applications nest deeper than {} levels",
                        max_depth
                    ))
                    .add_hint("Check for a template that inherits from itself?")
            }
            ArclError::InvalidArgument { path, reason } => {
                let builder = DiagnosticMessageBuilder::error("Invalid argument value")
                    .problem(reason.clone());
                if path.is_empty() {
                    builder
                } else {
                    builder.add_detail(format!("The value is at `{}`", path.join(".")))
                }
            }
            ArclError::Io(err) => {
                DiagnosticMessageBuilder::error("Unreadable file").problem(err.to_string())
            }
        };

        let builder = builder.with_code(self.code());
        match self.location() {
            Some(location) => builder.with_location(location).build(),
            None => builder.build(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcl_error_reporting::get_error_info;

    #[test]
    fn test_every_code_is_in_the_catalog() {
        let errors = vec![
            ArclError::UnexpectedCharacter {
                found: '$',
                mode: "main",
                location: SourceInfo::default(),
            },
            ArclError::MisplacedSpread {
                location: SourceInfo::default(),
            },
            ArclError::IncompatibleContent {
                block: Shape::Map,
                item: Shape::List,
                location: SourceInfo::default(),
            },
            ArclError::NestingTooDeep {
                max_depth: 4,
                location: SourceInfo::default(),
            },
            ArclError::InvalidArgument {
                path: vec![],
                reason: "null".to_string(),
            },
            ArclError::Io(std::io::Error::other("gone")),
        ];
        for error in errors {
            assert!(
                get_error_info(error.code()).is_some(),
                "{} is not in the catalog",
                error.code()
            );
        }
    }

    #[test]
    fn test_incompatible_content_message() {
        let error = ArclError::IncompatibleContent {
            block: Shape::Map,
            item: Shape::List,
            location: SourceInfo::default(),
        };
        insta::assert_snapshot!(error.to_string(), @"Cannot add a list entry to a map at 1:1");
    }

    #[test]
    fn test_incompatible_merge_message_names_path() {
        let error = ArclError::IncompatibleMerge {
            left: Shape::Map,
            right: Shape::String,
            path: vec!["card".to_string(), "style".to_string()],
            location: SourceInfo::default(),
        };
        insta::assert_snapshot!(
            error.to_string(),
            @"Cannot merge a string onto a map at `card.style` at 1:1"
        );
        let diagnostic = error.to_diagnostic();
        assert_eq!(diagnostic.code.as_deref(), Some("A-5-5"));
        assert_eq!(diagnostic.details.len(), 1);
    }

    #[test]
    fn test_diagnostic_carries_location() {
        let error = ArclError::FromAfterContent {
            location: SourceInfo::default(),
        };
        let diagnostic = error.to_diagnostic();
        assert_eq!(diagnostic.location, Some(SourceInfo::default()));
        assert_eq!(diagnostic.hints.len(), 1);
    }

    #[test]
    fn test_argument_errors_have_no_location() {
        let error = ArclError::InvalidArgument {
            path: vec!["a".to_string(), "0".to_string()],
            reason: "null has no ARCL representation".to_string(),
        };
        assert_eq!(error.location(), None);
        insta::assert_snapshot!(
            error.to_string(),
            @"Invalid argument value at `a.0`: null has no ARCL representation"
        );
    }
}
