/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Parser and evaluator for ARCL, a small hierarchical configuration language.
//!
//! An ARCL document is a block of line-oriented items:
//!
//! - `[key] value`: a map entry
//! - `- value`: a list entry
//! - `"text" <<placeholder>> +`: a line of string fragments
//! - `{ ... }`: a nested block as a value
//! - `@template [name] value`: a reusable template, top level only
//! - `@from name`: build the block from a template
//! - `<<*>>`, `<<path.*>>`: spread an argument value into the block
//! - `# comment`
//!
//! Each block evaluates to a string, a list or a map, depending on its first
//! content item. A block that uses `@from` passes its own value to the
//! template as the template's argument, which is how values are overridden.
//!
//! # Pipeline
//!
//! 1. [`Scanner`]: mode-stack tokenizer, filtered by [`SignificantTokens`]
//! 2. [`Parser`]: recursive-descent tree builder producing a [`Document`]
//! 3. [`Document::evaluate`]: template registration, evaluation and merging
//!
//! # Example
//!
//! ```
//! use arcl::Value;
//! use serde_json::json;
//!
//! let source = "\
//! @template [card] {
//!   [title] Untitled
//!   [color] red
//!   <<*>>
//! }
//! [cards] {
//!   - {
//!     @from card
//!   }
//!   - {
//!     @from card
//!     [title] Custom
//!   }
//! }
//! ";
//!
//! let value = arcl::evaluate(source).unwrap();
//! let expected = Value::try_from(json!({
//!     "cards": [
//!         {"title": "Untitled", "color": "red"},
//!         {"title": "Custom", "color": "red"}
//!     ]
//! }))
//! .unwrap();
//! assert_eq!(value, Some(expected));
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod merge;
pub mod parser;
pub mod registry;
mod resolve;
pub mod scanner;
pub mod token;
pub mod value;

// Re-export main types at crate root
pub use error::{ArclError, ArclResult};
pub use evaluator::EvalOptions;
pub use merge::{MergeConflict, append_spread, merge};
pub use parser::{DEFAULT_MAX_DEPTH, Document, Parser};
pub use registry::TemplateRegistry;
pub use scanner::{Mode, Scanner, SignificantTokens, tokenize};
pub use token::{Token, TokenKind};
pub use value::{Shape, Value};

/// Parse and evaluate `source` without an argument.
pub fn evaluate(source: &str) -> ArclResult<Option<Value>> {
    Document::parse(source)?.evaluate()
}

/// Parse and evaluate `source` with `argument` available to placeholders.
pub fn evaluate_with_argument(source: &str, argument: &Value) -> ArclResult<Option<Value>> {
    Document::parse(source)?.evaluate_with_argument(argument)
}
