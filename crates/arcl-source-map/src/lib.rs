/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Source locations for ARCL documents.
//!
//! Every token, AST node and error produced while reading an ARCL document
//! carries a [`SourceInfo`]: the file it came from and the byte range it
//! covers. A [`SourceContext`] keeps the registered files (and, for in-memory
//! documents, their content) so that diagnostics can later print source
//! snippets.
//!
//! # Example
//!
//! ```rust
//! use arcl_source_map::*;
//!
//! let mut ctx = SourceContext::new();
//! let file_id = ctx.add_file("config.arcl".into(), Some("[name] Alice\n".into()));
//!
//! let range = Range {
//!     start: Location { offset: 1, row: 0, column: 1 },
//!     end: Location { offset: 5, row: 0, column: 5 },
//! };
//! let info = SourceInfo::original(file_id, range);
//!
//! assert_eq!(info.line(), 1);
//! assert_eq!(info.column(), 2);
//! assert_eq!(ctx.slice(&info), Some("name"));
//! ```

pub mod context;
pub mod source_info;
pub mod types;

pub use context::{SourceContext, SourceFile};
pub use source_info::SourceInfo;
pub use types::{FileId, Location, Range};
