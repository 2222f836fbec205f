/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Structured diagnostics for ARCL.
//!
//! Errors raised while scanning, parsing or evaluating an ARCL document are
//! converted into [`DiagnosticMessage`]s. Each message carries an error code
//! from the embedded [catalog](catalog), a title, a problem statement, details
//! and hints. Messages render either as text (with an ariadne source snippet
//! when the source is available) or as JSON for tooling.
//!
//! # Example
//!
//! ```
//! use arcl_error_reporting::DiagnosticMessageBuilder;
//!
//! let msg = DiagnosticMessageBuilder::error("No such template")
//!     .with_code("A-5-1")
//!     .add_detail("`base.card` was never declared")
//!     .build();
//!
//! assert_eq!(
//!     msg.problem.as_deref(),
//!     Some(arcl_error_reporting::get_error_info("A-5-1").unwrap().message_template.as_str())
//! );
//! assert!(msg.to_text(None).starts_with("Error [A-5-1]: No such template"));
//! ```

pub mod builder;
pub mod catalog;
pub mod diagnostic;

pub use builder::DiagnosticMessageBuilder;
pub use catalog::{ERROR_CATALOG, ErrorCodeInfo, get_error_info};
pub use diagnostic::{DetailItem, DetailKind, DiagnosticMessage};
