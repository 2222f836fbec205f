/*
 * builder.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Builder API for diagnostic messages.
//!
//! The builder follows the four-part message structure used throughout ARCL:
//! a short title, a problem statement, a handful of details and optional hints.

use crate::diagnostic::{DetailItem, DetailKind, DiagnosticMessage};
use arcl_source_map::SourceInfo;

/// Builder for creating diagnostic messages.
///
/// 1. **Title**: Brief error message (via `.error()`)
/// 2. **Problem**: What went wrong (via `.problem()`)
/// 3. **Details**: Specific information (via `.add_detail()`, `.add_info()`)
/// 4. **Hints**: Optional guidance (via `.add_hint()`)
///
/// # Example
///
/// ```
/// use arcl_error_reporting::DiagnosticMessageBuilder;
///
/// let error = DiagnosticMessageBuilder::error("Incompatible merge")
///     .with_code("A-5-5")
///     .problem("A list cannot be merged into a map")
///     .add_detail("The template produces a map")
///     .add_detail("The override produces a list")
///     .add_hint("Wrap the list in a keyed entry?")
///     .build();
///
/// assert_eq!(error.title, "Incompatible merge");
/// assert_eq!(error.code, Some("A-5-5".to_string()));
/// assert_eq!(error.details.len(), 2);
/// assert_eq!(error.hints.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DiagnosticMessageBuilder {
    title: String,
    code: Option<String>,
    problem: Option<String>,
    details: Vec<DetailItem>,
    hints: Vec<String>,
    location: Option<SourceInfo>,
}

impl DiagnosticMessageBuilder {
    /// Start an error diagnostic with the given title.
    pub fn error(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            code: None,
            problem: None,
            details: Vec::new(),
            hints: Vec::new(),
            location: None,
        }
    }

    /// Set the error code.
    ///
    /// Codes follow the format `A-<subsystem>-<number>` and are listed in
    /// the [error catalog](crate::catalog).
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the problem statement.
    pub fn problem(mut self, stmt: impl Into<String>) -> Self {
        self.problem = Some(stmt.into());
        self
    }

    /// Add an error detail (✖ bullet).
    pub fn add_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(DetailItem {
            kind: DetailKind::Error,
            content: detail.into(),
            location: None,
        });
        self
    }

    /// Add an error detail pointing at a source location.
    ///
    /// Located details become secondary labels in source snippets.
    pub fn add_detail_at(mut self, detail: impl Into<String>, location: SourceInfo) -> Self {
        self.details.push(DetailItem {
            kind: DetailKind::Error,
            content: detail.into(),
            location: Some(location),
        });
        self
    }

    /// Add an info detail (ℹ bullet).
    pub fn add_info(mut self, info: impl Into<String>) -> Self {
        self.details.push(DetailItem {
            kind: DetailKind::Info,
            content: info.into(),
            location: None,
        });
        self
    }

    /// Add a hint for fixing the error.
    ///
    /// Hints that suggest an action end with a question mark.
    pub fn add_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    /// Attach the main source location of the diagnostic.
    pub fn with_location(mut self, location: SourceInfo) -> Self {
        self.location = Some(location);
        self
    }

    /// Build the diagnostic message.
    ///
    /// When a code is set but no problem statement was given, the catalog's
    /// default explanation is used.
    pub fn build(self) -> DiagnosticMessage {
        let problem = self.problem.or_else(|| {
            self.code
                .as_deref()
                .and_then(crate::catalog::get_error_info)
                .map(|info| info.message_template.clone())
        });
        DiagnosticMessage {
            code: self.code,
            title: self.title,
            problem,
            details: self.details,
            hints: self.hints,
            location: self.location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcl_source_map::FileId;

    #[test]
    fn test_builder_error() {
        let msg = DiagnosticMessageBuilder::error("Test error").build();
        assert_eq!(msg.title, "Test error");
        assert!(msg.problem.is_none());
        assert_eq!(msg.to_json()["kind"], "error");
    }

    #[test]
    fn test_builder_details_keep_order() {
        let location = SourceInfo {
            file_id: FileId(3),
            ..SourceInfo::default()
        };
        let msg = DiagnosticMessageBuilder::error("Test")
            .add_detail("Detail 1")
            .add_info("Info 1")
            .add_detail_at("Detail 2", location)
            .add_info("Info 2")
            .build();

        let kinds: Vec<_> = msg.details.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DetailKind::Error,
                DetailKind::Info,
                DetailKind::Error,
                DetailKind::Info
            ]
        );
        assert!(msg.details[0].location.is_none());
        assert_eq!(msg.details[2].location, Some(location));
    }

    #[test]
    fn test_builder_problem_defaults_from_catalog() {
        let msg = DiagnosticMessageBuilder::error("Unknown directive")
            .with_code("A-2-3")
            .build();
        assert_eq!(
            msg.problem.as_deref(),
            Some("Only @from and @template directives are recognized.")
        );
    }

    #[test]
    fn test_builder_explicit_problem_wins() {
        let msg = DiagnosticMessageBuilder::error("Unknown directive")
            .with_code("A-2-3")
            .problem("`@include` is not a directive")
            .build();
        assert_eq!(msg.problem.as_deref(), Some("`@include` is not a directive"));
    }

    #[test]
    fn test_builder_unknown_code_has_no_problem() {
        let msg = DiagnosticMessageBuilder::error("Odd")
            .with_code("A-99-1")
            .build();
        assert!(msg.problem.is_none());
    }

    #[test]
    fn test_builder_location() {
        let location = SourceInfo::default();
        let msg = DiagnosticMessageBuilder::error("Test")
            .with_location(location)
            .add_hint("Did you mean X?")
            .add_hint("Try Y instead?")
            .build();
        assert_eq!(msg.location, Some(location));
        assert_eq!(msg.hints.len(), 2);
    }
}
