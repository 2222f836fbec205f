/*
 * diagnostic.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Core diagnostic message types.

use arcl_source_map::{SourceContext, SourceInfo};
use serde::{Deserialize, Serialize};

/// How detail items are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailKind {
    /// Error detail (✖ bullet)
    Error,
    /// Info detail (ℹ bullet)
    Info,
}

impl DetailKind {
    fn bullet(self) -> &'static str {
        match self {
            DetailKind::Error => "✖",
            DetailKind::Info => "ℹ",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            DetailKind::Error => "error",
            DetailKind::Info => "info",
        }
    }
}

/// A detail item in a diagnostic message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailItem {
    pub kind: DetailKind,
    pub content: String,
    /// Optional source location this detail points at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceInfo>,
}

/// An error diagnostic.
///
/// Structure:
/// 1. **Code**: Optional error code (e.g., "A-3-1") for searchability
/// 2. **Title**: Brief error message
/// 3. **Problem**: What went wrong
/// 4. **Details**: Specific information, optionally located
/// 5. **Hints**: Optional guidance for fixing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub title: String,
    pub problem: Option<String>,
    pub details: Vec<DetailItem>,
    pub hints: Vec<String>,
    /// Where in the source the issue occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceInfo>,
}

impl DiagnosticMessage {
    /// Create an error diagnostic with just a title.
    pub fn error(title: impl Into<String>) -> Self {
        Self {
            code: None,
            title: title.into(),
            problem: None,
            details: Vec::new(),
            hints: Vec::new(),
            location: None,
        }
    }

    /// Render this diagnostic message as text.
    ///
    /// When the message has a location and `ctx` can supply the content of the
    /// file it points into, the output starts with an ariadne source snippet
    /// (which already shows title, code, problem and located details).
    /// Otherwise everything is rendered as bullet text:
    ///
    /// ```text
    /// Error [A-5-1]: No such template: base.card
    /// The template path does not name a declared template
    /// ✖ Error detail
    /// ℹ Info detail
    /// ? Hint
    /// ```
    ///
    /// # Example
    ///
    /// ```
    /// use arcl_error_reporting::DiagnosticMessageBuilder;
    ///
    /// let msg = DiagnosticMessageBuilder::error("Missing value")
    ///     .problem("No value was provided for `name`")
    ///     .add_hint("Pass an argument containing `name`?")
    ///     .build();
    /// let text = msg.to_text(None);
    /// assert!(text.contains("Error: Missing value"));
    /// assert!(text.contains("? Pass an argument"));
    /// ```
    pub fn to_text(&self, ctx: Option<&SourceContext>) -> String {
        let snippet = match (&self.location, ctx) {
            (Some(location), Some(ctx)) => self.render_ariadne_source_context(location, ctx),
            _ => None,
        };

        let mut lines = Vec::new();
        match snippet {
            Some(snippet) => {
                lines.push(snippet.trim_end().to_string());
                // ariadne shows everything that has a location
                for detail in self.details.iter().filter(|d| d.location.is_none()) {
                    lines.push(format!("{} {}", detail.kind.bullet(), detail.content));
                }
            }
            None => {
                let header = match &self.code {
                    Some(code) => format!("Error [{}]: {}", code, self.title),
                    None => format!("Error: {}", self.title),
                };
                match &self.location {
                    Some(location) => lines.push(format!("{} (at {})", header, location)),
                    None => lines.push(header),
                }
                if let Some(problem) = &self.problem {
                    lines.push(problem.clone());
                }
                for detail in &self.details {
                    lines.push(format!("{} {}", detail.kind.bullet(), detail.content));
                }
            }
        }

        for hint in &self.hints {
            lines.push(format!("? {}", hint));
        }

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    /// Render this diagnostic message as a JSON value.
    ///
    /// ```
    /// use arcl_error_reporting::DiagnosticMessage;
    ///
    /// let msg = DiagnosticMessage::error("Something went wrong");
    /// let json = msg.to_json();
    /// assert_eq!(json["kind"], "error");
    /// assert_eq!(json["title"], "Something went wrong");
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;

        let mut obj = json!({
            "kind": "error",
            "title": self.title,
        });

        if let Some(code) = &self.code {
            obj["code"] = json!(code);
        }
        if let Some(problem) = &self.problem {
            obj["problem"] = json!(problem);
        }
        if !self.details.is_empty() {
            let details: Vec<_> = self
                .details
                .iter()
                .map(|d| {
                    let mut detail = json!({
                        "kind": d.kind.as_str(),
                        "content": d.content,
                    });
                    if let Some(location) = &d.location {
                        detail["location"] = location_json(location);
                    }
                    detail
                })
                .collect();
            obj["details"] = json!(details);
        }
        if !self.hints.is_empty() {
            obj["hints"] = json!(self.hints);
        }
        if let Some(location) = &self.location {
            obj["location"] = location_json(location);
        }

        obj
    }

    fn render_ariadne_source_context(
        &self,
        location: &SourceInfo,
        ctx: &SourceContext,
    ) -> Option<String> {
        use ariadne::{Color, Config, Label, Report, ReportKind, Source};

        let file = ctx.get_file(location.file_id)?;
        let content = file.read_content()?;
        // ariadne counts characters, SourceInfo counts bytes
        let span_of = |info: &SourceInfo| {
            char_offset(&content, info.start_offset())..char_offset(&content, info.end_offset())
        };

        let main_span = span_of(location);
        let mut report = Report::build(ReportKind::Error, file.path.clone(), main_span.start)
            .with_config(Config::default().with_color(false));

        report = match &self.code {
            Some(code) => report.with_message(format!("[{}] {}", code, self.title)),
            None => report.with_message(&self.title),
        };

        let main_message = self.problem.as_deref().unwrap_or(&self.title);
        report = report.with_label(
            Label::new((file.path.clone(), main_span))
                .with_message(main_message)
                .with_color(Color::Red),
        );

        for detail in &self.details {
            let Some(detail_location) = &detail.location else {
                continue;
            };
            if detail_location.file_id != location.file_id {
                continue;
            }
            let color = match detail.kind {
                DetailKind::Error => Color::Red,
                DetailKind::Info => Color::Cyan,
            };
            report = report.with_label(
                Label::new((file.path.clone(), span_of(detail_location)))
                    .with_message(&detail.content)
                    .with_color(color),
            );
        }

        let mut output = Vec::new();
        report
            .finish()
            .write((file.path.clone(), Source::from(content.clone())), &mut output)
            .ok()?;

        String::from_utf8(output).ok()
    }
}

fn char_offset(content: &str, byte_offset: usize) -> usize {
    let clamped = byte_offset.min(content.len());
    content
        .char_indices()
        .take_while(|(index, _)| *index < clamped)
        .count()
}

fn location_json(location: &SourceInfo) -> serde_json::Value {
    serde_json::json!({
        "file": location.file_id.0,
        "line": location.line(),
        "column": location.column(),
        "start": location.start_offset(),
        "end": location.end_offset(),
    })
}
