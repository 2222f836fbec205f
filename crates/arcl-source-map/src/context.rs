/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Source context for managing files

use crate::source_info::SourceInfo;
use crate::types::FileId;
use serde::{Deserialize, Serialize};

/// Context for managing source files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceContext {
    files: Vec<SourceFile>,
}

/// A source file with content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// File path or identifier (e.g. `<input>` for in-memory documents)
    pub path: String,
    /// File content
    ///
    /// When `None`, the content is read from disk using `path` when needed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl SourceFile {
    /// The file content, read from disk for disk-backed files.
    pub fn read_content(&self) -> Option<String> {
        match &self.content {
            Some(content) => Some(content.clone()),
            None => std::fs::read_to_string(&self.path).ok(),
        }
    }
}

impl SourceContext {
    /// Create a new empty source context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the context and return its ID
    pub fn add_file(&mut self, path: String, content: Option<String>) -> FileId {
        let id = FileId(self.files.len());
        self.files.push(SourceFile { path, content });
        id
    }

    /// Get a file by ID
    pub fn get_file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0)
    }

    /// The text covered by `info`, for files whose content is held in memory.
    pub fn slice(&self, info: &SourceInfo) -> Option<&str> {
        let content = self.get_file(info.file_id)?.content.as_deref()?;
        content.get(info.start_offset()..info.end_offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Location, Range};

    #[test]
    fn test_empty_context() {
        let ctx = SourceContext::new();
        assert!(ctx.get_file(FileId(0)).is_none());
    }

    #[test]
    fn test_file_ids_are_sequential() {
        let mut ctx = SourceContext::new();
        let first = ctx.add_file("base.arcl".to_string(), Some("- a\n".to_string()));
        let second = ctx.add_file("site.arcl".to_string(), Some("- b\n".to_string()));

        assert_eq!(first, FileId(0));
        assert_eq!(second, FileId(1));
        assert_eq!(ctx.get_file(second).unwrap().path, "site.arcl");
    }

    #[test]
    fn test_slice_in_memory_content() {
        let mut ctx = SourceContext::new();
        let id = ctx.add_file("<input>".to_string(), Some("[title] Hello\n".to_string()));
        let info = SourceInfo::original(
            id,
            Range {
                start: Location {
                    offset: 8,
                    row: 0,
                    column: 8,
                },
                end: Location {
                    offset: 13,
                    row: 0,
                    column: 13,
                },
            },
        );
        assert_eq!(ctx.slice(&info), Some("Hello"));
    }

    #[test]
    fn test_slice_without_content() {
        let mut ctx = SourceContext::new();
        let id = ctx.add_file("missing.arcl".to_string(), None);
        let info = SourceInfo::original(id, Range::default());
        assert_eq!(ctx.slice(&info), None);
        assert_eq!(ctx.get_file(id).unwrap().read_content(), None);
    }

    #[test]
    fn test_serialization_skips_missing_content() {
        let mut ctx = SourceContext::new();
        ctx.add_file("disk.arcl".to_string(), None);
        let json = serde_json::to_string(&ctx).unwrap();
        assert!(!json.contains("\"content\""));
    }
}
