/*
 * source_info.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Source information attached to tokens, AST nodes and diagnostics

use crate::types::{FileId, Range};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A range within a registered source file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// File the range belongs to
    pub file_id: FileId,
    /// The covered range
    pub range: Range,
}

impl SourceInfo {
    /// Create source info for a range of an original file
    pub fn original(file_id: FileId, range: Range) -> Self {
        SourceInfo { file_id, range }
    }

    /// Source info spanning from the start of `self` to the end of `other`.
    ///
    /// Both must belong to the same file; if they don't, `self` is returned.
    pub fn to(&self, other: &SourceInfo) -> SourceInfo {
        if self.file_id != other.file_id {
            return *self;
        }
        SourceInfo {
            file_id: self.file_id,
            range: self.range.cover(&other.range),
        }
    }

    pub fn start_offset(&self) -> usize {
        self.range.start.offset
    }

    pub fn end_offset(&self) -> usize {
        self.range.end.offset
    }

    /// 1-based line number of the start of the range
    pub fn line(&self) -> usize {
        self.range.start.row + 1
    }

    /// 1-based column number of the start of the range
    pub fn column(&self) -> usize {
        self.range.start.column + 1
    }
}

impl fmt::Display for SourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line(), self.column())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;

    fn info(file: usize, start: (usize, usize, usize), end: (usize, usize, usize)) -> SourceInfo {
        SourceInfo::original(
            FileId(file),
            Range {
                start: Location {
                    offset: start.0,
                    row: start.1,
                    column: start.2,
                },
                end: Location {
                    offset: end.0,
                    row: end.1,
                    column: end.2,
                },
            },
        )
    }

    #[test]
    fn test_line_and_column_are_one_based() {
        let si = info(0, (12, 2, 4), (15, 2, 7));
        assert_eq!(si.line(), 3);
        assert_eq!(si.column(), 5);
        assert_eq!(si.to_string(), "3:5");
    }

    #[test]
    fn test_to_spans_both_ranges() {
        let a = info(0, (0, 0, 0), (3, 0, 3));
        let b = info(0, (10, 1, 2), (14, 1, 6));
        let joined = a.to(&b);
        assert_eq!(joined.start_offset(), 0);
        assert_eq!(joined.end_offset(), 14);
    }

    #[test]
    fn test_to_ignores_other_files() {
        let a = info(0, (0, 0, 0), (3, 0, 3));
        let b = info(1, (10, 1, 2), (14, 1, 6));
        assert_eq!(a.to(&b), a);
    }

    #[test]
    fn test_default_is_empty_range_in_first_file() {
        let si = SourceInfo::default();
        assert_eq!(si.file_id, FileId(0));
        assert!(si.range.is_empty());
    }
}
