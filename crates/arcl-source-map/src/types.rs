/*
 * types.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Core location types

use serde::{Deserialize, Serialize};

/// A unique identifier for a source file registered in a [`crate::SourceContext`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(pub usize);

/// A location in source text (0-indexed)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// Byte offset from start of source
    pub offset: usize,
    /// Row number (0-indexed)
    pub row: usize,
    /// Column number (0-indexed, in characters not bytes)
    pub column: usize,
}

impl Location {
    /// The location just past `text`, when `text` starts at `self`.
    pub fn advance(self, text: &str) -> Location {
        let mut location = self;
        for ch in text.chars() {
            location.offset += ch.len_utf8();
            if ch == '\n' {
                location.row += 1;
                location.column = 0;
            } else {
                location.column += 1;
            }
        }
        location
    }
}

/// A range in source text from start to end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    /// Start location (inclusive)
    pub start: Location,
    /// End location (exclusive)
    pub end: Location,
}

impl Range {
    /// An empty range positioned at `location`.
    pub fn empty_at(location: Location) -> Self {
        Range {
            start: location,
            end: location,
        }
    }

    /// The smallest range covering both `self` and `other`.
    pub fn cover(&self, other: &Range) -> Range {
        Range {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Length of the range in bytes.
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
