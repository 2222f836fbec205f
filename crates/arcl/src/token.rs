/*
 * token.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Tokens produced by the scanner.

use arcl_source_map::SourceInfo;
use std::fmt;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Spaces and tabs. Produced by the scanner, dropped before parsing.
    Whitespace,
    Newline,
    /// `<<`
    OpenAngled,
    /// `>>`
    CloseAngled,
    /// `{`
    OpenCurly,
    /// `}`
    CloseCurly,
    /// `[`
    OpenSquare,
    /// `]`
    CloseSquare,
    /// `#`
    Hash,
    /// `-`
    Minus,
    /// `+`
    Plus,
    /// `.`
    Dot,
    /// `*`
    Star,
    /// `@name`
    Directive,
    /// A JSON-style double-quoted string, quotes included
    StringLiteral,
    Identifier,
    /// The body of a single-line key, up to the closing `]`
    KeyText,
    /// Free-form text following a `-`, `#` or `]` marker
    Line,
}

impl TokenKind {
    /// Name used in token dumps.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::Newline => "newline",
            TokenKind::OpenAngled => "openAngled",
            TokenKind::CloseAngled => "closeAngled",
            TokenKind::OpenCurly => "openCurly",
            TokenKind::CloseCurly => "closeCurly",
            TokenKind::OpenSquare => "openSquare",
            TokenKind::CloseSquare => "closeSquare",
            TokenKind::Hash => "hash",
            TokenKind::Minus => "minus",
            TokenKind::Plus => "plus",
            TokenKind::Dot => "dot",
            TokenKind::Star => "star",
            TokenKind::Directive => "directive",
            TokenKind::StringLiteral => "stringLiteral",
            TokenKind::Identifier => "identifier",
            TokenKind::KeyText => "keyText",
            TokenKind::Line => "line",
        }
    }

    /// How the kind reads in error messages ("a newline", "`{`").
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::Newline => "a newline",
            TokenKind::OpenAngled => "`<<`",
            TokenKind::CloseAngled => "`>>`",
            TokenKind::OpenCurly => "`{`",
            TokenKind::CloseCurly => "`}`",
            TokenKind::OpenSquare => "`[`",
            TokenKind::CloseSquare => "`]`",
            TokenKind::Hash => "`#`",
            TokenKind::Minus => "`-`",
            TokenKind::Plus => "`+`",
            TokenKind::Dot => "`.`",
            TokenKind::Star => "`*`",
            TokenKind::Directive => "a directive",
            TokenKind::StringLiteral => "a string literal",
            TokenKind::Identifier => "an identifier",
            TokenKind::KeyText => "key text",
            TokenKind::Line => "line text",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token produced by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// The exact source text of the token.
    pub text: String,
    pub source_info: SourceInfo,
}

impl Token {
    /// 1-based line of the token's first character.
    pub fn line(&self) -> usize {
        self.source_info.line()
    }

    /// 1-based column of the token's first character.
    pub fn column(&self) -> usize {
        self.source_info.column()
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// How this token reads in error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Directive | TokenKind::Identifier | TokenKind::StringLiteral => {
                format!("{} `{}`", self.kind.describe(), self.text)
            }
            kind => kind.describe().to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:?}", self.source_info, self.kind, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcl_source_map::{FileId, Location, Range};

    fn token(kind: TokenKind, text: &str) -> Token {
        let start = Location {
            offset: 4,
            row: 1,
            column: 2,
        };
        Token {
            kind,
            text: text.to_string(),
            source_info: SourceInfo::original(
                FileId(0),
                Range {
                    start,
                    end: start.advance(text),
                },
            ),
        }
    }

    #[test]
    fn test_line_and_column() {
        let t = token(TokenKind::Identifier, "base");
        assert_eq!(t.line(), 2);
        assert_eq!(t.column(), 3);
    }

    #[test]
    fn test_describe_includes_text_for_named_tokens() {
        assert_eq!(
            token(TokenKind::Directive, "@include").describe(),
            "a directive `@include`"
        );
        assert_eq!(token(TokenKind::Newline, "\n").describe(), "a newline");
    }

    #[test]
    fn test_display() {
        insta::assert_snapshot!(
            token(TokenKind::OpenSquare, "[").to_string(),
            @r#"2:3 openSquare "[""#
        );
    }
}
