/*
 * scanner.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Mode-stack scanner.
//!
//! The same character means different things in different places: `{` opens
//! a block after a key but is plain text inside a comment, and `-` starts a
//! list entry at the beginning of a line but is part of an identifier inside
//! a placeholder. The scanner therefore keeps a stack of lexical modes. Each
//! mode has a static rule table; the first rule whose pattern matches at the
//! current position wins, produces a token, and may push, pop or replace the
//! current mode.
//!
//! Whitespace is tokenized like everything else. [`SignificantTokens`] drops
//! it before the tokens reach the parser.

use crate::error::{ArclError, ArclResult};
use crate::token::{Token, TokenKind};
use arcl_source_map::{FileId, Location, Range, SourceInfo};
use once_cell::sync::Lazy;
use regex::Regex;

/// Lexical modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Top-level document context
    Main,
    /// Inside `[...]`, before the key is known to span lines
    Key,
    /// Inside a key that spans several lines
    MultilineKey,
    /// Free-form text following a `-`, `#`, `{` or `]` marker
    Line,
    /// Inside `<<...>>`
    Placeholder,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Main => "main",
            Mode::Key => "key",
            Mode::MultilineKey => "multilineKey",
            Mode::Line => "line",
            Mode::Placeholder => "placeholder",
        }
    }
}

/// What a matched rule does to the mode stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Stay,
    Push(Mode),
    Pop,
    /// Replace the current mode
    Switch(Mode),
}

struct Rule {
    kind: TokenKind,
    pattern: Regex,
    action: Action,
}

const WHITESPACE: &str = r"[ \t]+";
const NEWLINE: &str = r"\r?\n";
const STRING_LITERAL: &str = r#""(?:[^\n"\\]|\\.)*""#;
const IDENTIFIER: &str = r"[A-Za-z0-9][A-Za-z0-9_-]*";

fn rule(kind: TokenKind, pattern: &str, action: Action) -> Rule {
    let anchored = format!("^(?:{})", pattern);
    Rule {
        kind,
        pattern: Regex::new(&anchored).expect("scanner patterns are valid regular expressions"),
        action,
    }
}

static MAIN_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    use Action::*;
    use TokenKind::*;
    vec![
        rule(Whitespace, WHITESPACE, Stay),
        rule(Newline, NEWLINE, Stay),
        rule(OpenAngled, "<<", Push(Mode::Placeholder)),
        rule(OpenCurly, r"\{", Push(Mode::Line)),
        rule(CloseCurly, r"\}", Stay),
        rule(OpenSquare, r"\[", Push(Mode::Key)),
        rule(Hash, "#", Push(Mode::Line)),
        rule(Minus, "-", Push(Mode::Line)),
        rule(Plus, r"\+", Stay),
        rule(Dot, r"\.", Stay),
        rule(Directive, "@[A-Za-z0-9_]+", Stay),
        rule(StringLiteral, STRING_LITERAL, Stay),
        rule(Identifier, IDENTIFIER, Stay),
    ]
});

static KEY_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    use Action::*;
    use TokenKind::*;
    vec![
        rule(CloseSquare, r"\]", Switch(Mode::Line)),
        rule(Newline, NEWLINE, Switch(Mode::MultilineKey)),
        rule(KeyText, r"(?:[^\r\n\]\\]|\\.)+", Stay),
    ]
});

static LINE_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    use Action::*;
    use TokenKind::*;
    vec![
        rule(Whitespace, WHITESPACE, Stay),
        rule(Newline, NEWLINE, Pop),
        rule(OpenCurly, r"\{", Stay),
        rule(Line, r"[^ \t{\r\n][^\r\n]*", Stay),
    ]
});

static MULTILINE_KEY_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    use Action::*;
    use TokenKind::*;
    vec![
        rule(Whitespace, WHITESPACE, Stay),
        rule(Newline, NEWLINE, Stay),
        rule(CloseSquare, r"\]", Pop),
        rule(Hash, "#", Push(Mode::Line)),
        rule(Plus, r"\+", Stay),
        rule(OpenAngled, "<<", Push(Mode::Placeholder)),
        rule(StringLiteral, STRING_LITERAL, Stay),
    ]
});

static PLACEHOLDER_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    use Action::*;
    use TokenKind::*;
    vec![
        rule(Whitespace, WHITESPACE, Stay),
        rule(CloseAngled, ">>", Pop),
        rule(Dot, r"\.", Stay),
        rule(Star, r"\*", Stay),
        rule(Identifier, IDENTIFIER, Stay),
        rule(StringLiteral, STRING_LITERAL, Stay),
    ]
});

fn rules(mode: Mode) -> &'static [Rule] {
    match mode {
        Mode::Main => MAIN_RULES.as_slice(),
        Mode::Key => KEY_RULES.as_slice(),
        Mode::MultilineKey => MULTILINE_KEY_RULES.as_slice(),
        Mode::Line => LINE_RULES.as_slice(),
        Mode::Placeholder => PLACEHOLDER_RULES.as_slice(),
    }
}

/// Scanner over one source text.
///
/// Iterates over every token, whitespace included. Iteration stops after the
/// first error.
///
/// ```
/// use arcl::scanner::Scanner;
/// use arcl::token::TokenKind;
///
/// let kinds: Vec<TokenKind> = Scanner::new("[a] b\n")
///     .map(|token| token.unwrap().kind)
///     .collect();
/// assert_eq!(
///     kinds,
///     vec![
///         TokenKind::OpenSquare,
///         TokenKind::KeyText,
///         TokenKind::CloseSquare,
///         TokenKind::Whitespace,
///         TokenKind::Line,
///         TokenKind::Newline,
///     ]
/// );
/// ```
pub struct Scanner<'a> {
    source: &'a str,
    file_id: FileId,
    location: Location,
    mode_stack: Vec<Mode>,
    failed: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_file_id(source, FileId(0))
    }

    /// Scanner whose tokens point into the file registered as `file_id`.
    pub fn with_file_id(source: &'a str, file_id: FileId) -> Self {
        Self {
            source,
            file_id,
            location: Location::default(),
            mode_stack: vec![Mode::Main],
            failed: false,
        }
    }

    /// The current lexical mode.
    pub fn mode(&self) -> Mode {
        self.mode_stack.last().copied().unwrap_or(Mode::Main)
    }

    /// Wrap this scanner so that whitespace tokens are skipped.
    pub fn significant(self) -> SignificantTokens<Self> {
        SignificantTokens::new(self)
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Stay => {}
            Action::Push(mode) => self.mode_stack.push(mode),
            Action::Pop => {
                // Main is never popped
                if self.mode_stack.len() > 1 {
                    self.mode_stack.pop();
                }
            }
            Action::Switch(mode) => {
                if let Some(top) = self.mode_stack.last_mut() {
                    *top = mode;
                }
            }
        }
    }

    fn source_info(&self, start: Location, end: Location) -> SourceInfo {
        SourceInfo::original(self.file_id, Range { start, end })
    }

    fn unmatched(&self, rest: &str) -> ArclError {
        let found = rest.chars().next().unwrap_or('\0');
        let end = self.location.advance(&rest[..found.len_utf8().min(rest.len())]);
        let location = self.source_info(self.location, end);
        if found == '"' {
            ArclError::InvalidStringLiteral {
                reason: "unterminated string literal".to_string(),
                location,
            }
        } else {
            ArclError::UnexpectedCharacter {
                found,
                mode: self.mode().name(),
                location,
            }
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = ArclResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let rest = &self.source[self.location.offset..];
        if rest.is_empty() {
            return None;
        }

        let matched = rules(self.mode()).iter().find_map(|rule| {
            rule.pattern
                .find(rest)
                .filter(|m| !m.as_str().is_empty())
                .map(|m| (rule, m.as_str()))
        });

        let Some((rule, text)) = matched else {
            self.failed = true;
            return Some(Err(self.unmatched(rest)));
        };

        let start = self.location;
        let end = start.advance(text);
        let token = Token {
            kind: rule.kind,
            text: text.to_string(),
            source_info: self.source_info(start, end),
        };
        self.location = end;
        self.apply(rule.action);
        Some(Ok(token))
    }
}

/// Adapter that drops whitespace tokens from a token stream.
pub struct SignificantTokens<I> {
    inner: I,
}

impl<I> SignificantTokens<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }
}

impl<I> Iterator for SignificantTokens<I>
where
    I: Iterator<Item = ArclResult<Token>>,
{
    type Item = ArclResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .find(|item| !matches!(item, Ok(token) if token.is(TokenKind::Whitespace)))
    }
}

/// Scan `source` and return its significant tokens.
pub fn tokenize(source: &str) -> ArclResult<Vec<Token>> {
    tokenize_file(source, FileId(0))
}

pub(crate) fn tokenize_file(source: &str, file_id: FileId) -> ArclResult<Vec<Token>> {
    let tokens = Scanner::with_file_id(source, file_id)
        .significant()
        .collect::<ArclResult<Vec<_>>>()?;
    tracing::trace!(tokens = tokens.len(), "scanned document");
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use TokenKind::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn texts(source: &str) -> Vec<String> {
        tokenize(source).unwrap().into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_simple_tagged_value() {
        assert_eq!(
            kinds("[title] Hello world\n"),
            vec![OpenSquare, KeyText, CloseSquare, Line, Newline]
        );
        assert_eq!(
            texts("[title] Hello world\n"),
            vec!["[", "title", "]", "Hello world", "\n"]
        );
    }

    #[test]
    fn test_block_opener_after_key() {
        assert_eq!(
            kinds("[a] {\n- x\n}\n"),
            vec![
                OpenSquare,
                KeyText,
                CloseSquare,
                OpenCurly,
                Newline,
                Minus,
                Line,
                Newline,
                CloseCurly,
                Newline,
            ]
        );
    }

    #[test]
    fn test_braces_inside_line_text_are_text() {
        assert_eq!(texts("- a {b} c\n"), vec!["-", "a {b} c", "\n"]);
        assert_eq!(texts("# comment {\n"), vec!["#", "comment {", "\n"]);
    }

    #[test]
    fn test_escaped_bracket_in_key() {
        assert_eq!(texts("[a\\]b] c\n"), vec!["[", "a\\]b", "]", "c", "\n"]);
    }

    #[test]
    fn test_multiline_key() {
        assert_eq!(
            kinds("[\n\"a\" +\n<<name>>\n] x\n"),
            vec![
                OpenSquare,
                Newline,
                StringLiteral,
                Plus,
                Newline,
                OpenAngled,
                Identifier,
                CloseAngled,
                Newline,
                CloseSquare,
                Identifier,
                Newline,
            ]
        );
    }

    #[test]
    fn test_placeholder_path() {
        assert_eq!(
            kinds("<<a.\"b c\".*>>\n"),
            vec![
                OpenAngled,
                Identifier,
                Dot,
                StringLiteral,
                Dot,
                Star,
                CloseAngled,
                Newline,
            ]
        );
    }

    #[test]
    fn test_directive_path() {
        assert_eq!(
            texts("@from base.card-2\n"),
            vec!["@from", "base", ".", "card-2", "\n"]
        );
    }

    #[test]
    fn test_crlf_newlines() {
        assert_eq!(kinds("- a\r\n- b\r\n"), vec![Minus, Line, Newline, Minus, Line, Newline]);
    }

    #[test]
    fn test_whitespace_reaches_raw_scanner_only() {
        let raw: Vec<_> = Scanner::new("- a\n").map(|t| t.unwrap().kind).collect();
        assert_eq!(raw, vec![Minus, Whitespace, Line, Newline]);
        let filtered: Vec<_> = Scanner::new("- a\n")
            .significant()
            .map(|t| t.unwrap().kind)
            .collect();
        assert_eq!(filtered, vec![Minus, Line, Newline]);
    }

    #[test]
    fn test_mode_tracking() {
        let mut scanner = Scanner::new("[k");
        assert_eq!(scanner.mode(), Mode::Main);
        scanner.next();
        assert_eq!(scanner.mode(), Mode::Key);
    }

    #[test]
    fn test_token_locations() {
        let tokens = tokenize("- a\n[b] c\n").unwrap();
        let key = &tokens[4];
        assert_eq!(key.text, "b");
        assert_eq!((key.line(), key.column()), (2, 2));
        assert_eq!(key.source_info.start_offset(), 5);
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("- a\n$\n").unwrap_err();
        match err {
            ArclError::UnexpectedCharacter {
                found,
                mode,
                location,
            } => {
                assert_eq!(found, '$');
                assert_eq!(mode, "main");
                assert_eq!(location.to_string(), "2:1");
            }
            other => panic!("expected UnexpectedCharacter, got {other:?}"),
        }
    }

    #[test]
    fn test_newline_inside_placeholder_is_an_error() {
        let err = tokenize("\"x\" <<a\n").unwrap_err();
        assert!(matches!(
            err,
            ArclError::UnexpectedCharacter {
                found: '\n',
                mode: "placeholder",
                ..
            }
        ));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("\"abc\n").unwrap_err();
        assert_eq!(err.code(), "A-1-2");
    }

    #[test]
    fn test_scanner_stops_after_error() {
        let mut scanner = Scanner::new("$ - a");
        assert!(matches!(scanner.next(), Some(Err(_))));
        assert!(scanner.next().is_none());
    }
}
