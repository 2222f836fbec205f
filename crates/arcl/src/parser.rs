/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Recursive-descent tree builder.
//!
//! Consumes the significant token stream and produces the document AST.
//! The grammar is LL(1): every decision is made on the next token alone, so
//! a well-formed stream has exactly one derivation.
//!
//! ```text
//! document    := item* EOF
//! block       := '{' NL item* '}' (NL | EOF)
//! item        := NL | '#' (line | '{')* NL | '@from' path NL
//!              | '@template' tagged | tagged | '-' value
//!              | spread NL | stringLine
//! tagged      := '[' key value
//! key         := keyText? ']' | NL keyLine* ']'
//! value       := line (NL | EOF) | block | NL mainValue
//!              | mainValue                (directly after a multiline key)
//! mainValue   := block | stringLine+
//! stringLine  := (stringLiteral | placeholder | '+')+ (NL | EOF)
//! placeholder := '<<' path '>>'
//! spread      := '<<' (path '.')? '*' '>>'
//! ```

use crate::ast::{
    Block, Comment, FromDirective, Item, Key, KeyLine, Path, Placeholder, PlaceholderEntry,
    StringElement, StringExpression, StringLine, TaggedValue, UntaggedValue, ValueNode,
};
use crate::error::{ArclError, ArclResult};
use crate::scanner::tokenize_file;
use crate::token::{Token, TokenKind};
use arcl_source_map::{FileId, Location, Range, SourceContext, SourceInfo};

/// Default limit for nested blocks and template applications.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// A parsed ARCL document.
///
/// Parsing happens once; the document can then be evaluated any number of
/// times with different arguments.
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) items: Vec<Item>,
    pub(crate) source_info: SourceInfo,
    /// The document's file, for rendering diagnostics.
    pub(crate) source_context: SourceContext,
}

impl Document {
    /// Parse a document from source text.
    pub fn parse(source: &str) -> ArclResult<Self> {
        Parser::new(source).parse()
    }

    /// Parse a document, recording `filename` for error reporting.
    pub fn parse_with_filename(source: &str, filename: &str) -> ArclResult<Self> {
        Parser::new(source).with_filename(filename).parse()
    }

    /// Read and parse a document from disk.
    pub fn parse_file(path: &std::path::Path) -> ArclResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::parse_with_filename(&source, &path.to_string_lossy())
    }

    /// The document's top-level items.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn source_info(&self) -> SourceInfo {
        self.source_info
    }

    /// Source context holding this document's file and content.
    pub fn source_context(&self) -> &SourceContext {
        &self.source_context
    }
}

/// Parser configuration.
///
/// ```
/// use arcl::Parser;
///
/// let document = Parser::new("[a] b\n")
///     .with_filename("inline.arcl")
///     .with_max_depth(8)
///     .parse()
///     .unwrap();
/// assert_eq!(document.items().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    source: &'a str,
    filename: String,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            filename: "<input>".to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_filename(mut self, filename: &str) -> Self {
        self.filename = filename.to_string();
        self
    }

    /// Set the maximum block nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn parse(self) -> ArclResult<Document> {
        let mut source_context = SourceContext::new();
        let file_id = source_context.add_file(self.filename.clone(), Some(self.source.to_string()));

        let tokens = tokenize_file(self.source, file_id)?;
        let mut builder = TreeBuilder::new(self.source, tokens, file_id, self.max_depth);
        let items = builder.parse_items(false)?;

        let end = Location::default().advance(self.source);
        let source_info = SourceInfo::original(
            file_id,
            Range {
                start: Location::default(),
                end,
            },
        );
        tracing::debug!(file = %self.filename, items = items.len(), "parsed document");

        Ok(Document {
            items,
            source_info,
            source_context,
        })
    }
}

const STRING_LINE_EXPECTED: &str = "a string literal, a placeholder or `+`";

struct TreeBuilder<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    /// Source info of the last consumed token
    previous: SourceInfo,
    /// Empty source info at the end of the input
    end: SourceInfo,
    depth: usize,
    max_depth: usize,
}

/// A `<<...>>` reference before it is known whether it may be a spread.
enum PlaceholderRef {
    Value(Placeholder),
    Spread(PlaceholderEntry),
}

impl<'a> TreeBuilder<'a> {
    fn new(source: &'a str, tokens: Vec<Token>, file_id: FileId, max_depth: usize) -> Self {
        let end = SourceInfo::original(file_id, Range::empty_at(Location::default().advance(source)));
        Self {
            source,
            tokens,
            pos: 0,
            previous: SourceInfo::original(file_id, Range::default()),
            end,
            depth: 0,
            max_depth,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn at_line_end(&self) -> bool {
        matches!(self.peek_kind(), None | Some(TokenKind::Newline))
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        self.previous = token.source_info;
        Some(token)
    }

    /// Source info from `start` to the end of the last consumed token.
    fn span_from(&self, start: SourceInfo) -> SourceInfo {
        start.to(&self.previous)
    }

    fn unexpected(&self, expected: &str) -> ArclError {
        match self.peek() {
            Some(token) => ArclError::UnexpectedToken {
                found: token.describe(),
                expected: expected.to_string(),
                location: token.source_info,
            },
            None => ArclError::UnexpectedEof {
                expected: expected.to_string(),
                location: self.end,
            },
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> ArclResult<Token> {
        if self.at(kind) {
            // at() guarantees a token
            self.bump().ok_or_else(|| self.unexpected(expected))
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Consume a newline; the end of input also ends a line.
    fn expect_line_end(&mut self, expected: &str) -> ArclResult<()> {
        match self.peek_kind() {
            None => Ok(()),
            Some(TokenKind::Newline) => {
                // Line terminators never extend an item's span
                let previous = self.previous;
                self.bump();
                self.previous = previous;
                Ok(())
            }
            Some(_) => Err(self.unexpected(expected)),
        }
    }

    fn enter_block(&mut self, location: SourceInfo) -> ArclResult<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ArclError::NestingTooDeep {
                max_depth: self.max_depth,
                location,
            });
        }
        Ok(())
    }

    fn parse_items(&mut self, in_block: bool) -> ArclResult<Vec<Item>> {
        let mut items = Vec::new();
        loop {
            match self.peek_kind() {
                None if in_block => return Err(self.unexpected("`}`")),
                None => break,
                Some(TokenKind::CloseCurly) if in_block => break,
                Some(TokenKind::CloseCurly) => {
                    return Err(self.unexpected("a block item (this `}` closes no block)"));
                }
                Some(_) => items.push(self.parse_item()?),
            }
        }
        Ok(items)
    }

    fn parse_item(&mut self) -> ArclResult<Item> {
        let Some(token) = self.peek() else {
            return Err(self.unexpected("a block item"));
        };
        let start = token.source_info;
        let kind = token.kind;

        match kind {
            TokenKind::Newline => {
                self.bump();
                Ok(Item::BlankLine { source_info: start })
            }
            TokenKind::Hash => Ok(Item::Comment(self.parse_comment()?)),
            TokenKind::Directive => self.parse_directive(),
            TokenKind::OpenSquare => Ok(Item::TaggedValue(self.parse_tagged(None)?)),
            TokenKind::Minus => {
                self.bump();
                let value = self.parse_value(false)?;
                Ok(Item::UntaggedValue(UntaggedValue {
                    value,
                    source_info: self.span_from(start),
                }))
            }
            TokenKind::OpenAngled => match self.parse_placeholder_ref()? {
                PlaceholderRef::Spread(entry) => {
                    if !self.at_line_end() {
                        return Err(ArclError::MisplacedSpread {
                            location: entry.source_info,
                        });
                    }
                    self.expect_line_end("the end of the line")?;
                    Ok(Item::PlaceholderEntry(entry))
                }
                PlaceholderRef::Value(placeholder) => {
                    let first = StringElement::Placeholder(placeholder);
                    Ok(Item::MultilineStringLine(self.parse_string_line(Some(first))?))
                }
            },
            TokenKind::StringLiteral | TokenKind::Plus => {
                Ok(Item::MultilineStringLine(self.parse_string_line(None)?))
            }
            _ => Err(self.unexpected("a block item")),
        }
    }

    fn parse_comment(&mut self) -> ArclResult<Comment> {
        let hash = self.expect(TokenKind::Hash, "`#`")?;
        while matches!(
            self.peek_kind(),
            Some(TokenKind::Line | TokenKind::OpenCurly)
        ) {
            self.bump();
        }
        let source_info = self.span_from(hash.source_info);
        let text = self
            .source
            .get(hash.source_info.end_offset()..source_info.end_offset())
            .unwrap_or_default()
            .trim()
            .to_string();
        self.expect_line_end("the end of the comment")?;
        Ok(Comment { text, source_info })
    }

    fn parse_directive(&mut self) -> ArclResult<Item> {
        let directive = self.expect(TokenKind::Directive, "a directive")?;
        match directive.text.as_str() {
            "@from" => {
                let path = self.parse_template_path()?;
                let source_info = self.span_from(directive.source_info);
                self.expect_line_end("`.` or the end of the line")?;
                Ok(Item::From(FromDirective { path, source_info }))
            }
            "@template" => {
                if !self.at(TokenKind::OpenSquare) {
                    return Err(self.unexpected("`[` after @template"));
                }
                let tagged = self.parse_tagged(Some(directive.source_info))?;
                Ok(Item::TaggedValue(tagged))
            }
            _ => Err(ArclError::UnknownDirective {
                name: directive.text,
                location: directive.source_info,
            }),
        }
    }

    /// `component ('.' component)*` in main mode.
    fn parse_template_path(&mut self) -> ArclResult<Path> {
        let mut components = vec![self.parse_path_component("a template name")?];
        let start = self.previous;
        while self.at(TokenKind::Dot) {
            self.bump();
            components.push(self.parse_path_component("a template name after `.`")?);
        }
        Ok(Path {
            components,
            source_info: self.span_from(start),
        })
    }

    fn parse_path_component(&mut self, expected: &str) -> ArclResult<String> {
        match self.peek_kind() {
            Some(TokenKind::Identifier) => Ok(self.bump().map(|t| t.text).unwrap_or_default()),
            Some(TokenKind::StringLiteral) => {
                let token = self.expect(TokenKind::StringLiteral, expected)?;
                decode_string_literal(&token)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    /// `'<<' path '>>'` or `'<<' (path '.')? '*' '>>'`
    fn parse_placeholder_ref(&mut self) -> ArclResult<PlaceholderRef> {
        let open = self.expect(TokenKind::OpenAngled, "`<<`")?;
        let mut components = Vec::new();

        loop {
            if self.at(TokenKind::Star) {
                self.bump();
                self.expect(TokenKind::CloseAngled, "`>>` after `*`")?;
                let source_info = self.span_from(open.source_info);
                return Ok(PlaceholderRef::Spread(PlaceholderEntry {
                    path: Path {
                        components,
                        source_info,
                    },
                    source_info,
                }));
            }

            components.push(self.parse_path_component("a placeholder path component or `*`")?);

            match self.peek_kind() {
                Some(TokenKind::Dot) => {
                    self.bump();
                }
                Some(TokenKind::CloseAngled) => {
                    self.bump();
                    let source_info = self.span_from(open.source_info);
                    return Ok(PlaceholderRef::Value(Placeholder {
                        path: Path {
                            components,
                            source_info,
                        },
                        source_info,
                    }));
                }
                _ => return Err(self.unexpected("`.` or `>>`")),
            }
        }
    }

    fn parse_string_element(&mut self) -> ArclResult<StringElement> {
        match self.peek_kind() {
            Some(TokenKind::StringLiteral) => {
                let token = self.expect(TokenKind::StringLiteral, "a string literal")?;
                Ok(StringElement::StringLiteral {
                    value: decode_string_literal(&token)?,
                    source_info: token.source_info,
                })
            }
            Some(TokenKind::Plus) => {
                let token = self.expect(TokenKind::Plus, "`+`")?;
                Ok(StringElement::Plus {
                    source_info: token.source_info,
                })
            }
            Some(TokenKind::OpenAngled) => match self.parse_placeholder_ref()? {
                PlaceholderRef::Value(placeholder) => Ok(StringElement::Placeholder(placeholder)),
                PlaceholderRef::Spread(entry) => Err(ArclError::MisplacedSpread {
                    location: entry.source_info,
                }),
            },
            _ => Err(self.unexpected(STRING_LINE_EXPECTED)),
        }
    }

    fn at_string_element(&self) -> bool {
        matches!(
            self.peek_kind(),
            Some(TokenKind::StringLiteral | TokenKind::OpenAngled | TokenKind::Plus)
        )
    }

    fn parse_string_line(&mut self, first: Option<StringElement>) -> ArclResult<StringLine> {
        let start = match &first {
            Some(StringElement::Placeholder(placeholder)) => placeholder.source_info,
            _ => self.peek().map_or(self.end, |t| t.source_info),
        };
        let mut elements: Vec<StringElement> = first.into_iter().collect();

        while self.at_string_element() {
            elements.push(self.parse_string_element()?);
        }
        if elements.is_empty() {
            return Err(self.unexpected(STRING_LINE_EXPECTED));
        }

        let source_info = self.span_from(start);
        let expected = format!("{} or the end of the line", STRING_LINE_EXPECTED);
        self.expect_line_end(&expected)?;
        Ok(StringLine {
            elements,
            source_info,
        })
    }

    fn parse_tagged(&mut self, annotation: Option<SourceInfo>) -> ArclResult<TaggedValue> {
        let open = self.expect(TokenKind::OpenSquare, "`[`")?;
        let start = annotation.unwrap_or(open.source_info);
        let key = self.parse_key(open.source_info)?;
        let after_multiline_key = matches!(key, Key::MultilineKey { .. });
        let value = self.parse_value(after_multiline_key)?;
        Ok(TaggedValue {
            key,
            value,
            template_annotation: annotation,
            source_info: self.span_from(start),
        })
    }

    fn parse_key(&mut self, open: SourceInfo) -> ArclResult<Key> {
        match self.peek_kind() {
            Some(TokenKind::KeyText) => {
                let text = self.bump().map(|t| t.text).unwrap_or_default();
                self.expect(TokenKind::CloseSquare, "`]`")?;
                Ok(Key::SimpleKey {
                    text: unescape_key(&text).trim().to_string(),
                    source_info: self.span_from(open),
                })
            }
            Some(TokenKind::CloseSquare) => {
                self.bump();
                Ok(Key::SimpleKey {
                    text: String::new(),
                    source_info: self.span_from(open),
                })
            }
            Some(TokenKind::Newline) => {
                self.bump();
                let mut lines = Vec::new();
                loop {
                    match self.peek_kind() {
                        Some(TokenKind::CloseSquare) => {
                            self.bump();
                            break;
                        }
                        Some(TokenKind::Newline) => {
                            self.bump();
                        }
                        Some(TokenKind::Hash) => lines.push(KeyLine::Comment(self.parse_comment()?)),
                        Some(TokenKind::StringLiteral | TokenKind::OpenAngled | TokenKind::Plus) => {
                            lines.push(KeyLine::MultilineStringLine(self.parse_string_line(None)?));
                        }
                        _ => return Err(self.unexpected("a key line or `]`")),
                    }
                }
                Ok(Key::MultilineKey {
                    lines,
                    source_info: self.span_from(open),
                })
            }
            _ => Err(self.unexpected("a key")),
        }
    }

    fn parse_value(&mut self, after_multiline_key: bool) -> ArclResult<ValueNode> {
        match self.peek_kind() {
            Some(TokenKind::Line) => {
                let token = self.expect(TokenKind::Line, "a value")?;
                let text = token.text.trim().to_string();
                self.expect_line_end("the end of the line")?;
                Ok(ValueNode::SimpleString {
                    text,
                    source_info: token.source_info,
                })
            }
            Some(TokenKind::OpenCurly) => Ok(ValueNode::Block(self.parse_block()?)),
            Some(TokenKind::Newline) => {
                self.bump();
                self.parse_main_value()
            }
            Some(_) if after_multiline_key => self.parse_main_value(),
            _ => Err(self.unexpected("a value")),
        }
    }

    fn parse_main_value(&mut self) -> ArclResult<ValueNode> {
        if self.at(TokenKind::OpenCurly) {
            return Ok(ValueNode::Block(self.parse_block()?));
        }
        if !self.at_string_element() {
            return Err(self.unexpected("a value (a block or string lines)"));
        }

        let start = self.peek().map_or(self.end, |t| t.source_info);
        let mut lines = Vec::new();
        while self.at_string_element() {
            lines.push(self.parse_string_line(None)?);
        }
        Ok(ValueNode::StringExpression(StringExpression {
            lines,
            source_info: self.span_from(start),
        }))
    }

    fn parse_block(&mut self) -> ArclResult<Block> {
        let open = self.expect(TokenKind::OpenCurly, "`{`")?;
        self.enter_block(open.source_info)?;
        self.expect(TokenKind::Newline, "a newline after `{`")?;
        let items = self.parse_items(true)?;
        self.expect(TokenKind::CloseCurly, "`}`")?;
        let source_info = self.span_from(open.source_info);
        self.expect_line_end("the end of the line after `}`")?;
        self.depth -= 1;
        Ok(Block { items, source_info })
    }
}

/// Decode a JSON-style string literal token.
fn decode_string_literal(token: &Token) -> ArclResult<String> {
    serde_json::from_str::<String>(&token.text).map_err(|err| ArclError::InvalidStringLiteral {
        reason: format!("cannot decode {}: {}", token.text, err),
        location: token.source_info,
    })
}

/// Remove backslash escapes from simple key text.
fn unescape_key(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                result.push(escaped);
                continue;
            }
        }
        result.push(c);
    }
    result
}
