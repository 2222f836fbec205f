/*
 * ast.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Document AST types.
//!
//! A document is a block: an ordered sequence of [`Item`]s. Every node carries
//! the source location it was parsed from so that evaluation errors can point
//! at the offending input. Locations are left out when the AST is serialized.

use arcl_source_map::SourceInfo;
use serde::Serialize;
use std::fmt;

/// One line-level item of a block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Item {
    /// An empty line.
    BlankLine {
        #[serde(skip)]
        source_info: SourceInfo,
    },

    /// `# text`
    Comment(Comment),

    /// `@from path`: inherit from a template.
    From(FromDirective),

    /// `[key] value`: a map entry, or a template when annotated with
    /// `@template`.
    TaggedValue(TaggedValue),

    /// `- value`: a list entry.
    UntaggedValue(UntaggedValue),

    /// A line of string fragments.
    MultilineStringLine(StringLine),

    /// `<<*>>` or `<<path.*>>` alone on a line: spread a non-string value
    /// into the block.
    PlaceholderEntry(PlaceholderEntry),
}

impl Item {
    pub fn source_info(&self) -> SourceInfo {
        match self {
            Item::BlankLine { source_info } => *source_info,
            Item::Comment(comment) => comment.source_info,
            Item::From(from) => from.source_info,
            Item::TaggedValue(tagged) => tagged.source_info,
            Item::UntaggedValue(untagged) => untagged.source_info,
            Item::MultilineStringLine(line) => line.source_info,
            Item::PlaceholderEntry(entry) => entry.source_info,
        }
    }

    /// Whether this item contributes to the block's value.
    pub fn is_content(&self) -> bool {
        !matches!(
            self,
            Item::BlankLine { .. } | Item::Comment(_) | Item::From(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    /// Comment text, without the leading `#`.
    pub text: String,
    #[serde(skip)]
    pub source_info: SourceInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FromDirective {
    pub path: Path,
    #[serde(skip)]
    pub source_info: SourceInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggedValue {
    pub key: Key,
    pub value: ValueNode,
    /// Location of the `@template` annotation, if present.
    #[serde(serialize_with = "serialize_annotation")]
    pub template_annotation: Option<SourceInfo>,
    #[serde(skip)]
    pub source_info: SourceInfo,
}

impl TaggedValue {
    pub fn is_template(&self) -> bool {
        self.template_annotation.is_some()
    }
}

fn serialize_annotation<S: serde::Serializer>(
    annotation: &Option<SourceInfo>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_bool(annotation.is_some())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UntaggedValue {
    pub value: ValueNode,
    #[serde(skip)]
    pub source_info: SourceInfo,
}

/// A key in brackets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Key {
    /// `[text]`: trimmed, with backslash escapes removed.
    SimpleKey {
        text: String,
        #[serde(skip)]
        source_info: SourceInfo,
    },

    /// A key whose body spans lines of string fragments.
    MultilineKey {
        lines: Vec<KeyLine>,
        #[serde(skip)]
        source_info: SourceInfo,
    },
}

impl Key {
    pub fn source_info(&self) -> SourceInfo {
        match self {
            Key::SimpleKey { source_info, .. } | Key::MultilineKey { source_info, .. } => {
                *source_info
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum KeyLine {
    Comment(Comment),
    MultilineStringLine(StringLine),
}

/// The value of a tagged or untagged entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ValueNode {
    /// The rest of the line, trimmed and taken verbatim.
    SimpleString {
        text: String,
        #[serde(skip)]
        source_info: SourceInfo,
    },

    /// `{ ... }`
    Block(Block),

    /// One or more lines of string fragments on the lines below the key.
    StringExpression(StringExpression),
}

impl ValueNode {
    pub fn source_info(&self) -> SourceInfo {
        match self {
            ValueNode::SimpleString { source_info, .. } => *source_info,
            ValueNode::Block(block) => block.source_info,
            ValueNode::StringExpression(expression) => expression.source_info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub items: Vec<Item>,
    #[serde(skip)]
    pub source_info: SourceInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringExpression {
    pub lines: Vec<StringLine>,
    #[serde(skip)]
    pub source_info: SourceInfo,
}

/// One line of string fragments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringLine {
    pub elements: Vec<StringElement>,
    #[serde(skip)]
    pub source_info: SourceInfo,
}

impl StringLine {
    /// Whether the line's last element is a `+` continuation.
    pub fn ends_with_plus(&self) -> bool {
        matches!(self.elements.last(), Some(StringElement::Plus { .. }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StringElement {
    /// A decoded string literal.
    StringLiteral {
        value: String,
        #[serde(skip)]
        source_info: SourceInfo,
    },
    Placeholder(Placeholder),
    /// `+`: suppresses the newline between this line and the next.
    Plus {
        #[serde(skip)]
        source_info: SourceInfo,
    },
}

/// `<<path>>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placeholder {
    pub path: Path,
    #[serde(skip)]
    pub source_info: SourceInfo,
}

/// `<<path.*>>`, or `<<*>>` with an empty path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceholderEntry {
    pub path: Path,
    #[serde(skip)]
    pub source_info: SourceInfo,
}

/// A dotted chain of identifiers and string literals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path {
    pub components: Vec<String>,
    #[serde(skip)]
    pub source_info: SourceInfo,
}

impl Path {
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The components as borrowed strings, for value lookup.
    pub fn names(&self) -> Vec<&str> {
        self.components.iter().map(String::as_str).collect()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return f.write_str("*");
        }
        f.write_str(&self.components.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(components: &[&str]) -> Path {
        Path {
            components: components.iter().map(|c| c.to_string()).collect(),
            source_info: SourceInfo::default(),
        }
    }

    #[test]
    fn test_path_display() {
        assert_eq!(path(&["base", "card"]).to_string(), "base.card");
        assert_eq!(path(&[]).to_string(), "*");
    }

    #[test]
    fn test_content_items() {
        let blank = Item::BlankLine {
            source_info: SourceInfo::default(),
        };
        let from = Item::From(FromDirective {
            path: path(&["t"]),
            source_info: SourceInfo::default(),
        });
        let entry = Item::PlaceholderEntry(PlaceholderEntry {
            path: path(&[]),
            source_info: SourceInfo::default(),
        });
        assert!(!blank.is_content());
        assert!(!from.is_content());
        assert!(entry.is_content());
    }

    #[test]
    fn test_ends_with_plus() {
        let line = StringLine {
            elements: vec![
                StringElement::StringLiteral {
                    value: "a".to_string(),
                    source_info: SourceInfo::default(),
                },
                StringElement::Plus {
                    source_info: SourceInfo::default(),
                },
            ],
            source_info: SourceInfo::default(),
        };
        assert!(line.ends_with_plus());
    }

    #[test]
    fn test_serialization_omits_locations() {
        let item = Item::TaggedValue(TaggedValue {
            key: Key::SimpleKey {
                text: "name".to_string(),
                source_info: SourceInfo::default(),
            },
            value: ValueNode::SimpleString {
                text: "Alice".to_string(),
                source_info: SourceInfo::default(),
            },
            template_annotation: None,
            source_info: SourceInfo::default(),
        });
        insta::assert_snapshot!(
            serde_json::to_string(&item).unwrap(),
            @r#"{"type":"taggedValue","key":{"type":"simpleKey","text":"name"},"value":{"type":"simpleString","text":"Alice"},"templateAnnotation":false}"#
        );
    }
}
