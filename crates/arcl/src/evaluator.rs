/*
 * evaluator.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Block evaluation.
//!
//! A block's items are evaluated in order into an accumulator whose shape is
//! fixed by the first content item: string lines make a string, tagged
//! values make a map, untagged values make a list. A block that declares
//! `@from` hands its accumulated value to the named template as the
//! template's argument, and the template's result becomes the block's value.
//!
//! Evaluation never returns a partial value; the first error ends the call.

use crate::ast::{FromDirective, Item, PlaceholderEntry, StringLine, ValueNode};
use crate::error::{ArclError, ArclResult};
use crate::merge::append_spread;
use crate::parser::{DEFAULT_MAX_DEPTH, Document};
use crate::registry::TemplateRegistry;
use crate::resolve::{append_string_line, join_lines, key_text, resolve_spread};
use crate::value::{Shape, Value};
use arcl_source_map::SourceInfo;
use indexmap::IndexMap;

/// Options for evaluating a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalOptions {
    /// Maximum nesting of blocks and template applications.
    pub max_depth: usize,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EvalOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Document {
    /// Evaluate the document without an argument.
    ///
    /// An empty document evaluates to `None`.
    pub fn evaluate(&self) -> ArclResult<Option<Value>> {
        self.evaluate_with(None, &EvalOptions::default())
    }

    /// Evaluate the document with `argument` available to placeholders.
    pub fn evaluate_with_argument(&self, argument: &Value) -> ArclResult<Option<Value>> {
        self.evaluate_with(Some(argument), &EvalOptions::default())
    }

    pub fn evaluate_with(
        &self,
        argument: Option<&Value>,
        options: &EvalOptions,
    ) -> ArclResult<Option<Value>> {
        let mut context = EvalContext::new(options);
        // The document itself is not a nested block
        let value = context.evaluate_items(&self.items, argument, true)?;
        tracing::debug!(
            templates = context.registry.len(),
            shape = ?value.as_ref().map(|v| v.shape()),
            "evaluated document"
        );
        Ok(value)
    }
}

/// State threaded through one evaluation call.
///
/// The registry is filled by the top-level block's pre-pass and read by every
/// `@from` below it.
struct EvalContext<'a> {
    registry: TemplateRegistry<'a>,
    max_depth: usize,
    /// Current nesting of blocks and template applications.
    depth: usize,
}

impl<'a> EvalContext<'a> {
    fn new(options: &EvalOptions) -> Self {
        Self {
            registry: TemplateRegistry::new(),
            max_depth: options.max_depth,
            depth: 0,
        }
    }

    fn enter(&mut self, location: SourceInfo) -> ArclResult<()> {
        if self.depth >= self.max_depth {
            return Err(ArclError::NestingTooDeep {
                max_depth: self.max_depth,
                location,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn evaluate_block(
        &mut self,
        items: &'a [Item],
        argument: Option<&Value>,
        location: SourceInfo,
    ) -> ArclResult<Option<Value>> {
        self.enter(location)?;
        let result = self.evaluate_items(items, argument, false);
        self.leave();
        result
    }

    fn evaluate_items(
        &mut self,
        items: &'a [Item],
        argument: Option<&Value>,
        top_level: bool,
    ) -> ArclResult<Option<Value>> {
        self.register_templates(items, argument, top_level)?;

        let mut accumulator = Accumulator::default();
        let mut parent: Option<&'a FromDirective> = None;
        let mut reached_content = false;

        for item in items {
            match item {
                Item::BlankLine { .. } | Item::Comment(_) => {}
                Item::From(from) => {
                    if reached_content {
                        return Err(ArclError::FromAfterContent {
                            location: from.source_info,
                        });
                    }
                    parent = Some(from);
                }
                // Declared in the pre-pass
                Item::TaggedValue(tagged) if tagged.is_template() => {
                    reached_content = true;
                }
                Item::TaggedValue(tagged) => {
                    reached_content = true;
                    accumulator.lock(Shape::Map, tagged.source_info)?;
                    let key = key_text(&tagged.key, argument)?;
                    let value = self.evaluate_value(&tagged.value, argument)?;
                    accumulator.insert(key, value);
                }
                Item::UntaggedValue(untagged) => {
                    reached_content = true;
                    accumulator.lock(Shape::List, untagged.source_info)?;
                    let value = self.evaluate_value(&untagged.value, argument)?;
                    accumulator.push(value);
                }
                Item::MultilineStringLine(line) => {
                    reached_content = true;
                    accumulator.lock(Shape::String, line.source_info)?;
                    accumulator.append_line(line, argument)?;
                }
                Item::PlaceholderEntry(entry) => {
                    reached_content = true;
                    accumulator.spread(entry, argument)?;
                }
            }
        }

        match parent {
            Some(from) => self.apply_template(from, accumulator.value),
            None => Ok(accumulator.value),
        }
    }

    /// Register this block's templates. Only the top-level block may declare
    /// any.
    fn register_templates(
        &mut self,
        items: &'a [Item],
        argument: Option<&Value>,
        top_level: bool,
    ) -> ArclResult<()> {
        for item in items {
            let Item::TaggedValue(tagged) = item else {
                continue;
            };
            let Some(annotation) = tagged.template_annotation else {
                continue;
            };
            if !top_level {
                return Err(ArclError::NestedTemplate {
                    name: key_text(&tagged.key, argument).unwrap_or_default(),
                    location: annotation,
                });
            }
            self.registry.register(key_text(&tagged.key, argument)?, tagged);
        }
        Ok(())
    }

    /// Evaluate the template named by `from` with `argument`.
    fn apply_template(
        &mut self,
        from: &FromDirective,
        argument: Option<Value>,
    ) -> ArclResult<Option<Value>> {
        let template = self.registry.lookup(&from.path, from.source_info)?;
        tracing::debug!(
            template = %from.path,
            at = %from.source_info,
            argument = ?argument.as_ref().map(|v| v.shape()),
            "applying template"
        );

        self.enter(from.source_info)?;
        let result = self.evaluate_value(template, argument.as_ref());
        self.leave();
        result
    }

    fn evaluate_value(
        &mut self,
        node: &'a ValueNode,
        argument: Option<&Value>,
    ) -> ArclResult<Option<Value>> {
        match node {
            ValueNode::SimpleString { text, .. } => Ok(Some(Value::String(text.clone()))),
            ValueNode::Block(block) => {
                tracing::trace!(at = %block.source_info, items = block.items.len(), "evaluating block");
                self.evaluate_block(&block.items, argument, block.source_info)
            }
            ValueNode::StringExpression(expression) => {
                Ok(Some(Value::String(join_lines(&expression.lines, argument)?)))
            }
        }
    }
}

/// The value under construction for one block.
#[derive(Debug, Default)]
struct Accumulator {
    /// `None` until the first content item fixes the shape.
    value: Option<Value>,
    /// Whether the next string line starts on a new line.
    pending_newline: bool,
}

impl Accumulator {
    /// Fix the block's shape, or check an item against the fixed shape.
    fn lock(&mut self, shape: Shape, location: SourceInfo) -> ArclResult<()> {
        match &self.value {
            None => {
                self.value = Some(match shape {
                    Shape::String => Value::String(String::new()),
                    Shape::List => Value::List(Vec::new()),
                    Shape::Map => Value::Map(IndexMap::new()),
                });
                Ok(())
            }
            Some(value) if value.shape() == shape => Ok(()),
            Some(value) => Err(ArclError::IncompatibleContent {
                block: value.shape(),
                item: shape,
                location,
            }),
        }
    }

    /// Store a map entry. An absent value removes any earlier entry for `key`.
    fn insert(&mut self, key: String, value: Option<Value>) {
        if let Some(Value::Map(map)) = &mut self.value {
            match value {
                Some(value) => {
                    map.insert(key, value);
                }
                None => {
                    map.shift_remove(&key);
                }
            }
        }
    }

    /// Append a list element. An absent value adds no element.
    fn push(&mut self, value: Option<Value>) {
        if let (Some(Value::List(list)), Some(value)) = (&mut self.value, value) {
            list.push(value);
        }
    }

    fn append_line(&mut self, line: &StringLine, argument: Option<&Value>) -> ArclResult<()> {
        if let Some(Value::String(text)) = &mut self.value {
            append_string_line(text, self.pending_newline, line, argument)?;
            self.pending_newline = !line.ends_with_plus();
        }
        Ok(())
    }

    fn spread(&mut self, entry: &PlaceholderEntry, argument: Option<&Value>) -> ArclResult<()> {
        let Some(value) = resolve_spread(argument, entry)? else {
            return Ok(());
        };
        self.value = append_spread(self.value.take(), value)
            .map_err(|conflict| conflict.at(entry.source_info))?;
        // A spread string is a completed line
        if matches!(self.value, Some(Value::String(_))) {
            self.pending_newline = true;
        }
        Ok(())
    }
}
