/*
 * registry.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template registry.
//!
//! Templates are `@template`-annotated tagged values declared at the top
//! level of a document. Registration stores the AST node without evaluating
//! it; the value is evaluated each time a block applies the template with
//! `@from`.

use crate::ast::{Item, Path, TaggedValue, ValueNode};
use crate::error::{ArclError, ArclResult};
use crate::resolve::key_text;
use arcl_source_map::SourceInfo;
use indexmap::IndexMap;

/// Templates declared in one document, by name.
#[derive(Debug, Default)]
pub struct TemplateRegistry<'a> {
    templates: IndexMap<String, &'a TaggedValue>,
}

impl<'a> TemplateRegistry<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template. A later declaration with the same name replaces
    /// the earlier one.
    pub fn register(&mut self, name: String, template: &'a TaggedValue) {
        tracing::debug!(
            template = %name,
            at = %template.source_info,
            "registered template"
        );
        self.templates.insert(name, template);
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Resolve a template path to the value node to evaluate.
    ///
    /// The first component names a registered template. Each further
    /// component selects a tagged entry of the block reached so far; the last
    /// entry with that key wins.
    pub fn lookup(&self, path: &Path, location: SourceInfo) -> ArclResult<&'a ValueNode> {
        let not_found = || ArclError::NoSuchTemplate {
            path: path.to_string(),
            location,
        };

        let (first, rest) = path.components.split_first().ok_or_else(not_found)?;
        let template = self.templates.get(first).ok_or_else(not_found)?;

        let mut node: &'a ValueNode = &template.value;
        for component in rest {
            let ValueNode::Block(block) = node else {
                return Err(not_found());
            };
            node = block
                .items
                .iter()
                .rev()
                .find_map(|item| entry_named(item, component))
                .ok_or_else(not_found)?;
        }
        Ok(node)
    }
}

/// The value of `item` if it is a plain tagged entry keyed `name`.
fn entry_named<'a>(item: &'a Item, name: &str) -> Option<&'a ValueNode> {
    match item {
        Item::TaggedValue(tagged) if !tagged.is_template() => {
            // Keys that need an argument cannot be addressed by path
            let key = key_text(&tagged.key, None).ok()?;
            (key == name).then_some(&tagged.value)
        }
        _ => None,
    }
}
