/*
 * merge.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Shape-preserving merge of two values.
//!
//! The left operand's shape selects the operation:
//!
//! | left   | right   | result                                  |
//! |--------|---------|-----------------------------------------|
//! | absent | any     | right                                   |
//! | any    | absent  | left                                    |
//! | map    | map     | per-key recursive merge, right-biased   |
//! | list   | list    | right (override)                        |
//! | string | string  | right (override)                        |
//! | other combinations | | [`MergeConflict`]                    |
//!
//! Spread placeholders use [`append_spread`] instead, which concatenates
//! lists rather than overriding them.

use crate::error::ArclError;
use crate::value::{Shape, Value};
use arcl_source_map::SourceInfo;
use indexmap::IndexMap;

/// Two values of different shapes met during a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConflict {
    pub left: Shape,
    pub right: Shape,
    /// Keys leading to the conflicting values, outermost first
    pub path: Vec<String>,
}

impl MergeConflict {
    /// Attach the location of the item that triggered the merge.
    pub fn at(self, location: SourceInfo) -> ArclError {
        ArclError::IncompatibleMerge {
            left: self.left,
            right: self.right,
            path: self.path,
            location,
        }
    }
}

/// Merge `b` onto `a`.
///
/// ```
/// use arcl::{Value, merge};
/// use serde_json::json;
///
/// let a = Value::try_from(json!({"a": {"x": "1"}, "keep": ["1", "2"]})).unwrap();
/// let b = Value::try_from(json!({"a": {"y": "2"}, "keep": ["3"]})).unwrap();
/// let merged = merge(Some(a), Some(b)).unwrap().unwrap();
///
/// let expected = Value::try_from(json!({"a": {"x": "1", "y": "2"}, "keep": ["3"]})).unwrap();
/// assert_eq!(merged, expected);
/// ```
pub fn merge(a: Option<Value>, b: Option<Value>) -> Result<Option<Value>, MergeConflict> {
    let mut path = Vec::new();
    merge_at(a, b, &mut path)
}

fn merge_at(
    a: Option<Value>,
    b: Option<Value>,
    path: &mut Vec<String>,
) -> Result<Option<Value>, MergeConflict> {
    let (a, b) = match (a, b) {
        (None, b) => return Ok(b),
        (a, None) => return Ok(a),
        (Some(a), Some(b)) => (a, b),
    };

    match (a, b) {
        (Value::Map(left), Value::Map(right)) => Ok(Some(Value::Map(merge_maps(left, right, path)?))),
        (Value::List(_), Value::List(right)) => Ok(Some(Value::List(right))),
        (Value::String(_), Value::String(right)) => Ok(Some(Value::String(right))),
        (left, right) => Err(MergeConflict {
            left: left.shape(),
            right: right.shape(),
            path: path.clone(),
        }),
    }
}

fn merge_maps(
    mut left: IndexMap<String, Value>,
    right: IndexMap<String, Value>,
    path: &mut Vec<String>,
) -> Result<IndexMap<String, Value>, MergeConflict> {
    for (key, value) in right {
        path.push(key.clone());
        // Keep the key's original position when it already exists
        let merged = match left.get_mut(&key) {
            Some(existing) => {
                let current = std::mem::replace(existing, Value::String(String::new()));
                merge_at(Some(current), Some(value), path)?
            }
            None => Some(value),
        };
        path.pop();
        if let Some(merged) = merged {
            left.insert(key, merged);
        }
    }
    Ok(left)
}

/// Append a spread value onto a block's accumulated value.
///
/// Lists concatenate; everything else follows [`merge`].
pub fn append_spread(
    accumulator: Option<Value>,
    value: Value,
) -> Result<Option<Value>, MergeConflict> {
    match (accumulator, value) {
        (Some(Value::List(mut items)), Value::List(more)) => {
            items.extend(more);
            Ok(Some(Value::List(items)))
        }
        (accumulator, value) => merge(accumulator, Some(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::try_from(json).unwrap()
    }

    #[test]
    fn test_absent_is_identity() {
        for value in [v(json!("s")), v(json!(["a"])), v(json!({"k": "v"}))] {
            assert_eq!(merge(Some(value.clone()), None), Ok(Some(value.clone())));
            assert_eq!(merge(None, Some(value.clone())), Ok(Some(value)));
        }
        assert_eq!(merge(None, None), Ok(None));
    }

    #[test]
    fn test_maps_merge_recursively() {
        let merged = merge(
            Some(v(json!({"a": {"x": "1"}, "b": "keep"}))),
            Some(v(json!({"a": {"y": "2"}, "c": "new"}))),
        )
        .unwrap();
        assert_eq!(
            merged,
            Some(v(json!({"a": {"x": "1", "y": "2"}, "b": "keep", "c": "new"})))
        );
    }

    #[test]
    fn test_right_biased_keeps_left_key_order() {
        let merged = merge(
            Some(v(json!({"first": "1", "second": "2"}))),
            Some(v(json!({"second": "two", "first": "one"}))),
        )
        .unwrap()
        .unwrap();
        let keys: Vec<_> = merged.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["first", "second"]);
        assert_eq!(merged, v(json!({"first": "one", "second": "two"})));
    }

    #[test]
    fn test_lists_and_strings_override() {
        assert_eq!(
            merge(Some(v(json!(["1", "2"]))), Some(v(json!(["3"])))),
            Ok(Some(v(json!(["3"]))))
        );
        assert_eq!(
            merge(Some(v(json!("old"))), Some(v(json!("new")))),
            Ok(Some(v(json!("new"))))
        );
    }

    #[test]
    fn test_shape_mismatch_reports_path() {
        let conflict = merge(
            Some(v(json!({"card": {"style": {"color": "red"}}}))),
            Some(v(json!({"card": {"style": "plain"}}))),
        )
        .unwrap_err();
        assert_eq!(
            conflict,
            MergeConflict {
                left: Shape::Map,
                right: Shape::String,
                path: vec!["card".to_string(), "style".to_string()],
            }
        );
    }

    #[test]
    fn test_top_level_mismatch() {
        let conflict = merge(Some(v(json!(["a"]))), Some(v(json!({"k": "v"})))).unwrap_err();
        assert_eq!(conflict.left, Shape::List);
        assert_eq!(conflict.right, Shape::Map);
        assert!(conflict.path.is_empty());
    }

    #[test]
    fn test_append_spread_concatenates_lists() {
        assert_eq!(
            append_spread(Some(v(json!(["1", "2"]))), v(json!(["3"]))),
            Ok(Some(v(json!(["1", "2", "3"]))))
        );
    }

    #[test]
    fn test_append_spread_adopts_and_merges() {
        assert_eq!(
            append_spread(None, v(json!({"a": "1"}))),
            Ok(Some(v(json!({"a": "1"}))))
        );
        assert_eq!(
            append_spread(Some(v(json!({"a": "1"}))), v(json!({"b": "2"}))),
            Ok(Some(v(json!({"a": "1", "b": "2"}))))
        );
        assert!(append_spread(Some(v(json!("s"))), v(json!(["x"]))).is_err());
    }
}
