/*
 * value.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Evaluated ARCL values.
//!
//! Evaluation produces one of three shapes: a string, an ordered list, or a
//! key-ordered map. Every leaf is a string; ARCL has no numbers or booleans.
//! A block without content evaluates to no value at all, which the API models
//! as `Option<Value>` rather than a fourth variant.

use crate::error::ArclError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An evaluated ARCL value.
///
/// Serializes untagged, so a `Value` maps directly onto a JSON string, array
/// or object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

/// The shape of a [`Value`], used when reporting structural conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    String,
    List,
    Map,
}

impl Shape {
    /// How one item of a block of this shape is described in messages.
    pub fn entry_name(self) -> &'static str {
        match self {
            Shape::String => "a string fragment",
            Shape::List => "a list entry",
            Shape::Map => "a map entry",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::String => "string",
            Shape::List => "list",
            Shape::Map => "map",
        };
        f.write_str(name)
    }
}

impl Value {
    pub fn shape(&self) -> Shape {
        match self {
            Value::String(_) => Shape::String,
            Value::List(_) => Shape::List,
            Value::Map(_) => Shape::Map,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Get a nested value by path.
    ///
    /// Maps are indexed by key and lists by decimal position, so
    /// `get_path(&["items", "0", "name"])` on
    /// `{"items": [{"name": "a"}]}` returns `"a"`. An empty path returns
    /// the value itself.
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let Some((first, rest)) = path.split_first() else {
            return Some(self);
        };

        match self {
            Value::Map(entries) => entries.get(*first).and_then(|v| v.get_path(rest)),
            Value::List(items) => first
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index))
                .and_then(|v| v.get_path(rest)),
            Value::String(_) => None,
        }
    }

    /// Convert a JSON value supplied by a host into a `Value`.
    ///
    /// Numbers and booleans become their JSON text; `null` has no ARCL
    /// representation and is rejected.
    pub fn from_json(json: serde_json::Value) -> Result<Value, ArclError> {
        from_json_at(json, &mut Vec::new())
    }
}

fn from_json_at(json: serde_json::Value, path: &mut Vec<String>) -> Result<Value, ArclError> {
    match json {
        serde_json::Value::Null => Err(ArclError::InvalidArgument {
            path: path.clone(),
            reason: "null has no ARCL representation".to_string(),
        }),
        serde_json::Value::Bool(b) => Ok(Value::String(b.to_string())),
        serde_json::Value::Number(n) => Ok(Value::String(n.to_string())),
        serde_json::Value::String(s) => Ok(Value::String(s)),
        serde_json::Value::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                path.push(index.to_string());
                values.push(from_json_at(item, path)?);
                path.pop();
            }
            Ok(Value::List(values))
        }
        serde_json::Value::Object(entries) => {
            let mut values = IndexMap::with_capacity(entries.len());
            for (key, item) in entries {
                path.push(key.clone());
                let value = from_json_at(item, path)?;
                path.pop();
                values.insert(key, value);
            }
            Ok(Value::Map(values))
        }
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = ArclError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        Value::from_json(json)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(entries: IndexMap<String, Value>) -> Self {
        Value::Map(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> Value {
        Value::from_json(json!({
            "title": "Hello",
            "items": [{"name": "a"}, {"name": "b"}],
        }))
        .unwrap()
    }

    #[test]
    fn test_get_path_through_maps_and_lists() {
        let value = sample();
        assert_eq!(value.get_path(&[]), Some(&value));
        assert_eq!(value.get_path(&["title"]), Some(&Value::from("Hello")));
        assert_eq!(
            value.get_path(&["items", "1", "name"]),
            Some(&Value::from("b"))
        );
        assert_eq!(value.get_path(&["items", "2"]), None);
        assert_eq!(value.get_path(&["items", "x"]), None);
        assert_eq!(value.get_path(&["title", "length"]), None);
    }

    #[test]
    fn test_shape() {
        let value = sample();
        assert_eq!(value.shape(), Shape::Map);
        assert_eq!(value.get_path(&["items"]).unwrap().shape(), Shape::List);
        assert_eq!(Shape::List.to_string(), "list");
        assert_eq!(Shape::Map.entry_name(), "a map entry");
    }

    #[test]
    fn test_from_json_stringifies_scalars() {
        let value = Value::try_from(json!({"count": 3, "ok": true, "ratio": 0.5})).unwrap();
        assert_eq!(value.get_path(&["count"]), Some(&Value::from("3")));
        assert_eq!(value.get_path(&["ok"]), Some(&Value::from("true")));
        assert_eq!(value.get_path(&["ratio"]), Some(&Value::from("0.5")));
    }

    #[test]
    fn test_from_json_rejects_null_with_path() {
        let err = Value::from_json(json!({"a": [1, null]})).unwrap_err();
        match err {
            ArclError::InvalidArgument { path, .. } => assert_eq!(path, vec!["a", "1"]),
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_serializes_untagged_and_keeps_order() {
        let value = Value::from_json(json!({"z": "1", "a": ["x", {"m": "n"}]})).unwrap();
        let text = serde_json::to_string(&value).unwrap();
        assert_eq!(text, r#"{"z":"1","a":["x",{"m":"n"}]}"#);
    }

    #[test]
    fn test_deserializes_fixture_json() {
        let value: Value = serde_json::from_str(r#"["a", {"b": "c"}]"#).unwrap();
        let mut inner = IndexMap::new();
        inner.insert("b".to_string(), Value::from("c"));
        assert_eq!(
            value,
            Value::List(vec![Value::from("a"), Value::Map(inner)])
        );
    }
}
