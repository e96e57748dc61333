//! Nested value trees for instance data and annotations
//!
//! Values are a closed tagged-variant type: JSON-like scalars, sequences,
//! string-keyed mappings, plus the typed placeholders the platform layers on
//! top of plain data - references to other elements and handles to
//! externally stored static file content.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::elem_id::ElemId;

/// Placeholder for externally stored large content
///
/// Only the path and content digest travel with the element; the bytes live
/// outside the element model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticFileRef {
    pub filepath: String,
    pub hash: String,
}

impl StaticFileRef {
    pub fn new(filepath: &str, hash: &str) -> StaticFileRef {
        StaticFileRef {
            filepath: filepath.to_string(),
            hash: hash.to_string(),
        }
    }
}

/// A node in a nested value tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    /// Reference to another element or a value nested inside one
    Reference(ElemId),
    /// Externally stored static file content
    StaticFile(StaticFileRef),
}

impl Value {
    /// Empty top-level mapping, the shape of a fresh instance value
    pub fn empty_map() -> Value {
        Value::Map(BTreeMap::new())
    }

    /// Build a mapping from key/value pairs
    pub fn from_entries<K, I>(entries: I) -> Value
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut BTreeMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert from arbitrary JSON, mapping every node to its plain variant
    pub fn from_json(json: serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from_json(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Value {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value {
        Value::Number(n as f64)
    }
}

impl From<StaticFileRef> for Value {
    fn from(file: StaticFileRef) -> Value {
        Value::StaticFile(file)
    }
}

/// Control signal returned by a walk visitor for each visited node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStep {
    /// Descend into the node's children
    Recurse,
    /// Do not descend below this node; siblings are still visited
    Skip,
}

/// Visit every node of a value tree, parents before children
///
/// The visitor decides per node whether the walk descends into it.
pub fn walk_value<F>(value: &Value, visit: &mut F)
where
    F: FnMut(&Value) -> WalkStep,
{
    if visit(value) == WalkStep::Skip {
        return;
    }
    match value {
        Value::List(items) => {
            for item in items {
                walk_value(item, visit);
            }
        }
        Value::Map(entries) => {
            for entry in entries.values() {
                walk_value(entry, visit);
            }
        }
        _ => {}
    }
}
