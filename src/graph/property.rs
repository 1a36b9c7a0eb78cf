//! Attribute values for graph nodes and edges
//!
//! Nodes and edges carry a string-keyed map of [`PropertyValue`]s. Edge maps
//! are held behind a [`SharedProperties`] handle so that the forward and
//! reverse entries of one directed edge (or both endpoint entries of one
//! undirected edge) point at the same map.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Attribute value type
///
/// Supports:
/// - String
/// - Integer (i64)
/// - Float (f64)
/// - Boolean
/// - Array (Vec<PropertyValue>)
/// - Map (HashMap<String, PropertyValue>)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Array(Vec<PropertyValue>),
    Map(HashMap<String, PropertyValue>),
    Null,
}

impl PropertyValue {
    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    /// Get string value if this is a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get integer value if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

// Convenience conversions
impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<i32> for PropertyValue {
    fn from(i: i32) -> Self {
        PropertyValue::Integer(i as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        PropertyValue::Float(f)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Boolean(b)
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(arr: Vec<PropertyValue>) -> Self {
        PropertyValue::Array(arr)
    }
}

impl From<HashMap<String, PropertyValue>> for PropertyValue {
    fn from(map: HashMap<String, PropertyValue>) -> Self {
        PropertyValue::Map(map)
    }
}

impl From<serde_json::Value> for PropertyValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => PropertyValue::Null,
            Value::Bool(b) => PropertyValue::Boolean(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => PropertyValue::Integer(i),
                // u64 beyond i64::MAX and real numbers both land here
                None => PropertyValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => PropertyValue::String(s),
            Value::Array(arr) => PropertyValue::Array(arr.into_iter().map(Into::into).collect()),
            Value::Object(obj) => {
                PropertyValue::Map(obj.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

/// Property map for storing node and edge attributes
pub type PropertyMap = HashMap<String, PropertyValue>;

/// Attribute map shared between the mirrored index entries of one edge
pub type SharedProperties = Rc<RefCell<PropertyMap>>;

/// Wrap a map in a fresh shared handle
pub fn share(properties: PropertyMap) -> SharedProperties {
    Rc::new(RefCell::new(properties))
}

/// Build a property map from a JSON object literal.
///
/// Non-object values produce an empty map.
pub fn properties_from_json(value: serde_json::Value) -> PropertyMap {
    match value {
        serde_json::Value::Object(obj) => obj.into_iter().map(|(k, v)| (k, v.into())).collect(),
        _ => PropertyMap::new(),
    }
}

/// Merge `incoming` into `target`; incoming keys win.
pub fn merge_properties(target: &mut PropertyMap, incoming: PropertyMap) {
    target.extend(incoming);
}

/// True when every key/value pair of `pattern` is present and equal in `properties`
pub fn matches_subset(properties: &PropertyMap, pattern: &PropertyMap) -> bool {
    pattern
        .iter()
        .all(|(key, value)| properties.get(key) == Some(value))
}
