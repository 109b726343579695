//! Semi-structured query representation
//!
//! A [`Query`] is a loose mapping from field names to [`QueryValue`]s. Callers
//! may put any key in it; the optimizer only reads the well-known keys listed
//! in [`keys`] and treats every one of them as optional.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;

/// Well-known query keys
pub mod keys {
    /// Vector payload for similarity search
    pub const QUERY_VECTOR: &str = "query_vector";
    /// Requested number of vector results
    pub const MAX_VECTOR_RESULTS: &str = "max_vector_results";
    /// Free-text query (preferred)
    pub const QUERY_TEXT: &str = "query_text";
    /// Free-text query (short form)
    pub const QUERY: &str = "query";
    /// Nested traversal settings
    pub const TRAVERSAL: &str = "traversal";
    /// Traversal depth inside [`TRAVERSAL`]
    pub const MAX_DEPTH: &str = "max_depth";
    /// Edge-type filters inside [`TRAVERSAL`]
    pub const EDGE_TYPES: &str = "edge_types";
    /// Priority tag
    pub const PRIORITY: &str = "priority";
    /// Explicit graph-type override
    pub const GRAPH_TYPE: &str = "graph_type";
    /// Per-call cache opt-out
    pub const SKIP_CACHE: &str = "skip_cache";
    /// Explicit single-source marker
    pub const ENTITY_SOURCE: &str = "entity_source";
    /// List of entity sources
    pub const ENTITY_SOURCES: &str = "entity_sources";
    /// List of entity identifiers
    pub const ENTITY_IDS: &str = "entity_ids";
}

/// Default requested result count when a vector is present
pub const DEFAULT_MAX_VECTOR_RESULTS: i64 = 5;

/// Default traversal depth
pub const DEFAULT_MAX_DEPTH: i64 = 2;

/// Default priority tag
pub const DEFAULT_PRIORITY: &str = "normal";

/// A single query value.
///
/// Floats are allowed to be non-finite. Such values are legal inside a query
/// but have no canonical JSON form.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// Absent / null
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point, possibly NaN or infinite
    Float(f64),
    /// Text
    Text(String),
    /// Ordered sequence
    List(Vec<QueryValue>),
    /// Nested mapping, keys sorted
    Map(BTreeMap<String, QueryValue>),
}

impl QueryValue {
    /// Size hint used by signatures and normalization.
    ///
    /// Lists and maps report their element count, text its character count,
    /// null zero and every other scalar one.
    pub fn len_hint(&self) -> usize {
        match self {
            QueryValue::Null => 0,
            QueryValue::Bool(_) | QueryValue::Int(_) | QueryValue::Float(_) => 1,
            QueryValue::Text(s) => s.chars().count(),
            QueryValue::List(items) => items.len(),
            QueryValue::Map(entries) => entries.len(),
        }
    }

    /// Borrow as text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow as a list
    pub fn as_list(&self) -> Option<&[QueryValue]> {
        match self {
            QueryValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow as a nested mapping
    pub fn as_map(&self) -> Option<&BTreeMap<String, QueryValue>> {
        match self {
            QueryValue::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Read as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            QueryValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert to JSON.
    ///
    /// Returns `None` when the value (or anything nested in it) is a
    /// non-finite float, which JSON cannot represent.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        use serde_json::Value;

        Some(match self {
            QueryValue::Null => Value::Null,
            QueryValue::Bool(b) => Value::Bool(*b),
            QueryValue::Int(i) => Value::from(*i),
            QueryValue::Float(f) => Value::Number(serde_json::Number::from_f64(*f)?),
            QueryValue::Text(s) => Value::String(s.clone()),
            QueryValue::List(items) => Value::Array(
                items
                    .iter()
                    .map(QueryValue::to_json)
                    .collect::<Option<Vec<_>>>()?,
            ),
            QueryValue::Map(entries) => {
                let mut object = serde_json::Map::new();
                for (key, value) in entries {
                    object.insert(key.clone(), value.to_json()?);
                }
                Value::Object(object)
            }
        })
    }
}

/// Plain rendering: text without quotes, containers as compact JSON.
impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Null => write!(f, "null"),
            QueryValue::Bool(b) => write!(f, "{}", b),
            QueryValue::Int(i) => write!(f, "{}", i),
            QueryValue::Float(x) => write!(f, "{}", x),
            QueryValue::Text(s) => write!(f, "{}", s),
            QueryValue::List(_) | QueryValue::Map(_) => match self.to_json() {
                Some(json) => write!(f, "{}", json),
                None => write!(f, "{:?}", self),
            },
        }
    }
}

impl From<serde_json::Value> for QueryValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => QueryValue::Null,
            Value::Bool(b) => QueryValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => QueryValue::Int(i),
                // u64 beyond i64::MAX and all non-integers
                None => QueryValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => QueryValue::Text(s),
            Value::Array(items) => QueryValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(entries) => QueryValue::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        QueryValue::Int(value as i64)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Int(value)
    }
}

impl From<usize> for QueryValue {
    fn from(value: usize) -> Self {
        match i64::try_from(value) {
            Ok(i) => QueryValue::Int(i),
            Err(_) => QueryValue::Float(value as f64),
        }
    }
}

impl From<f32> for QueryValue {
    fn from(value: f32) -> Self {
        QueryValue::Float(value as f64)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Float(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        QueryValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<Query> for QueryValue {
    fn from(query: Query) -> Self {
        QueryValue::Map(query.fields)
    }
}

/// A semi-structured query.
///
/// Fields are held in a sorted map, so iteration order never depends on the
/// order keys were inserted in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    fields: BTreeMap<String, QueryValue>,
}

impl Query {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a field, returning the previous value
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<QueryValue>,
    ) -> Option<QueryValue> {
        self.fields.insert(key.into(), value.into())
    }

    /// Look up a field
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.fields.get(key)
    }

    /// Whether a field is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the query has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &QueryValue)> {
        self.fields.iter()
    }

    /// Borrow the underlying sorted map
    pub fn fields(&self) -> &BTreeMap<String, QueryValue> {
        &self.fields
    }

    /// Free-text component: `query_text` if it is text, otherwise `query`.
    pub fn text(&self) -> Option<&str> {
        self.get(keys::QUERY_TEXT)
            .and_then(QueryValue::as_str)
            .or_else(|| self.get(keys::QUERY).and_then(QueryValue::as_str))
    }

    /// Whether the caller asked for this query to bypass caching
    pub fn skip_cache(&self) -> bool {
        self.get(keys::SKIP_CACHE)
            .and_then(QueryValue::as_bool)
            .unwrap_or(false)
    }

    /// Build a query from a JSON object
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Object(entries) => Ok(Self {
                fields: entries
                    .into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect(),
            }),
            other => Err(Error::invalid_query(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Parse a query from JSON text
    pub fn parse(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_json(value)
    }

    /// Convert to a JSON object, `None` if a non-finite float is present
    pub fn to_json(&self) -> Option<serde_json::Value> {
        QueryValue::Map(self.fields.clone()).to_json()
    }
}

impl TryFrom<serde_json::Value> for Query {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        Self::from_json(value)
    }
}

impl FromIterator<(String, QueryValue)> for Query {
    fn from_iter<I: IntoIterator<Item = (String, QueryValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
