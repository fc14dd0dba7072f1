//! Row type and row identity

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use super::Value;

static NULL: Value = Value::Null;

/// One record of tabular data.
///
/// A row is an opaque mapping from column key to [`Value`]. Rows have no
/// identity of their own; tables derive one through a [`KeyFn`].
///
/// # Example
///
/// ```
/// use gridline_lib::model::{Row, Value};
///
/// let row = Row::new().set("name", "Ada").set("age", 36);
/// assert_eq!(row.get("name"), &Value::from("Ada"));
/// assert!(row.get("missing").is_null());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: BTreeMap<String, Value>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field value (builder style).
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Sets a field value in place, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    /// Returns the value for `key`, or [`Value::Null`] if the field is missing.
    pub fn get(&self, key: &str) -> &Value {
        self.fields.get(key).unwrap_or(&NULL)
    }

    /// Returns `true` if the row has a field named `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Field names, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// =============================================================================
// Row identity
// =============================================================================

/// Bound for row identity types used by selection.
pub trait RowKey: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T: Clone + Eq + Hash + Debug + Send + Sync + 'static> RowKey for T {}

/// Caller-supplied function mapping a row to its stable identity.
pub type KeyFn<K> = Arc<dyn Fn(&Row) -> K + Send + Sync>;

/// Key extractor that uses the stringified value of one column.
///
/// Rows whose key column is null all share the empty key, so pick a column
/// that is always populated.
pub fn key_by_column(column: impl Into<String>) -> KeyFn<String> {
    let column = column.into();
    Arc::new(move |row: &Row| row.get(&column).to_string())
}
