//! Column definitions.

use std::fmt;
use std::sync::Arc;

use super::{Row, Value};

/// Pure function turning a cell into display text.
///
/// Receives the whole row so derived cells (e.g. "first + last name") can be
/// rendered. Must not have side effects.
pub type CellRenderer = Arc<dyn Fn(&Row, &Value) -> String + Send + Sync>;

/// A table column definition.
///
/// # Examples
///
/// ```
/// use gridline_lib::model::Column;
///
/// let columns = vec![
///     Column::new("id", "ID"),
///     Column::new("name", "Name").sortable(),
///     Column::new("created", "Created").sortable().sort_by("created_ts"),
///     Column::new("price", "Price").render_with(|_, v| format!("${}", v)),
/// ];
/// assert_eq!(columns[2].sort_field(), "created_ts");
/// ```
#[derive(Clone)]
pub struct Column {
    /// Field key in each row.
    pub key: String,
    /// Header text.
    pub header: String,
    /// Whether header activation sorts by this column.
    pub sortable: bool,
    /// Field used for sort comparison, if different from `key`.
    pub sort_key: Option<String>,
    renderer: Option<CellRenderer>,
}

impl Column {
    /// Create a new column with the given key and header.
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            sortable: false,
            sort_key: None,
            renderer: None,
        }
    }

    /// Make the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Compare rows by another field when sorting this column.
    pub fn sort_by(mut self, field: impl Into<String>) -> Self {
        self.sort_key = Some(field.into());
        self
    }

    /// Set a custom cell renderer.
    pub fn render_with<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&Row, &Value) -> String + Send + Sync + 'static,
    {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// The field sorting reads from.
    pub fn sort_field(&self) -> &str {
        self.sort_key.as_deref().unwrap_or(&self.key)
    }

    /// Display text for this column's cell in `row`.
    pub fn render_cell(&self, row: &Row) -> String {
        let value = row.get(&self.key);
        match &self.renderer {
            Some(render) => render(row, value),
            None => value.to_string(),
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("sortable", &self.sortable)
            .field("sort_key", &self.sort_key)
            .field("renderer", &self.renderer.as_ref().map(|_| ".."))
            .finish()
    }
}
