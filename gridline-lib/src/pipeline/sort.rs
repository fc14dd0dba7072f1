//! Sort stage.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::{Column, Row, Value};

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Neutral: rows keep their incoming order.
    #[default]
    None,
    Ascending,
    Descending,
}

impl SortDirection {
    /// Next direction in the header-click cycle: none → ascending → descending → none.
    pub fn next(self) -> Self {
        match self {
            SortDirection::None => SortDirection::Ascending,
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::None,
        }
    }

    pub fn is_active(self) -> bool {
        self != SortDirection::None
    }
}


/// The one comparison a column's non-null values all support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyKind {
    Bool,
    Int,
    /// Ints and floats together, compared as floats.
    Number,
    Text,
    /// More than one type class; everything compares as folded text.
    Mixed,
}

impl KeyKind {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(KeyKind::Bool),
            Value::Int(_) => Some(KeyKind::Int),
            Value::Float(_) => Some(KeyKind::Number),
            Value::String(_) => Some(KeyKind::Text),
        }
    }

    fn merge(self, other: Self) -> Self {
        match (self, other) {
            (a, b) if a == b => a,
            (KeyKind::Int, KeyKind::Number) | (KeyKind::Number, KeyKind::Int) => KeyKind::Number,
            _ => KeyKind::Mixed,
        }
    }

    /// Kind shared by every non-null value, or `None` for an all-null column.
    fn of_column<'v>(values: impl IntoIterator<Item = &'v Value>) -> Option<Self> {
        values
            .into_iter()
            .filter_map(KeyKind::of)
            .reduce(KeyKind::merge)
    }
}

/// Pre-computed comparison key. Every non-null key in one sort pass has the
/// same variant, so comparing keys is a total order.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SortKey {
    fn new(value: &Value, kind: KeyKind) -> Self {
        match (value, kind) {
            (Value::Null, _) => SortKey::Null,
            (Value::Bool(b), KeyKind::Bool) => SortKey::Bool(*b),
            (Value::Int(n), KeyKind::Int) => SortKey::Int(*n),
            (Value::Int(n), KeyKind::Number) => SortKey::Float(*n as f64),
            (Value::Float(f), KeyKind::Number) => SortKey::Float(*f),
            (value, _) => SortKey::Text(value.to_string().to_lowercase()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Bool(_) => 0,
            SortKey::Int(_) => 1,
            SortKey::Float(_) => 2,
            SortKey::Text(_) => 3,
            SortKey::Null => 4,
        }
    }

    fn is_null(&self) -> bool {
        matches!(self, SortKey::Null)
    }
}

/// Compare two non-null keys.
fn compare_present(a: &SortKey, b: &SortKey) -> Ordering {
    match (a, b) {
        (SortKey::Bool(x), SortKey::Bool(y)) => x.cmp(y),
        (SortKey::Int(x), SortKey::Int(y)) => x.cmp(y),
        (SortKey::Float(x), SortKey::Float(y)) => x.total_cmp(y),
        (SortKey::Text(x), SortKey::Text(y)) => x.cmp(y),
        // Not produced within one pass; ranking keeps the order total anyway.
        _ => a.rank().cmp(&b.rank()),
    }
}

fn compare_keys(a: &SortKey, b: &SortKey, direction: SortDirection) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        // Nulls go last in both directions.
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = compare_present(a, b);
            if direction == SortDirection::Descending {
                ord.reverse()
            } else {
                ord
            }
        }
    }
}

/// Order rows by one column.
///
/// Numbers compare numerically, booleans `false < true`, strings
/// case-insensitively. A column holding more than one of those types is
/// compared entirely by lowercase text. Null and missing values always land at
/// the end, for descending sorts too. Equal rows keep their incoming order.
///
/// A neutral direction, no column, or a column key that is not in `columns`
/// returns the incoming order unchanged. The input is never reordered in place.
///
/// # Example
///
/// ```
/// use gridline_lib::model::{Column, Row, Value};
/// use gridline_lib::pipeline::{sort, SortDirection};
///
/// let columns = vec![Column::new("n", "N").sortable()];
/// let rows = vec![Row::new().set("n", 2), Row::new().set("n", Value::Null), Row::new().set("n", 1)];
/// let refs: Vec<&Row> = rows.iter().collect();
/// let sorted = sort(&refs, Some("n"), SortDirection::Descending, &columns);
/// let order: Vec<String> = sorted.iter().map(|r| r.get("n").to_string()).collect();
/// assert_eq!(order, ["2", "1", ""]);
/// ```
pub fn sort<'a>(
    rows: &[&'a Row],
    sort_column: Option<&str>,
    direction: SortDirection,
    columns: &[Column],
) -> Vec<&'a Row> {
    let Some(column_key) = sort_column.filter(|_| direction.is_active()) else {
        return rows.to_vec();
    };
    let Some(column) = columns.iter().find(|c| c.key == column_key) else {
        log::debug!("sort column {:?} not found, keeping neutral order", column_key);
        return rows.to_vec();
    };

    let field = column.sort_field();
    let Some(kind) = KeyKind::of_column(rows.iter().map(|row| row.get(field))) else {
        return rows.to_vec();
    };
    if kind == KeyKind::Mixed {
        log::debug!("sort column {:?} mixes types, comparing as text", column_key);
    }

    let mut entries: Vec<(SortKey, &'a Row)> = rows
        .iter()
        .map(|&row| (SortKey::new(row.get(field), kind), row))
        .collect();
    // `sort_by` is stable, which equal keys rely on.
    entries.sort_by(|(a, _), (b, _)| compare_keys(a, b, direction));

    entries.into_iter().map(|(_, row)| row).collect()
}
