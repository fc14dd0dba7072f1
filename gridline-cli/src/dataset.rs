//! Loading a JSON dataset and deriving its columns.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use gridline_lib::model::{Column, Row};

use crate::error::CliError;

/// Read a JSON array of flat objects.
pub fn load(path: &Path) -> Result<Vec<Row>, CliError> {
    let json = fs::read_to_string(path).map_err(|e| CliError::read(path, e))?;
    serde_json::from_str(&json).map_err(|e| CliError::parse(path, e))
}

/// One sortable column per key found in any row.
///
/// The key column comes first, the rest in key order.
pub fn infer_columns(rows: &[Row], key: &str) -> Vec<Column> {
    let keys: BTreeSet<&str> = rows.iter().flat_map(|row| row.keys()).collect();

    let key_first = keys.contains(key).then_some(key);
    key_first
        .into_iter()
        .chain(keys.iter().copied().filter(|k| *k != key))
        .map(|k| Column::new(k, k).sortable())
        .collect()
}

/// Sortable columns for explicitly named keys, in the given order.
///
/// `key=Header` sets a header; a bare key is its own header.
pub fn named_columns(entries: &[String]) -> Vec<Column> {
    entries
        .iter()
        .map(|entry| match entry.split_once('=') {
            Some((key, header)) => Column::new(key.trim(), header.trim()).sortable(),
            None => Column::new(entry.trim(), entry.trim()).sortable(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_columns_puts_key_first() {
        let rows = vec![
            Row::new().set("name", "a").set("id", 1),
            Row::new().set("age", 3).set("id", 2),
        ];
        let columns = infer_columns(&rows, "id");
        let keys: Vec<&str> = columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["id", "age", "name"]);
        assert!(columns.iter().all(|c| c.sortable));
    }

    #[test]
    fn test_infer_columns_without_key_column() {
        let rows = vec![Row::new().set("b", 1).set("a", 2)];
        let keys: Vec<String> = infer_columns(&rows, "id")
            .into_iter()
            .map(|c| c.key)
            .collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_named_columns_with_headers() {
        let columns = named_columns(&["id".to_string(), "name = Full name".to_string()]);
        assert_eq!(columns[0].header, "id");
        assert_eq!(columns[1].key, "name");
        assert_eq!(columns[1].header, "Full name");
    }
}
