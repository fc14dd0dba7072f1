//! JSON writer.

use std::io::Write;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::model::{Column, Row};

/// A row serialized as an object with keys in column order.
struct ColumnOrdered<'a> {
    row: &'a Row,
    columns: &'a [Column],
}

impl Serialize for ColumnOrdered<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for column in self.columns {
            map.serialize_entry(&column.key, self.row.get(&column.key))?;
        }
        map.end()
    }
}

/// Write rows as a pretty-printed (2-space) JSON array of objects keyed by
/// column key. Values keep their JSON types.
pub fn write_json<W: Write>(
    rows: &[&Row],
    columns: &[Column],
    writer: &mut W,
) -> serde_json::Result<()> {
    let document: Vec<ColumnOrdered<'_>> = rows
        .iter()
        .map(|&row| ColumnOrdered { row, columns })
        .collect();
    serde_json::to_writer_pretty(writer, &document)
}
