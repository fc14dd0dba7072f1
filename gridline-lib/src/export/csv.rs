//! CSV writer with RFC 4180 quoting.

use std::borrow::Cow;
use std::io::{self, Write};

use crate::model::{Column, Row};

/// Quote a field if it contains a separator, quote or line break.
///
/// Embedded quotes are doubled.
///
/// ```
/// use gridline_lib::export::escape_field;
///
/// assert_eq!(escape_field("plain"), "plain");
/// assert_eq!(escape_field("Smith, John"), "\"Smith, John\"");
/// assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
/// ```
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn write_record<'f, W, I>(writer: &mut W, fields: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = Cow<'f, str>>,
{
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            writer.write_all(b",")?;
        }
        writer.write_all(escape_field(&field).as_bytes())?;
    }
    Ok(())
}

/// Write a header line of column headers, then one line per row.
///
/// Cells hold the raw value text (custom renderers are not applied); null is
/// an empty field. Lines are separated by `\n` with no trailing newline.
pub fn write_csv<W: Write>(rows: &[&Row], columns: &[Column], writer: &mut W) -> io::Result<()> {
    write_record(writer, columns.iter().map(|c| Cow::Borrowed(c.header.as_str())))?;
    for row in rows {
        writer.write_all(b"\n")?;
        write_record(
            writer,
            columns.iter().map(|c| Cow::Owned(row.get(&c.key).to_string())),
        )?;
    }
    Ok(())
}
