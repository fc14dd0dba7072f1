//! Export of table rows to CSV, JSON and a paged print document.

mod csv;
mod json;
mod print;

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::model::{Column, Row};

pub use csv::{escape_field, write_csv};
pub use json::write_json;
pub use print::{TextGrid, write_print};

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    /// Plain-text pages with the header repeated on each page.
    Print,
}

impl ExportFormat {
    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Print => "txt",
        }
    }
}

/// Writes rows in any [`ExportFormat`] for a fixed set of columns.
#[derive(Debug, Clone)]
pub struct Exporter<'a> {
    columns: &'a [Column],
    rows_per_page: usize,
}

impl<'a> Exporter<'a> {
    pub fn new(columns: &'a [Column]) -> Self {
        Self {
            columns,
            rows_per_page: 40,
        }
    }

    /// Rows per page of the print document (minimum 1).
    pub fn rows_per_page(mut self, rows: usize) -> Self {
        self.rows_per_page = rows.max(1);
        self
    }

    pub fn write<W: Write>(
        &self,
        format: ExportFormat,
        rows: &[&Row],
        mut writer: W,
    ) -> Result<(), ExportError> {
        match format {
            ExportFormat::Csv => write_csv(rows, self.columns, &mut writer)?,
            ExportFormat::Json => write_json(rows, self.columns, &mut writer)?,
            ExportFormat::Print => write_print(rows, self.columns, self.rows_per_page, &mut writer)?,
        }
        writer.flush()?;
        Ok(())
    }
}
