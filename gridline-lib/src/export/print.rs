//! Paged plain-text document for printing.

use std::io::{self, Write};

use unicode_width::UnicodeWidthStr;

use crate::model::{Column, Row};
use crate::pipeline::paginate;

const SEPARATOR: &str = " | ";
const RULE_SEPARATOR: &str = "-+-";
const PAGE_BREAK: &str = "\x0c";

/// Rendered cells laid out in fixed-width text columns.
///
/// Column widths are measured over the header and every cell (by display
/// width, so wide glyphs line up), then shared by all lines written from the
/// grid.
#[derive(Debug, Clone)]
pub struct TextGrid {
    headers: Vec<String>,
    cells: Vec<Vec<String>>,
    widths: Vec<usize>,
}

impl TextGrid {
    /// Render `rows` through each column's cell renderer.
    pub fn new(rows: &[&Row], columns: &[Column]) -> Self {
        let headers: Vec<String> = columns.iter().map(|c| c.header.clone()).collect();
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| columns.iter().map(|c| c.render_cell(row)).collect())
            .collect();

        let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
        for line in &cells {
            for (width, cell) in widths.iter_mut().zip(line) {
                *width = (*width).max(cell.width());
            }
        }

        Self {
            headers,
            cells,
            widths,
        }
    }

    /// Number of body rows.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn format_line(&self, fields: &[String]) -> String {
        let padded: Vec<String> = fields
            .iter()
            .zip(&self.widths)
            .map(|(field, &width)| {
                let pad = width.saturating_sub(field.width());
                format!("{}{}", field, " ".repeat(pad))
            })
            .collect();
        padded.join(SEPARATOR).trim_end().to_string()
    }

    /// Header line followed by a rule.
    pub fn header_lines(&self) -> [String; 2] {
        let rule: Vec<String> = self.widths.iter().map(|&w| "-".repeat(w)).collect();
        [self.format_line(&self.headers), rule.join(RULE_SEPARATOR)]
    }

    /// Body line for row `index`.
    pub fn row_line(&self, index: usize) -> Option<String> {
        self.cells.get(index).map(|cells| self.format_line(cells))
    }
}

/// Write a print document: pages of `rows_per_page` rows, each opening with
/// `Page i of n` and the header, separated by form feeds.
///
/// An empty row set still produces one page with the header.
pub fn write_print<W: Write>(
    rows: &[&Row],
    columns: &[Column],
    rows_per_page: usize,
    writer: &mut W,
) -> io::Result<()> {
    let grid = TextGrid::new(rows, columns);
    let indices: Vec<usize> = (0..grid.len()).collect();
    let total_pages = paginate(&indices, 1, rows_per_page).1.total_pages;
    let [header, rule] = grid.header_lines();

    for page in 1..=total_pages {
        if page > 1 {
            writer.write_all(PAGE_BREAK.as_bytes())?;
        }
        writeln!(writer, "Page {} of {}", page, total_pages)?;
        writeln!(writer, "{}", header)?;
        writeln!(writer, "{}", rule)?;

        let (page_indices, _) = paginate(&indices, page, rows_per_page);
        for &index in page_indices {
            if let Some(line) = grid.row_line(index) {
                writeln!(writer, "{}", line)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_pads_to_widest_cell() {
        let rows = [Row::new().set("a", "xyz").set("b", 1)];
        let refs: Vec<&Row> = rows.iter().collect();
        let columns = vec![Column::new("a", "A"), Column::new("b", "Bee")];
        let grid = TextGrid::new(&refs, &columns);

        let [header, rule] = grid.header_lines();
        assert_eq!(header, "A   | Bee");
        assert_eq!(rule, "----+----");
        assert_eq!(grid.row_line(0).unwrap(), "xyz | 1");
        assert!(grid.row_line(1).is_none());
    }

    #[test]
    fn test_wide_glyphs_use_display_width() {
        let rows = [Row::new().set("a", "日本")];
        let refs: Vec<&Row> = rows.iter().collect();
        let columns = vec![Column::new("a", "A"), Column::new("b", "B")];
        let grid = TextGrid::new(&refs, &columns);

        let [header, _] = grid.header_lines();
        assert_eq!(header, "A    | B");
    }
}
