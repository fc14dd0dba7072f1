//! Terminal rendering of the current page.

use std::io::{self, Write};

use gridline_lib::export::TextGrid;
use gridline_lib::model::Row;
use gridline_lib::{EmptyReason, Table};

/// Write the visible page as a text grid with a paging footer.
///
/// Selected rows are marked with `*` in a leading gutter.
pub fn print_page<W: Write>(table: &Table<String>, out: &mut W) -> io::Result<()> {
    let output = table.output();

    if let Some(reason) = output.empty {
        let message = match reason {
            EmptyReason::NoData => "No data.",
            EmptyReason::NoMatches => "No rows match the filter.",
        };
        return writeln!(out, "{}", message);
    }

    let rows: Vec<&Row> = output.visible_rows.iter().collect();
    let grid = TextGrid::new(&rows, table.columns());
    let [header, rule] = grid.header_lines();
    writeln!(out, "  {}", header)?;
    writeln!(out, "  {}", rule)?;

    for (index, key) in output.visible_keys.iter().enumerate() {
        let mark = if table.state().selection.is_selected(key) { '*' } else { ' ' };
        if let Some(line) = grid.row_line(index) {
            writeln!(out, "{} {}", mark, line)?;
        }
    }

    let page = &output.page;
    write!(
        out,
        "\nShowing {}-{} of {} (page {} of {})",
        page.first_item(),
        page.last_item(),
        page.total_items,
        page.current_page,
        page.total_pages,
    )?;
    if output.selection.selected_count > 0 {
        write!(out, ", {} selected", output.selection.selected_count)?;
    }
    writeln!(out)
}
