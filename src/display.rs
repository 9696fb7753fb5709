//! Elastic-width ASCII table rendering for console output.
//!
//! Cells are padded to the widest value in their column and joined with two
//! spaces; missing cells render empty. `print_preview` caps the rows shown
//! and always reports the full row count underneath.

use std::fmt::Write as _;

use crate::table::{DataTable, Value};

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }
    for width in &mut widths {
        *width = (*width).max(3);
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));
    let separator = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separator, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

/// Prints at most `max_rows` rows of `table` (`0` means all) followed by a
/// total-row footer.
pub fn print_preview(table: &DataTable, max_rows: usize) {
    let shown = if max_rows == 0 {
        table.row_count()
    } else {
        max_rows.min(table.row_count())
    };
    let rows = table.rows()[..shown]
        .iter()
        .map(|row| row.iter().map(display_cell).collect())
        .collect::<Vec<Vec<String>>>();
    print_table(table.headers(), &rows);
    if shown < table.row_count() {
        println!("... ({} of {} row(s) shown)", shown, table.row_count());
    } else {
        println!("Total rows: {}", table.row_count());
    }
}

fn display_cell(cell: &Option<Value>) -> String {
    match cell {
        Some(value) => sanitize(&value.as_display()),
        None => String::new(),
    }
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut cells = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate() {
        let Some(width) = widths.get(idx) else { break };
        let mut cell = value.clone();
        let padding = width.saturating_sub(value.chars().count());
        cell.push_str(&" ".repeat(padding));
        cells.push(cell);
    }
    let mut line = cells.join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|ch| match ch {
            '\n' | '\r' | '\t' => ' ',
            other => other,
        })
        .collect()
}
