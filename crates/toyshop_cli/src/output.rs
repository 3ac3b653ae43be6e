//! Table and JSON rendering for command results.

use serde::Serialize;
use toyshop_core::{EventRow, ToyRow};
use unicode_width::UnicodeWidthStr;

/// A row the CLI knows how to lay out as table cells.
pub trait TableRow: Serialize {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

impl TableRow for ToyRow {
    const HEADERS: &'static [&'static str] = &["id", "name", "cost", "quantity", "ages"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.cost.clone(),
            self.quantity.to_string(),
            self.ages.clone(),
        ]
    }
}

impl TableRow for EventRow {
    const HEADERS: &'static [&'static str] = &["id", "description", "date"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.description.clone(), self.date.clone()]
    }
}

/// Renders `rows` as pretty JSON or as an aligned text table.
pub fn render_rows<T: TableRow>(rows: &[T], json: bool) -> Result<String, serde_json::Error> {
    if json {
        return serde_json::to_string_pretty(rows);
    }
    let cells: Vec<Vec<String>> = rows.iter().map(TableRow::cells).collect();
    Ok(render_table(T::HEADERS, &cells))
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .map(|header| UnicodeWidthStr::width(*header))
        .collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(UnicodeWidthStr::width(cell.as_str()));
        }
    }

    let format_line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| pad_to_width(cell, width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_line(headers.to_vec())];
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(format_line(row.iter().map(String::as_str).collect()));
    }
    lines.join("\n")
}

/// Left-aligns `cell` in `width` terminal columns; wide glyphs count double.
fn pad_to_width(cell: &str, width: usize) -> String {
    let padding = width.saturating_sub(UnicodeWidthStr::width(cell));
    format!("{cell}{}", " ".repeat(padding))
}
