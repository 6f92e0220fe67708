use std::io::{self, Write};

use crate::coauthor::Coauthor;

const HEADER: [&str; 4] = ["ID", "NAME", "EMAIL", "TYPE"];
const PADDING: usize = 2;
const MIN_WIDTH: usize = 5;

/// Writes coauthors as a column-aligned table; writes nothing for no rows
pub fn write_coauthors<W: Write>(w: &mut W, coauthors: &[Coauthor]) -> io::Result<()> {
    if coauthors.is_empty() {
        return Ok(());
    }

    let mut rows: Vec<[String; 4]> = Vec::with_capacity(coauthors.len() + 1);
    rows.push(HEADER.map(str::to_string));
    rows.extend(coauthors.iter().map(|c| {
        [
            c.id.clone(),
            c.name.clone(),
            c.email.clone(),
            c.kind.to_string(),
        ]
    }));

    let mut widths = [0usize; 3];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count() + PADDING).max(MIN_WIDTH);
        }
    }

    for row in &rows {
        let mut line = String::new();
        for (cell, width) in row.iter().zip(widths) {
            line.push_str(&format!("{cell:<width$}"));
        }
        // Last column is never padded.
        line.push_str(&row[3]);
        writeln!(w, "{line}")?;
    }
    Ok(())
}
