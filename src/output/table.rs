//! Presto-style text tables.
//!
//! ```text
//!  id | name
//! ----+-------
//!   1 | alice
//! ```
//!
//! Column widths depend on every cell, so a table is always built from fully
//! materialized rows.

use unicode_width::UnicodeWidthStr;

/// Column alignment, decided per column from its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

/// A table ready to be rendered.
pub struct Table<'a> {
    header: Option<&'a [String]>,
    rows: &'a [Vec<String>],
}

impl<'a> Table<'a> {
    /// Creates a table with a header line and separator.
    pub fn with_header(header: &'a [String], rows: &'a [Vec<String>]) -> Self {
        Self {
            header: Some(header),
            rows,
        }
    }

    /// Creates a table of bare rows (used for vertical records).
    pub fn without_header(rows: &'a [Vec<String>]) -> Self {
        Self { header: None, rows }
    }

    /// Renders the table, one `\n`-terminated line per row.
    pub fn render(&self) -> String {
        let columns = self.column_count();
        if columns == 0 {
            return String::new();
        }

        let widths = self.widths(columns);
        let aligns: Vec<Align> = (0..columns).map(|c| self.alignment(c)).collect();
        let mut out = String::new();

        if let Some(header) = self.header {
            push_line(&mut out, header, &widths, &aligns);
            let separator: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
            out.push_str(&separator.join("+"));
            out.push('\n');
        }
        for row in self.rows {
            push_line(&mut out, row, &widths, &aligns);
        }
        out
    }

    fn column_count(&self) -> usize {
        let header = self.header.map_or(0, |h| h.len());
        self.rows.iter().map(Vec::len).fold(header, usize::max)
    }

    fn widths(&self, columns: usize) -> Vec<usize> {
        let mut widths = vec![0; columns];
        let lines = self.header.into_iter().chain(self.rows.iter().map(Vec::as_slice));
        for line in lines {
            for (i, cell) in line.iter().enumerate() {
                widths[i] = widths[i].max(display_width(cell));
            }
        }
        widths
    }

    /// Numeric columns are right-aligned, everything else left-aligned.
    fn alignment(&self, column: usize) -> Align {
        let mut values = self
            .rows
            .iter()
            .filter_map(|row| row.get(column))
            .filter(|cell| !cell.is_empty() && cell.as_str() != crate::query::NULL_TEXT)
            .peekable();
        if values.peek().is_none() {
            return Align::Left;
        }
        if values.all(|cell| cell.trim().parse::<f64>().is_ok()) {
            Align::Right
        } else {
            Align::Left
        }
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize], aligns: &[Align]) {
    let padded: Vec<String> = widths
        .iter()
        .zip(aligns)
        .enumerate()
        .map(|(i, (&width, &align))| {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let fill = " ".repeat(width - display_width(cell));
            match align {
                Align::Left => format!(" {cell}{fill} "),
                Align::Right => format!(" {fill}{cell} "),
            }
        })
        .collect();
    out.push_str(padded.join("|").trim_end());
    out.push('\n');
}

/// Terminal columns taken by `cell`; wide (e.g. CJK) characters count twice.
fn display_width(cell: &str) -> usize {
    UnicodeWidthStr::width(cell)
}
