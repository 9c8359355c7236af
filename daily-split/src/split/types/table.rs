//! In-memory table exchanged with the spreadsheet readers and writer

use super::CellValue;

static EMPTY: CellValue = CellValue::Empty;

/// A data row together with its line number in the source file
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// 1-based line in the source sheet (the header is line 1)
    pub line: usize,
    pub cells: Vec<CellValue>,
}

impl Row {
    /// Cell at `col`, `Empty` when the row is shorter
    pub fn cell(&self, col: usize) -> &CellValue {
        self.cells.get(col).unwrap_or(&EMPTY)
    }
}

/// A header row plus data rows, as read from the first sheet of a file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given headers
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the header width
    pub fn push_row(&mut self, line: usize, mut cells: Vec<CellValue>) {
        cells.resize(self.columns.len(), CellValue::Empty);
        self.rows.push(Row { line, cells });
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at (row, col), `Empty` when out of range
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows.get(row).map(|r| r.cell(col)).unwrap_or(&EMPTY)
    }

    /// Build a table from header names and rows, numbering rows from line 2
    pub fn from_rows<H, R>(headers: &[H], rows: Vec<R>) -> Self
    where
        H: AsRef<str>,
        R: IntoIterator<Item = CellValue>,
    {
        let mut table = Self::new(headers.iter().map(|h| h.as_ref().to_string()).collect());
        for (idx, row) in rows.into_iter().enumerate() {
            table.push_row(idx + 2, row.into_iter().collect());
        }
        table
    }

    /// Render the header and the first `limit` rows as left-aligned text columns
    pub fn render_text(&self, limit: usize) -> String {
        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .take(limit)
            .map(|row| row.cells.iter().map(|c| truncate(&c.to_string())).collect())
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(col, name)| {
                rows.iter()
                    .filter_map(|r| r.get(col))
                    .map(|v| v.chars().count())
                    .chain(std::iter::once(truncate(name).chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let format_line = |cells: Vec<String>| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(value, width)| format!("{:<width$}", value, width = *width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = String::new();
        out.push_str(&format_line(self.columns.iter().map(|c| truncate(c)).collect()));
        out.push('\n');
        for row in rows {
            out.push_str(&format_line(row));
            out.push('\n');
        }
        out
    }
}

/// Widest a rendered column may get before values are cut
const MAX_COLUMN_WIDTH: usize = 24;

fn truncate(value: &str) -> String {
    if value.chars().count() <= MAX_COLUMN_WIDTH {
        value.to_string()
    } else {
        let cut: String = value.chars().take(MAX_COLUMN_WIDTH - 1).collect();
        format!("{}…", cut)
    }
}
