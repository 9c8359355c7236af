//! Read the reservation sheet of an Excel workbook into a `Table`

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx};

use crate::split::types::{CellValue, Table};

/// Read the first sheet of an .xlsx file
pub fn read_reservations_excel<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read Excel file: {}", path.display()))?;
    read_reservations_excel_bytes(&bytes)
        .with_context(|| format!("Failed to load reservations from {}", path.display()))
}

/// Read the first sheet of an in-memory .xlsx workbook (e.g. an upload)
pub fn read_reservations_excel_bytes(bytes: &[u8]) -> Result<Table> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).context("Not a readable .xlsx workbook")?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .context("Excel file has no sheets")?
        .clone();

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

    // Absolute position of the first used row, so lines match what the user sees
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        log::debug!("Sheet '{}' is empty", sheet_name);
        return Ok(Table::default());
    };

    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| header_name(cell, idx))
        .collect();
    let mut table = Table::new(columns);

    for (offset, row) in rows.enumerate() {
        let cells: Vec<CellValue> = row.iter().map(cell_to_value).collect();

        // Skip rows without any data (trailing formatting, spacer rows)
        if cells.iter().all(CellValue::is_empty) {
            continue;
        }

        // +1 for the header row, +1 for 1-based lines
        table.push_row(first_row + offset + 2, cells);
    }

    log::debug!(
        "Read {} rows and {} columns from sheet '{}'",
        table.len(),
        table.columns.len(),
        sheet_name
    );

    Ok(table)
}

fn header_name(cell: &Data, idx: usize) -> String {
    let name = match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => cell_to_value(other).to_string(),
    };
    if name.is_empty() {
        format!("Unnamed: {}", idx)
    } else {
        name
    }
}

/// Convert a calamine cell to a `CellValue`
fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::text(s.as_str()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) if ndt.time() == chrono::NaiveTime::MIN => CellValue::Date(ndt.date()),
            Some(ndt) => CellValue::DateTime(ndt),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => CellValue::text(s.as_str()),
        Data::DurationIso(s) => CellValue::text(s.as_str()),
        Data::Error(e) => {
            log::debug!("Ignoring cell error value: {:?}", e);
            CellValue::Empty
        }
    }
}
