//! CSV import of reservations
//!
//! Every field is kept as text; dates, nights and amounts are coerced by the
//! expander the same way as text cells from a workbook.

use std::borrow::Cow;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};

use super::types::{CellValue, Table};

/// Read reservations from a CSV file with a header row
pub fn read_reservations_csv<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    read_reservations_csv_from(file)
        .with_context(|| format!("Failed to load reservations from {}", path.display()))
}

/// Read reservations from in-memory CSV data
pub fn read_reservations_csv_bytes(bytes: &[u8]) -> Result<Table> {
    read_reservations_csv_from(bytes)
}

fn read_reservations_csv_from<R: Read>(source: R) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(source);

    // Byte records so legacy exports (Windows-1252 and similar) still load
    let headers: Vec<String> = rdr
        .byte_headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(|h| decode_field(h).trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut table = Table::new(headers);
    let mut lossy_lines = Vec::new();

    for record in rdr.byte_records() {
        let record = record.context("Failed to read CSV record")?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(table.len() + 2);

        if std::str::from_utf8(record.as_slice()).is_err() {
            lossy_lines.push(line);
        }

        let cells: Vec<CellValue> = record
            .iter()
            .map(|field| CellValue::from(decode_field(field).into_owned()))
            .collect();
        if cells.iter().all(CellValue::is_empty) {
            continue;
        }
        table.push_row(line, cells);
    }

    if !lossy_lines.is_empty() {
        log::warn!(
            "CSV is not valid UTF-8 on {} line(s) (first: {}); unreadable characters were replaced",
            lossy_lines.len(),
            lossy_lines[0]
        );
    }

    log::debug!(
        "Read {} rows and {} columns from CSV",
        table.len(),
        table.columns.len()
    );

    Ok(table)
}

/// Decode a field as UTF-8, replacing invalid bytes with U+FFFD
fn decode_field(field: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(field)
}
