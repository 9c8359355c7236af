//! Write the split result as a two-sheet workbook

use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::split::dates::format_date;
use crate::split::engine::{DAILY_COLUMNS, SplitOutput};
use crate::split::types::{CellValue, DailyStayEntry, Table};

/// Sheet names and number formatting for the output workbook
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookOptions {
    pub original_sheet: String,
    pub daily_sheet: String,
    /// Decimals shown for nightly revenue; the stored value keeps full precision
    pub revenue_decimals: u8,
}

impl Default for WorkbookOptions {
    fn default() -> Self {
        Self {
            original_sheet: "Original Data".to_string(),
            daily_sheet: "Daily Split Data".to_string(),
            revenue_decimals: 2,
        }
    }
}

/// Column indices for the daily sheet
mod cols {
    pub const RESERVATION_NUMBER: u16 = 0;
    pub const APARTMENT: u16 = 1;
    pub const GUEST_NAME: u16 = 2;
    pub const CHANNEL: u16 = 3;
    pub const BOOKING_DATE: u16 = 4;
    pub const STAY_DATE: u16 = 5;
    pub const NIGHTLY_BASE: u16 = 6;
    pub const NIGHTLY_TOTAL: u16 = 7;
}

/// Build the workbook in memory
pub fn write_split_excel(output: &SplitOutput, options: &WorkbookOptions) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(output, options)?;
    workbook
        .save_to_buffer()
        .context("Failed to serialize Excel workbook")
}

/// Build the workbook and save it to `path`
pub fn save_split_excel<P: AsRef<Path>>(
    output: &SplitOutput,
    options: &WorkbookOptions,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let mut workbook = build_workbook(output, options)?;
    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;

    log::info!("Excel file exported to: {}", path.display());
    Ok(())
}

fn build_workbook(output: &SplitOutput, options: &WorkbookOptions) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let original = workbook.add_worksheet();
    original.set_name(&options.original_sheet)?;
    write_original_sheet(original, &output.original, &header_format)?;

    let daily = workbook.add_worksheet();
    daily.set_name(&options.daily_sheet)?;
    let revenue_format = Format::new().set_num_format(revenue_num_format(options.revenue_decimals));
    write_daily_sheet(daily, &output.daily, &header_format, &revenue_format)?;

    Ok(workbook)
}

fn write_original_sheet(ws: &mut Worksheet, table: &Table, header_format: &Format) -> Result<()> {
    for (col, name) in table.columns.iter().enumerate() {
        ws.write_string_with_format(0, col as u16, name, header_format)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col, value) in row.cells.iter().enumerate() {
            write_value(ws, row_num, col as u16, value)?;
        }
    }

    ws.set_freeze_panes(1, 0)?;
    ws.autofit();
    Ok(())
}

fn write_daily_sheet(
    ws: &mut Worksheet,
    entries: &[DailyStayEntry],
    header_format: &Format,
    revenue_format: &Format,
) -> Result<()> {
    for (col, name) in DAILY_COLUMNS.iter().enumerate() {
        ws.write_string_with_format(0, col as u16, *name, header_format)?;
    }

    for (idx, entry) in entries.iter().enumerate() {
        let row = (idx + 1) as u32;

        write_value(ws, row, cols::RESERVATION_NUMBER, &entry.reservation_number)?;
        write_value(ws, row, cols::APARTMENT, &entry.apartment)?;
        write_value(ws, row, cols::GUEST_NAME, &entry.guest_name)?;
        write_value(ws, row, cols::CHANNEL, &entry.channel)?;
        if let Some(booking_date) = entry.booking_date {
            ws.write_string(row, cols::BOOKING_DATE, format_date(booking_date))?;
        }
        ws.write_string(row, cols::STAY_DATE, format_date(entry.stay_date))?;
        ws.write_number_with_format(
            row,
            cols::NIGHTLY_BASE,
            entry.nightly_base_revenue,
            revenue_format,
        )?;
        ws.write_number_with_format(
            row,
            cols::NIGHTLY_TOTAL,
            entry.nightly_total_revenue,
            revenue_format,
        )?;
    }

    ws.set_freeze_panes(1, 0)?;
    ws.autofit();
    Ok(())
}

fn write_value(ws: &mut Worksheet, row: u32, col: u16, value: &CellValue) -> Result<()> {
    match value {
        CellValue::Empty => { /* Leave cell empty */ }
        CellValue::Text(s) => { ws.write_string(row, col, s)?; }
        CellValue::Number(n) => { ws.write_number(row, col, *n)?; }
        CellValue::Bool(b) => { ws.write_boolean(row, col, *b)?; }
        CellValue::Date(_) | CellValue::DateTime(_) => { ws.write_string(row, col, value.to_string())?; }
    }
    Ok(())
}

/// Excel number format with a fixed number of decimals
fn revenue_num_format(decimals: u8) -> String {
    if decimals == 0 {
        "0".to_string()
    } else {
        format!("0.{}", "0".repeat(decimals as usize))
    }
}
