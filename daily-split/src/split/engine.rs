//! Reservation expander: validate, normalize, expand, divide, format

use chrono::NaiveDate;
use serde::Deserialize;

use super::amounts::{parse_amount, parse_nights};
use super::dates::{format_date, parse_date};
use super::error::{RowError, RowErrorKind, RowWarning, SplitError};
use super::schema::{Column, ColumnMap};
use super::types::{CellValue, DailyStayEntry, Reservation, Row, Table, span_nights};

/// Headers of the daily sheet, in output order
pub const DAILY_COLUMNS: [&str; 8] = [
    "Reservation Number",
    "Apartment",
    "Guest Name",
    "Channel",
    "Booking Date",
    "Stay Date",
    "Nightly Base Revenue",
    "Nightly Total Revenue",
];

/// What to do with rows that cannot be expanded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowErrorPolicy {
    /// Report the row, keep it in the original table, leave it out of the daily table
    #[default]
    Skip,
    /// Fail the whole file, listing every offending row
    Abort,
}

impl std::fmt::Display for RowErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowErrorPolicy::Skip => write!(f, "skip"),
            RowErrorPolicy::Abort => write!(f, "abort"),
        }
    }
}

/// Data rows a worksheet holds below its header row
pub const MAX_DAILY_ROWS: usize = 1_048_575;

#[derive(Debug, Clone)]
pub struct SplitOptions {
    pub on_row_error: RowErrorPolicy,
    /// Upper bound on daily rows across the whole file
    pub max_daily_rows: usize,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            on_row_error: RowErrorPolicy::default(),
            max_daily_rows: MAX_DAILY_ROWS,
        }
    }
}

/// Result of one split invocation
#[derive(Debug, Clone, Default)]
pub struct SplitOutput {
    /// Input rows with canonical headers and dd-mm-yyyy dates
    pub original: Table,
    /// One entry per stay night
    pub daily: Vec<DailyStayEntry>,
    /// Rows left out of the daily table under the skip policy
    pub skipped: Vec<RowError>,
    pub warnings: Vec<RowWarning>,
}

impl SplitOutput {
    /// Number of reservation rows read
    pub fn reservation_count(&self) -> usize {
        self.original.len()
    }

    /// Daily entries rendered as a table, dates formatted for display
    pub fn daily_table(&self) -> Table {
        let mut table = Table::new(DAILY_COLUMNS.iter().map(|c| c.to_string()).collect());
        for (idx, entry) in self.daily.iter().enumerate() {
            table.push_row(
                idx + 2,
                vec![
                    entry.reservation_number.clone(),
                    entry.apartment.clone(),
                    entry.guest_name.clone(),
                    entry.channel.clone(),
                    entry
                        .booking_date
                        .map(|d| CellValue::Text(format_date(d)))
                        .unwrap_or(CellValue::Empty),
                    CellValue::Text(format_date(entry.stay_date)),
                    CellValue::Number(entry.nightly_base_revenue),
                    CellValue::Number(entry.nightly_total_revenue),
                ],
            );
        }
        table
    }
}

/// Outcome of validating one input row
enum RowOutcome {
    /// Row expands into at least one night
    Expand(Reservation),
    /// Departure on or before arrival: valid, contributes no nights
    Degenerate,
}

/// Expands reservation tables into daily stay rows
pub struct SplitEngine {
    options: SplitOptions,
}

impl SplitEngine {
    pub fn new(options: SplitOptions) -> Self {
        Self { options }
    }

    /// Run the split over a table read from the first sheet of a file
    ///
    /// Fails on missing columns, and on bad rows when the policy is `Abort`.
    pub fn run(&self, input: &Table) -> Result<SplitOutput, SplitError> {
        let columns = ColumnMap::resolve(&input.columns)?;

        let mut output = SplitOutput {
            original: Table::new(columns.canonical_headers(&input.columns)),
            ..Default::default()
        };
        let mut degenerate = 0usize;

        for row in &input.rows {
            output
                .original
                .push_row(row.line, normalize_original_row(row, &columns));

            match parse_reservation(row, &columns) {
                Ok(RowOutcome::Expand(reservation)) => {
                    let span = reservation.span_nights();
                    // Checked before expanding so an absurd range never allocates
                    let room = self.options.max_daily_rows - output.daily.len();
                    if usize::try_from(span).map_or(true, |n| n > room) {
                        return Err(SplitError::SheetRowLimit {
                            line: reservation.line,
                            nights: span,
                            limit: self.options.max_daily_rows,
                        });
                    }
                    if span != i64::from(reservation.nights) {
                        output.warnings.push(RowWarning::NightsMismatch {
                            line: reservation.line,
                            nights: reservation.nights,
                            span,
                        });
                    }
                    output.daily.extend(reservation.daily_entries());
                }
                Ok(RowOutcome::Degenerate) => degenerate += 1,
                Err(errors) => output.skipped.extend(errors),
            }
        }

        if !output.skipped.is_empty() && self.options.on_row_error == RowErrorPolicy::Abort {
            return Err(SplitError::Rows(output.skipped));
        }

        for error in &output.skipped {
            log::warn!("Skipping {}", error);
        }
        for warning in &output.warnings {
            log::warn!("{}", warning);
        }

        log::debug!(
            "Split {} reservations into {} nights ({} without nights, {} row errors, {} warnings)",
            output.reservation_count(),
            output.daily.len(),
            degenerate,
            output.skipped.len(),
            output.warnings.len()
        );

        Ok(output)
    }
}

/// Copy an input row for the original sheet, rendering parseable dates as dd-mm-yyyy
///
/// Unparseable dates keep their raw value.
fn normalize_original_row(row: &Row, columns: &ColumnMap) -> Vec<CellValue> {
    let mut cells = row.cells.clone();
    for column in Column::DATES {
        let idx = columns.index(column);
        if let Some(cell) = cells.get_mut(idx) {
            if let Some(date) = parse_date(cell) {
                *cell = CellValue::Text(format_date(date));
            }
        }
    }
    cells
}

/// Validate one row, collecting every problem it has
fn parse_reservation(row: &Row, columns: &ColumnMap) -> Result<RowOutcome, Vec<RowError>> {
    let cell = move |column: Column| row.cell(columns.index(column));
    let mut errors = Vec::new();

    let arrival = required_date(row, columns, Column::Arrival, &mut errors);
    let departure = required_date(row, columns, Column::Departure, &mut errors);

    // Blank booking dates are allowed; present but unreadable ones are not
    let booking_cell = cell(Column::BookingDate);
    let booking_date = parse_date(booking_cell);
    if booking_date.is_none() && !booking_cell.is_empty() {
        errors.push(row_error(row, columns, Column::BookingDate, |raw| {
            RowErrorKind::DateParse { raw }
        }));
    }

    let (Some(arrival), Some(departure)) = (arrival, departure) else {
        return Err(errors);
    };

    if span_nights(arrival, departure) == 0 {
        return if errors.is_empty() {
            Ok(RowOutcome::Degenerate)
        } else {
            Err(errors)
        };
    }

    let nights = match parse_nights(cell(Column::Nights)).and_then(|n| u32::try_from(n).ok()) {
        Some(n) if n > 0 => Some(n),
        _ => {
            errors.push(row_error(row, columns, Column::Nights, |raw| {
                RowErrorKind::RevenueDivision { raw }
            }));
            None
        }
    };

    let base_revenue = required_amount(row, columns, Column::BaseRevenue, &mut errors);
    let total_revenue = required_amount(row, columns, Column::TotalRevenue, &mut errors);

    match (nights, base_revenue, total_revenue) {
        (Some(nights), Some(base_revenue), Some(total_revenue)) if errors.is_empty() => {
            Ok(RowOutcome::Expand(Reservation {
                line: row.line,
                reservation_number: cell(Column::ReservationNumber).clone(),
                apartment: cell(Column::Apartment).clone(),
                guest_name: cell(Column::GuestName).clone(),
                channel: cell(Column::Channel).clone(),
                arrival,
                departure,
                booking_date,
                nights,
                base_revenue,
                total_revenue,
            }))
        }
        _ => Err(errors),
    }
}

/// Build a row error carrying the raw cell text
fn row_error(
    row: &Row,
    columns: &ColumnMap,
    column: Column,
    kind: impl FnOnce(String) -> RowErrorKind,
) -> RowError {
    RowError {
        line: row.line,
        column,
        kind: kind(row.cell(columns.index(column)).to_string()),
    }
}

fn required_date(
    row: &Row,
    columns: &ColumnMap,
    column: Column,
    errors: &mut Vec<RowError>,
) -> Option<NaiveDate> {
    let parsed = parse_date(row.cell(columns.index(column)));
    if parsed.is_none() {
        errors.push(row_error(row, columns, column, |raw| {
            RowErrorKind::DateParse { raw }
        }));
    }
    parsed
}

fn required_amount(
    row: &Row,
    columns: &ColumnMap,
    column: Column,
    errors: &mut Vec<RowError>,
) -> Option<f64> {
    match parse_amount(row.cell(columns.index(column))) {
        Some(n) if n >= 0.0 => Some(n),
        _ => {
            errors.push(row_error(row, columns, column, |raw| {
                RowErrorKind::InvalidAmount { raw }
            }));
            None
        }
    }
}
