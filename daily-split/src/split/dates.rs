//! Date coercion for reservation cells and dd-mm-yyyy rendering
//!
//! Text is parsed day-first: `03/04/2024` is the 3rd of April.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};

use super::types::CellValue;

/// Output format for every date written to a sheet
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Output format for date-time cells in pass-through columns
pub const DATE_TIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Day-first and ISO date layouts with four-digit years
const DATE_FORMATS: &[&str] = &[
    "%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y", "%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%d %b %Y",
    "%d %B %Y", "%d-%b-%Y", "%b %d, %Y", "%B %d, %Y",
];

/// Day-first layouts with two-digit years
const SHORT_YEAR_FORMATS: &[&str] = &["%d-%m-%y", "%d/%m/%y", "%d.%m.%y"];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Largest serial the spreadsheet format accepts (9999-12-31)
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Smallest serial read as a date from a plain number (1927-05-18)
///
/// Smaller numbers in a date column are years, night counts or typos.
const MIN_PLAUSIBLE_SERIAL: f64 = 10_000.0;

/// Render a date as dd-mm-yyyy
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Coerce a cell to a calendar date
///
/// Returns `None` for blank cells and for values that are not a date; the
/// caller decides which of the two is an error.
pub fn parse_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Date(d) => Some(*d),
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Number(n) => from_plausible_serial(*n),
        CellValue::Text(s) => parse_date_text(s),
        CellValue::Empty | CellValue::Bool(_) => None,
    }
}

/// Parse a textual date in any of the accepted layouts
pub fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(d) = parse_with_formats(s) {
        return Some(d);
    }

    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    // "10-01-2024 00:00:00", "2024-01-10T12:00:00Z" and similar: keep the date part
    if let Some(idx) = s.find(|c: char| c.is_whitespace() || c == 'T') {
        if idx > 0 {
            if let Some(d) = parse_with_formats(&s[..idx]) {
                return Some(d);
            }
        }
    }

    // Serial numbers exported as text
    s.parse::<f64>().ok().and_then(from_plausible_serial)
}

fn from_plausible_serial(serial: f64) -> Option<NaiveDate> {
    if serial < MIN_PLAUSIBLE_SERIAL {
        return None;
    }
    from_excel_serial(serial)
}

fn parse_with_formats(s: &str) -> Option<NaiveDate> {
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            // %Y accepts short years; leave those to the two-digit layouts
            if d.year() >= 1000 {
                return Some(d);
            }
        }
    }
    for fmt in SHORT_YEAR_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Convert a spreadsheet serial day number (1900 date system) to a date
///
/// The time-of-day fraction is dropped.
pub fn from_excel_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    // Day 0 is 1899-12-30 once the 1900 leap-year bug is accounted for
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_days(Days::new(serial.floor() as u64))
}
