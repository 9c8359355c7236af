//! Cell value representation shared by the readers, the expander and the writer

use chrono::{NaiveDate, NaiveDateTime};

/// A single spreadsheet cell, independent of the file format it came from
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Blank cell
    Empty,
    /// Text cell (never empty, readers map "" to `Empty`)
    Text(String),
    /// Numeric cell (integers are widened to f64 like the spreadsheet does)
    Number(f64),
    /// Boolean cell
    Bool(bool),
    /// Calendar date
    Date(NaiveDate),
    /// Date and time of day
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Check if this cell is blank
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Build a text cell, mapping blank strings to `Empty`
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Date(d) => write!(f, "{}", d.format(crate::split::dates::DATE_FORMAT)),
            CellValue::DateTime(dt) => {
                write!(f, "{}", dt.format(crate::split::dates::DATE_TIME_FORMAT))
            }
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::text(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}
