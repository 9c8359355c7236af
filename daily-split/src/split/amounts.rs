//! Numeric coercion for nights and revenue cells

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::CellValue;

/// `1,234` / `12,345,678`: commas as thousands separators only
static THOUSANDS_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d{1,3}(,\d{3})+$").expect("valid thousands regex"));

/// Anything that is not part of a number (currency symbols, spaces, codes)
static NON_NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9.,\-]").expect("valid non-numeric regex"));

/// Coerce a revenue cell to a finite amount
///
/// Text like `"€ 1.234,50"`, `"1,234.50"` or `"300 EUR"` is accepted.
pub fn parse_amount(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(n) if n.is_finite() => Some(*n),
        CellValue::Text(s) => parse_amount_text(s),
        _ => None,
    }
}

/// Parse a textual amount, tolerating currency markers and separators
pub fn parse_amount_text(raw: &str) -> Option<f64> {
    let stripped = NON_NUMERIC.replace_all(raw.trim(), "");
    if stripped.is_empty() || !stripped.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let normalized = match (stripped.rfind('.'), stripped.rfind(',')) {
        // Both present: the last one is the decimal separator
        (Some(dot), Some(comma)) if comma > dot => stripped.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => stripped.replace(',', ""),
        (None, Some(_)) if THOUSANDS_COMMA.is_match(&stripped) => stripped.replace(',', ""),
        (None, Some(_)) => stripped.replace(',', "."),
        _ => stripped.into_owned(),
    };

    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Coerce a nights cell to a whole number
///
/// Fractional values are rejected rather than truncated.
pub fn parse_nights(cell: &CellValue) -> Option<i64> {
    let n = match cell {
        CellValue::Number(n) => *n,
        CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= i64::MAX as f64 {
        Some(n as i64)
    } else {
        None
    }
}
