//! Errors and warnings produced while splitting reservations

use super::schema::{Column, SchemaError};

/// Why a single reservation row could not be expanded
#[derive(Debug, Clone, PartialEq)]
pub enum RowErrorKind {
    /// A date cell is blank or not a recognizable date
    DateParse { raw: String },
    /// Nights is missing, zero, negative or not a whole number
    RevenueDivision { raw: String },
    /// A revenue amount is missing, not a number or negative
    InvalidAmount { raw: String },
}

/// A row-level problem, located by sheet line and column
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    /// 1-based line in the source sheet
    pub line: usize,
    pub column: Column,
    pub kind: RowErrorKind,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}, {}: ", self.line, self.column)?;
        match &self.kind {
            RowErrorKind::DateParse { raw } if raw.is_empty() => write!(f, "date is missing"),
            RowErrorKind::DateParse { raw } => write!(f, "cannot parse date '{}'", raw),
            RowErrorKind::RevenueDivision { raw } if raw.is_empty() => {
                write!(f, "nights is missing, cannot divide revenue per night")
            }
            RowErrorKind::RevenueDivision { raw } => write!(
                f,
                "nights must be a positive whole number to divide revenue, got '{}'",
                raw
            ),
            RowErrorKind::InvalidAmount { raw } if raw.is_empty() => write!(f, "amount is missing"),
            RowErrorKind::InvalidAmount { raw } => {
                write!(f, "amount must be a non-negative number, got '{}'", raw)
            }
        }
    }
}

impl std::error::Error for RowError {}

/// Non-fatal findings about an expanded row
#[derive(Debug, Clone, PartialEq)]
pub enum RowWarning {
    /// Nights disagrees with the arrival/departure span
    NightsMismatch {
        line: usize,
        nights: u32,
        span: i64,
    },
}

impl std::fmt::Display for RowWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowWarning::NightsMismatch { line, nights, span } => write!(
                f,
                "row {}: Nights is {} but the stay spans {} night{}; revenue was divided by {}",
                line,
                nights,
                span,
                if *span == 1 { "" } else { "s" },
                span
            ),
        }
    }
}

/// Failure of a whole split invocation
#[derive(Debug, Clone, PartialEq)]
pub enum SplitError {
    /// Required columns are missing; nothing was produced
    Schema(SchemaError),
    /// Rows failed under the abort policy; every offending row is listed
    Rows(Vec<RowError>),
    /// Expanding a row would overflow the daily worksheet
    SheetRowLimit {
        line: usize,
        nights: i64,
        limit: usize,
    },
}

impl std::fmt::Display for SplitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SplitError::Schema(err) => write!(f, "{}", err),
            SplitError::Rows(errors) => {
                write!(
                    f,
                    "{} row error{}:",
                    errors.len(),
                    if errors.len() == 1 { "" } else { "s" }
                )?;
                for error in errors {
                    write!(f, "\n  {}", error)?;
                }
                Ok(())
            }
            SplitError::SheetRowLimit {
                line,
                nights,
                limit,
            } => write!(
                f,
                "row {}, Departure: the stay spans {} nights, which takes the daily sheet past its limit of {} rows",
                line, nights, limit
            ),
        }
    }
}

impl std::error::Error for SplitError {}

impl From<SchemaError> for SplitError {
    fn from(err: SchemaError) -> Self {
        SplitError::Schema(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_error_messages_name_row_and_column() {
        let err = RowError {
            line: 5,
            column: Column::Arrival,
            kind: RowErrorKind::DateParse {
                raw: "31/02/2024".to_string(),
            },
        };
        assert_eq!(err.to_string(), "row 5, Arrival: cannot parse date '31/02/2024'");

        let err = RowError {
            line: 7,
            column: Column::Nights,
            kind: RowErrorKind::RevenueDivision { raw: String::new() },
        };
        assert_eq!(
            err.to_string(),
            "row 7, Nights: nights is missing, cannot divide revenue per night"
        );
    }

    #[test]
    fn test_split_error_lists_every_row() {
        let err = SplitError::Rows(vec![
            RowError {
                line: 2,
                column: Column::Departure,
                kind: RowErrorKind::DateParse { raw: String::new() },
            },
            RowError {
                line: 4,
                column: Column::BaseRevenue,
                kind: RowErrorKind::InvalidAmount {
                    raw: "-5".to_string(),
                },
            },
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("2 row errors:"));
        assert!(msg.contains("row 2, Departure: date is missing"));
        assert!(msg.contains("row 4, Base Revenue: amount must be a non-negative number, got '-5'"));
    }

    #[test]
    fn test_nights_mismatch_message() {
        let warning = RowWarning::NightsMismatch {
            line: 3,
            nights: 2,
            span: 3,
        };
        assert_eq!(
            warning.to_string(),
            "row 3: Nights is 2 but the stay spans 3 nights; revenue was divided by 3"
        );
    }

    #[test]
    fn test_sheet_row_limit_names_row_and_column() {
        let err = SplitError::SheetRowLimit {
            line: 4,
            nights: 2_556_700,
            limit: 1_048_575,
        };
        assert_eq!(
            err.to_string(),
            "row 4, Departure: the stay spans 2556700 nights, which takes the daily sheet past its limit of 1048575 rows"
        );
    }
}
