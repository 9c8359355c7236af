//! Reservation daily split
//!
//! Expands reservation rows into one row per stay night and divides the
//! stay's revenue evenly across those nights.

pub mod amounts;
mod csv_input;
pub mod dates;
pub mod engine;
pub mod error;
pub mod excel;
pub mod schema;
pub mod types;

use std::path::Path;

use anyhow::{Result, bail};

pub use csv_input::{read_reservations_csv, read_reservations_csv_bytes};
pub use engine::{RowErrorPolicy, SplitEngine, SplitOptions, SplitOutput};
pub use error::{RowError, RowErrorKind, RowWarning, SplitError};
pub use excel::{WorkbookOptions, save_split_excel, write_split_excel};
pub use types::*;

/// Input formats accepted for reservation files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Xlsx,
    Csv,
}

impl InputFormat {
    /// Detect the format from a file name's extension
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" => Some(InputFormat::Xlsx),
            "csv" => Some(InputFormat::Csv),
            _ => None,
        }
    }
}

/// Read a reservations file, choosing the reader from its extension
pub fn read_reservations<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    match InputFormat::from_file_name(&path.to_string_lossy()) {
        Some(InputFormat::Xlsx) => excel::read_reservations_excel(path),
        Some(InputFormat::Csv) => read_reservations_csv(path),
        None => bail!(
            "Unsupported file type: {} (expected .xlsx or .csv)",
            path.display()
        ),
    }
}

/// Read reservations from uploaded bytes
pub fn read_reservations_bytes(bytes: &[u8], format: InputFormat) -> Result<Table> {
    match format {
        InputFormat::Xlsx => excel::read_reservations_excel_bytes(bytes),
        InputFormat::Csv => read_reservations_csv_bytes(bytes),
    }
}
