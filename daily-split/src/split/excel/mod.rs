//! Excel import of reservations and export of the split workbook

mod reader;
mod writer;

pub use reader::{read_reservations_excel, read_reservations_excel_bytes};
pub use writer::{WorkbookOptions, save_split_excel, write_split_excel};
