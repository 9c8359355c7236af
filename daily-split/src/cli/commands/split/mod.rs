//! `split`: convert a reservations file into the two-sheet workbook

mod handler;

use std::path::PathBuf;

use clap::Args;

pub use handler::handle_split_command;

#[derive(Args, Debug)]
pub struct SplitCommands {
    /// Reservations file (.xlsx or .csv)
    pub input: PathBuf,

    /// Output workbook (default: <input>_with_daily_split.xlsx next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fail the whole file when any row cannot be expanded
    #[arg(long)]
    pub abort_on_row_error: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
