//! `preview`: show the split in the terminal

mod handler;

use std::path::PathBuf;

use clap::Args;

pub use handler::handle_preview_command;

#[derive(Args, Debug)]
pub struct PreviewCommands {
    /// Reservations file (.xlsx or .csv)
    pub input: PathBuf,

    /// Number of daily rows to show
    #[arg(short, long, default_value_t = 20)]
    pub rows: usize,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
