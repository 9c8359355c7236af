//! Core types for the daily split

mod reservation;
mod table;
mod value;

pub use reservation::*;
pub use table::*;
pub use value::*;
