//! Subcommand arguments and handlers

pub mod preview;
pub mod serve;
pub mod split;

pub use preview::PreviewCommands;
pub use serve::ServeCommands;
pub use split::SplitCommands;
