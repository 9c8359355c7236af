//! Command-line interface

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::{PreviewCommands, ServeCommands, SplitCommands};

/// Split reservation spreadsheets into one row per stay night
#[derive(Parser, Debug)]
#[command(name = "daily-split")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a TOML config file (default: ~/.config/daily-split/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a reservations file and write the two-sheet workbook
    Split(SplitCommands),
    /// Print the first rows of the daily split without writing a file
    Preview(PreviewCommands),
    /// Serve an upload form that returns the split workbook
    Serve(ServeCommands),
}

impl Cli {
    /// Log level from -v flags; RUST_LOG still overrides it
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_split_with_flags() {
        let cli = Cli::try_parse_from([
            "daily-split",
            "-vv",
            "split",
            "bookings.xlsx",
            "-o",
            "out.xlsx",
            "--abort-on-row-error",
        ])
        .unwrap();

        assert_eq!(cli.log_level(), log::LevelFilter::Debug);
        match cli.command {
            Commands::Split(args) => {
                assert_eq!(args.input, PathBuf::from("bookings.xlsx"));
                assert_eq!(args.output, Some(PathBuf::from("out.xlsx")));
                assert!(args.abort_on_row_error);
            }
            other => panic!("expected split, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_preview_defaults() {
        let cli = Cli::try_parse_from(["daily-split", "preview", "bookings.csv"]).unwrap();
        assert_eq!(cli.log_level(), log::LevelFilter::Warn);
        match cli.command {
            Commands::Preview(args) => assert_eq!(args.rows, 20),
            other => panic!("expected preview, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_serve_bind_and_global_config() {
        let cli = Cli::try_parse_from([
            "daily-split",
            "serve",
            "--bind",
            "0.0.0.0:8080",
            "--config",
            "split.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("split.toml")));
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.bind.map(|a| a.port()), Some(8080)),
            other => panic!("expected serve, got {:?}", other),
        }
    }
}
