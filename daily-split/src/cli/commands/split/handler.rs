//! Split command handler

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use colored::*;

use super::SplitCommands;
use crate::config::Config;
use crate::split::{RowErrorPolicy, SplitEngine, SplitOutput, read_reservations, save_split_excel};

/// Handle the split command
pub fn handle_split_command(args: SplitCommands, config: &Config) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }

    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));

    if output_path == args.input {
        anyhow::bail!(
            "Output would overwrite the input file: {}",
            output_path.display()
        );
    }

    let mut options = config.split_options();
    if args.abort_on_row_error {
        options.on_row_error = RowErrorPolicy::Abort;
    }

    let start = Instant::now();

    let table = read_reservations(&args.input)?;
    log::info!(
        "Loaded {} reservations from {}",
        table.len(),
        args.input.display()
    );

    let output = SplitEngine::new(options)
        .run(&table)
        .with_context(|| format!("Failed to split {}", args.input.display()))?;

    save_split_excel(&output, &config.workbook_options(), &output_path)?;

    print_summary(&output, &output_path, start.elapsed().as_secs_f64());
    Ok(())
}

/// `<dir>/<stem>_with_daily_split.xlsx`
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "reservations".to_string());
    input.with_file_name(format!("{}_with_daily_split.xlsx", stem))
}

fn print_summary(output: &SplitOutput, output_path: &Path, elapsed_secs: f64) {
    println!(
        "{} {} reservations into {} nightly rows ({:.2}s)",
        "Split".bright_green().bold(),
        output.reservation_count(),
        output.daily.len(),
        elapsed_secs
    );

    if !output.skipped.is_empty() {
        println!();
        println!(
            "{}",
            format!("Skipped {} row problem(s):", output.skipped.len())
                .yellow()
                .bold()
        );
        for error in &output.skipped {
            println!("  {} {}", "-".yellow(), error);
        }
    }

    if !output.warnings.is_empty() {
        println!();
        println!("{}", "Warnings:".yellow().bold());
        for warning in &output.warnings {
            println!("  {} {}", "-".yellow(), warning);
        }
    }

    println!();
    println!("Written to: {}", output_path.display().to_string().cyan());
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "Reservation Number,Apartment,Guest Name,Channel,Arrival,Departure,Booking Date,Nights,Base Revenue,Total Revenue\n\
                       R1,Apt 4,Jane Doe,Airbnb,10/01/2024,13/01/2024,01/12/2023,3,300,450\n\
                       R2,Apt 5,John Roe,Direct,someday,13/01/2024,01/12/2023,3,300,450\n";

    fn args(input: PathBuf, output: Option<PathBuf>, abort: bool) -> SplitCommands {
        SplitCommands {
            input,
            output,
            abort_on_row_error: abort,
            no_color: true,
        }
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/data/bookings.xlsx")),
            PathBuf::from("/data/bookings_with_daily_split.xlsx")
        );
        assert_eq!(
            default_output_path(Path::new("march.csv")),
            PathBuf::from("march_with_daily_split.xlsx")
        );
    }

    #[test]
    fn test_split_writes_workbook_and_skips_bad_rows() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bookings.csv");
        std::fs::write(&input, CSV).unwrap();

        handle_split_command(args(input.clone(), None, false), &Config::default()).unwrap();

        let written = dir.path().join("bookings_with_daily_split.xlsx");
        let original = read_reservations(&written).unwrap();
        assert_eq!(original.len(), 2);
        assert_eq!(original.cell(1, 4).to_string(), "someday");
    }

    #[test]
    fn test_abort_policy_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bookings.csv");
        let output = dir.path().join("out.xlsx");
        std::fs::write(&input, CSV).unwrap();

        let err = handle_split_command(args(input, Some(output.clone()), true), &Config::default())
            .unwrap_err();
        assert!(format!("{:#}", err).contains("row 3, Arrival: cannot parse date 'someday'"));
        assert!(!output.exists());
    }

    #[test]
    fn test_schema_error_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bookings.csv");
        let output = dir.path().join("out.xlsx");
        std::fs::write(&input, "Reservation Number,Arrival,Departure\nR1,10/01/2024,13/01/2024\n")
            .unwrap();

        let err = handle_split_command(args(input, Some(output.clone()), false), &Config::default())
            .unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("Failed to split"));
        assert!(msg.contains("Nights"));
        assert!(!output.exists());
    }

    #[test]
    fn test_refuses_to_overwrite_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bookings.xlsx");
        std::fs::write(&input, b"not really a workbook").unwrap();

        let err = handle_split_command(args(input.clone(), Some(input), false), &Config::default())
            .unwrap_err();
        assert!(err.to_string().contains("overwrite"));
    }

    #[test]
    fn test_missing_input() {
        let err = handle_split_command(
            args(PathBuf::from("/nonexistent/bookings.xlsx"), None, false),
            &Config::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
