//! Preview command handler

use anyhow::{Context, Result};
use colored::*;

use super::PreviewCommands;
use crate::config::Config;
use crate::split::{SplitEngine, SplitOutput, read_reservations};

/// Rows of uploaded data shown above the daily split
const ORIGINAL_PREVIEW_ROWS: usize = 5;

/// Handle the preview command
pub fn handle_preview_command(args: PreviewCommands, config: &Config) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }

    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }

    let table = read_reservations(&args.input)?;
    let output = SplitEngine::new(config.split_options())
        .run(&table)
        .with_context(|| format!("Failed to split {}", args.input.display()))?;

    print!("{}", render_preview(&output, args.rows));
    Ok(())
}

/// Both previews followed by skipped rows and warnings
fn render_preview(output: &SplitOutput, rows: usize) -> String {
    let daily = output.daily_table();
    let mut out = String::new();

    out.push_str(&format!("{}\n", "Preview of uploaded data".bright_blue().bold()));
    out.push_str(&output.original.render_text(ORIGINAL_PREVIEW_ROWS));
    out.push('\n');

    out.push_str(&format!(
        "{}\n",
        format!(
            "Preview of daily split (first {} of {} rows)",
            rows.min(daily.len()),
            daily.len()
        )
        .bright_blue()
        .bold()
    ));
    out.push_str(&daily.render_text(rows));

    for error in &output.skipped {
        out.push_str(&format!("{} {}\n", "skipped:".yellow(), error));
    }
    for warning in &output.warnings {
        out.push_str(&format!("{} {}\n", "warning:".yellow(), warning));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const CSV: &str = "Reservation Number,Apartment,Guest Name,Channel,Arrival,Departure,Booking Date,Nights,Base Revenue,Total Revenue\n\
                       R1,Apt 4,Jane Doe,Airbnb,10/01/2024,13/01/2024,01/12/2023,3,300,450\n\
                       R2,Apt 5,John Roe,Direct,someday,13/01/2024,01/12/2023,3,300,450\n";

    fn args(input: PathBuf, rows: usize) -> PreviewCommands {
        PreviewCommands {
            input,
            rows,
            no_color: true,
        }
    }

    fn split_csv(csv: &str) -> SplitOutput {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bookings.csv");
        std::fs::write(&input, csv).unwrap();
        let table = read_reservations(&input).unwrap();
        SplitEngine::new(Config::default().split_options())
            .run(&table)
            .unwrap()
    }

    #[test]
    fn test_preview_runs_on_csv() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bookings.csv");
        std::fs::write(&input, CSV).unwrap();

        handle_preview_command(args(input, 2), &Config::default()).unwrap();
    }

    #[test]
    fn test_render_preview_limits_rows_and_lists_problems() {
        let rendered = render_preview(&split_csv(CSV), 2);

        assert!(rendered.contains("Preview of daily split (first 2 of 3 rows)"));
        assert!(rendered.contains("10-01-2024"));
        assert!(rendered.contains("11-01-2024"));
        // Third night is past the row limit
        assert!(!rendered.contains("12-01-2024"));
        assert!(rendered.contains("row 3, Arrival: cannot parse date 'someday'"));
    }

    #[test]
    fn test_preview_schema_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bookings.csv");
        std::fs::write(&input, "Reservation Number,Arrival,Departure\nR1,10/01/2024,13/01/2024\n")
            .unwrap();

        let err = handle_preview_command(args(input, 20), &Config::default()).unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("Failed to split"));
        assert!(msg.contains("bookings.csv"));
        assert!(msg.contains("Nights"));
    }

    #[test]
    fn test_preview_missing_input() {
        let err = handle_preview_command(
            args(PathBuf::from("/nonexistent/bookings.xlsx"), 20),
            &Config::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
