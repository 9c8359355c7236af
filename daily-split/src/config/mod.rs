//! Configuration for the daily split tool
//!
//! Settings come from a TOML file (`--config <file>`, or
//! `~/.config/daily-split/config.toml` when present). Every key is optional.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::split::{RowErrorPolicy, SplitOptions, WorkbookOptions};

/// Maximum sheet name length accepted by Excel
const MAX_SHEET_NAME_LEN: usize = 31;

/// Characters Excel rejects in sheet names
const INVALID_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// What to do with rows that cannot be expanded
    pub on_row_error: RowErrorPolicy,
    /// Decimals displayed for nightly revenue
    pub revenue_decimals: u8,
    pub original_sheet: String,
    pub daily_sheet: String,
    /// Address for `serve`
    pub bind: SocketAddr,
    /// Largest accepted upload for `serve`
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        let workbook = WorkbookOptions::default();
        Self {
            on_row_error: RowErrorPolicy::default(),
            revenue_decimals: workbook.revenue_decimals,
            original_sheet: workbook.original_sheet,
            daily_sheet: workbook.daily_sheet,
            bind: SocketAddr::from(([127, 0, 0, 1], 8501)),
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the default location is
    /// used if present, otherwise built-in defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file does not exist: {}", path.display());
                }
                path.to_path_buf()
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    log::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Default config location (~/.config/daily-split/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("daily-split").join("config.toml"))
    }

    /// Parse and validate TOML content
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.revenue_decimals > 10 {
            bail!(
                "revenue_decimals must be between 0 and 10, got {}",
                self.revenue_decimals
            );
        }
        validate_sheet_name("original_sheet", &self.original_sheet)?;
        validate_sheet_name("daily_sheet", &self.daily_sheet)?;
        if self.original_sheet.eq_ignore_ascii_case(&self.daily_sheet) {
            bail!(
                "original_sheet and daily_sheet must differ, both are '{}'",
                self.daily_sheet
            );
        }
        if self.max_upload_bytes == 0 {
            bail!("max_upload_bytes must be greater than 0");
        }
        Ok(())
    }

    pub fn split_options(&self) -> SplitOptions {
        SplitOptions {
            on_row_error: self.on_row_error,
            ..SplitOptions::default()
        }
    }

    pub fn workbook_options(&self) -> WorkbookOptions {
        WorkbookOptions {
            original_sheet: self.original_sheet.clone(),
            daily_sheet: self.daily_sheet.clone(),
            revenue_decimals: self.revenue_decimals,
        }
    }
}

fn validate_sheet_name(key: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("{} cannot be empty", key);
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        bail!(
            "{} '{}' is longer than {} characters",
            key,
            name,
            MAX_SHEET_NAME_LEN
        );
    }
    if let Some(c) = name.chars().find(|c| INVALID_SHEET_CHARS.contains(c)) {
        bail!("{} '{}' contains invalid character '{}'", key, name, c);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.on_row_error, RowErrorPolicy::Skip);
        assert_eq!(config.original_sheet, "Original Data");
        assert_eq!(config.daily_sheet, "Daily Split Data");
        assert_eq!(config.revenue_decimals, 2);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_toml_str(
            r#"
            on_row_error = "abort"
            revenue_decimals = 3
            daily_sheet = "Nights"
            bind = "0.0.0.0:9000"
            "#,
        )
        .unwrap();
        assert_eq!(config.split_options().on_row_error, RowErrorPolicy::Abort);
        assert_eq!(config.workbook_options().revenue_decimals, 3);
        assert_eq!(config.workbook_options().daily_sheet, "Nights");
        assert_eq!(config.workbook_options().original_sheet, "Original Data");
        assert_eq!(config.bind.port(), 9000);
    }

    #[test]
    fn test_rejects_unknown_policy_and_keys() {
        assert!(Config::from_toml_str(r#"on_row_error = "ignore""#).is_err());
        assert!(Config::from_toml_str(r#"sheet = "x""#).is_err());
    }

    #[test]
    fn test_rejects_invalid_sheet_names() {
        assert!(Config::from_toml_str(r#"daily_sheet = """#).is_err());
        assert!(Config::from_toml_str(r#"daily_sheet = "a/b""#).is_err());
        assert!(Config::from_toml_str(r#"daily_sheet = "original data""#).is_err());
        assert!(Config::from_toml_str(&format!("daily_sheet = \"{}\"", "x".repeat(32))).is_err());
        assert!(Config::from_toml_str("revenue_decimals = 11").is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "on_row_error = \"abort\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.on_row_error, RowErrorPolicy::Abort);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let err = Config::load(Some(Path::new("/nonexistent/daily-split.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/daily-split.toml"));
    }

    #[test]
    fn test_load_invalid_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "revenue_decimals = \"two\"").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }
}
