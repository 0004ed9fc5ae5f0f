use clap::{ArgGroup, CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ActlogError, Result};
use crate::models::{ChartKind, Period};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Descriptive statistics and charts for personal activity logs
#[derive(Parser, Debug, Clone)]
#[command(
    name = "actlog",
    about = "Descriptive statistics and charts for personal activity logs",
    version
)]
#[command(group(
    ArgGroup::new("selection")
        .required(true)
        .args(["chart", "all"])
))]
pub struct Settings {
    /// Path to the activity log file
    #[arg(short, long)]
    pub file: PathBuf,

    /// Chart to render (all = every chart as its own file)
    #[arg(long, value_enum)]
    pub chart: Option<ChartKind>,

    /// Render every chart as subplots of one combined figure
    #[arg(long)]
    pub all: bool,

    /// Bucket size for the frequency chart
    #[arg(long, value_enum, default_value_t = Period::Month)]
    pub period: Period,

    /// Output directory for rendered images
    #[arg(long, default_value = "charts")]
    pub output: PathBuf,

    /// Image size (WIDTHxHEIGHT)
    #[arg(long, default_value = "1200x800")]
    pub size: String,

    /// Skip unparseable rows instead of aborting
    #[arg(long)]
    pub skip_invalid: bool,

    /// Timezone for offset-carrying timestamps (auto-detected if not specified)
    #[arg(long, default_value = "auto")]
    pub timezone: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.actlog/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    /// Uses `~/.actlog/last_used.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".actlog").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        // Build raw ArgMatches so we can query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());

        // Parse into the typed struct using the same args.
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return settings;
        }

        let last = LastUsedParams::load_from(config_path);

        // Merge last-used values for fields that were NOT explicitly set on
        // the command line (CLI always wins).
        if !is_arg_explicitly_set(&matches, "period") {
            if let Some(v) = last.period {
                settings.period = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "output") {
            if let Some(v) = last.output {
                settings.output = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "size") {
            if let Some(v) = last.size {
                settings.size = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "timezone") {
            if let Some(v) = last.timezone {
                settings.timezone = v;
            }
        }

        // Persist current settings for next run.
        let params = LastUsedParams::from(&settings);
        let _ = params.save_to(config_path);

        settings
    }

    /// Parse the `--size` argument into `(width, height)` pixels.
    pub fn image_size(&self) -> Result<(u32, u32)> {
        parse_size(&self.size)
    }
}

/// Parse a `WIDTHxHEIGHT` string; both dimensions must be non-zero.
pub fn parse_size(size_str: &str) -> Result<(u32, u32)> {
    let parts: Vec<&str> = size_str.split('x').collect();
    if parts.len() != 2 {
        return Err(ActlogError::InvalidSizeFormat(size_str.to_string()));
    }

    let width = parts[0]
        .parse::<u32>()
        .map_err(|_| ActlogError::InvalidSizeFormat(size_str.to_string()))?;
    let height = parts[1]
        .parse::<u32>()
        .map_err(|_| ActlogError::InvalidSizeFormat(size_str.to_string()))?;

    if width == 0 || height == 0 {
        return Err(ActlogError::InvalidSizeFormat(size_str.to_string()));
    }

    Ok((width, height))
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            period: Some(s.period),
            output: Some(s.output.clone()),
            size: Some(s.size.clone()),
            timezone: Some(s.timezone.clone()),
        }
    }
}

// ── Helper: check if an arg was explicitly set on the command line ─────────────

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn args(list: &[&str]) -> Vec<OsString> {
        std::iter::once("actlog")
            .chain(list.iter().copied())
            .map(OsString::from)
            .collect()
    }

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    // ── LastUsedParams ────────────────────────────────────────────────────────

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            period: Some(Period::Week),
            output: Some(PathBuf::from("out")),
            size: Some("800x600".to_string()),
            timezone: Some("Europe/Berlin".to_string()),
        };

        params.save_to(&path).expect("save");
        let loaded = LastUsedParams::load_from(&path);

        assert_eq!(loaded.period, Some(Period::Week));
        assert_eq!(loaded.output, Some(PathBuf::from("out")));
        assert_eq!(loaded.size, Some("800x600".to_string()));
        assert_eq!(loaded.timezone, Some("Europe/Berlin".to_string()));
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);

        let params = LastUsedParams {
            size: Some("640x480".to_string()),
            ..Default::default()
        };
        params.save_to(&path).expect("save");
        assert!(path.exists(), "file must exist after save");

        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists(), "file must be gone after clear");
    }

    #[test]
    fn test_last_used_params_default_when_missing() {
        let tmp = TempDir::new().expect("tempdir");
        let loaded = LastUsedParams::load_from(&tmp_config_path(&tmp));
        assert!(loaded.period.is_none());
        assert!(loaded.size.is_none());
    }

    // ── load_with_last_used ───────────────────────────────────────────────────

    #[test]
    fn test_defaults_are_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);

        let settings =
            Settings::load_with_last_used_impl(args(&["-f", "log.csv", "--chart", "freq"]), &path);

        assert_eq!(settings.period, Period::Month);
        assert!(path.exists(), "params must be persisted");
    }

    #[test]
    fn test_last_used_merged_when_not_on_cli() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);

        // First run sets an explicit period and size.
        Settings::load_with_last_used_impl(
            args(&[
                "-f", "log.csv", "--chart", "freq", "--period", "week", "--size", "640x480",
            ]),
            &path,
        );

        // Second run without those flags picks them up from last-used.
        let settings =
            Settings::load_with_last_used_impl(args(&["-f", "log.csv", "--chart", "kde"]), &path);

        assert_eq!(settings.period, Period::Week);
        assert_eq!(settings.size, "640x480");
    }

    #[test]
    fn test_cli_wins_over_last_used() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);

        Settings::load_with_last_used_impl(
            args(&["-f", "log.csv", "--chart", "freq", "--period", "week"]),
            &path,
        );

        let settings = Settings::load_with_last_used_impl(
            args(&["-f", "log.csv", "--chart", "freq", "--period", "day"]),
            &path,
        );

        assert_eq!(settings.period, Period::Day);
    }

    #[test]
    fn test_clear_removes_config() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);

        Settings::load_with_last_used_impl(
            args(&["-f", "log.csv", "--chart", "freq", "--period", "week"]),
            &path,
        );
        assert!(path.exists());

        Settings::load_with_last_used_impl(
            args(&["-f", "log.csv", "--chart", "freq", "--clear"]),
            &path,
        );
        assert!(!path.exists(), "clear must drop the persisted params");
    }

    #[test]
    fn test_chart_and_all_conflict() {
        let result =
            Settings::try_parse_from(args(&["-f", "log.csv", "--chart", "freq", "--all"]));
        assert!(result.is_err(), "--chart and --all are mutually exclusive");
    }

    #[test]
    fn test_selection_required() {
        let result = Settings::try_parse_from(args(&["-f", "log.csv"]));
        assert!(result.is_err(), "one of --chart / --all is required");
    }

    // ── parse_size ────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_size_valid() {
        assert_eq!(parse_size("1200x800").unwrap(), (1200, 800));
    }

    #[test]
    fn test_parse_size_invalid() {
        assert!(parse_size("1200by800").is_err());
        assert!(parse_size("1200x0").is_err());
        assert!(parse_size("x").is_err());
        assert!(parse_size("800").is_err());
    }
}
