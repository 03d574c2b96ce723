//! Application Settings
//! Layered configuration: built-in defaults, then `salescope.toml`, then
//! `SALESCOPE__SECTION__KEY` environment variables.

use crate::data::{TextEncoding, DEFAULT_DATE_FORMATS};
use crate::stats::DEFAULT_TOP_N;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Base name of the optional settings file in the working directory.
pub const SETTINGS_FILE: &str = "salescope";
/// Prefix of environment overrides, e.g. `SALESCOPE__DATA__PATH`.
pub const ENV_PREFIX: &str = "SALESCOPE";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Root settings structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub report: ReportSettings,
    pub logging: LoggingSettings,
}

/// Where the dataset lives and how to read it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub path: PathBuf,
    pub encoding: TextEncoding,
    /// chrono format strings, tried in order.
    pub date_formats: Vec<String>,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/superstore.csv"),
            encoding: TextEncoding::Latin1,
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Batch report and dashboard output options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Length of the top/bottom product rankings.
    pub top_n: usize,
    pub chart_dir: PathBuf,
    pub chart_width: u32,
    pub chart_height: u32,
    /// Write the aggregates as JSON here when set.
    pub summary_json: Option<PathBuf>,
    /// Open rendered charts with the system viewer.
    pub open_charts: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            chart_dir: PathBuf::from("charts"),
            chart_width: 1200,
            chart_height: 700,
            summary_json: None,
            open_charts: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Reject values the pipeline cannot work with.
    pub fn validate(self) -> Result<Self, SettingsError> {
        if self.report.top_n == 0 {
            return Err(SettingsError::Invalid(
                "report.top_n must be greater than zero".to_string(),
            ));
        }
        if self.data.date_formats.is_empty() {
            return Err(SettingsError::Invalid(
                "data.date_formats must list at least one format".to_string(),
            ));
        }
        if self.report.chart_width == 0 || self.report.chart_height == 0 {
            return Err(SettingsError::Invalid(
                "report.chart_width and report.chart_height must be non-zero".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Load settings from `salescope.toml` (optional) and the environment.
pub fn load_settings() -> Result<Settings, SettingsError> {
    build(config::File::with_name(SETTINGS_FILE).required(false))
}

/// Load settings from an explicit file (required) and the environment.
pub fn load_settings_from(path: &Path) -> Result<Settings, SettingsError> {
    build(config::File::from(path).required(true))
}

fn build<S>(file: S) -> Result<Settings, SettingsError>
where
    S: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?
        .try_deserialize::<Settings>()?;

    settings.validate()
}
