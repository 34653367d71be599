//! Configuration file handling

use serde::Deserialize;
use std::path::Path;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Reporter defaults
    #[serde(default)]
    pub reporter: ReporterConfig,

    /// Stack trace filtering settings
    #[serde(default)]
    pub stack: StackConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Reporter defaults applied when a replay scenario does not set them
#[derive(Debug, Deserialize)]
pub struct ReporterConfig {
    /// Worker id stamped on every event
    #[serde(default = "default_cid")]
    pub cid: String,

    /// Strip noise lines from failure stack traces
    #[serde(default = "default_true")]
    pub clean_stack: bool,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            cid: default_cid(),
            clean_stack: true,
        }
    }
}

fn default_cid() -> String {
    "0-0".to_string()
}

fn default_true() -> bool {
    true
}

/// Stack trace filtering settings
#[derive(Debug, Deserialize, Default)]
pub struct StackConfig {
    /// Additional regexes; matching lines are dropped alongside the built-in noise
    #[serde(default)]
    pub extra_noise_patterns: Vec<String>,
}

/// Event output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One JSON object per event
    #[default]
    Json,
    /// Indented, colored tree
    Pretty,
}

/// Output configuration
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| super::Error::file_read(path, e))?;
        toml::from_str(&content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }
}
