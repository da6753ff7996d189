//! Configuration management for typeahead
//!
//! Settings are loaded from a TOML file and fall back to built-in defaults.
//! Command-line flags of the demo binary override whatever the file says.
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Controller defaults
    #[serde(default)]
    pub autocomplete: AutocompleteConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings handed to the suggestion engine when a session is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompleteConfig {
    /// CSS-like class name of the suggestion container
    #[serde(default = "default_class_name")]
    pub class_name: String,

    /// Minimum number of characters before suggestions are fetched
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    /// Message shown when a fetch resolves with no items
    #[serde(default = "default_empty_msg")]
    pub empty_msg: String,

    /// Debounce interval in milliseconds (None disables debouncing)
    #[serde(default = "default_debounce_wait_ms")]
    pub debounce_wait_ms: Option<u64>,

    /// Wipe the field when its text no longer matches the selected item
    #[serde(default = "default_strict_value")]
    pub strict_value: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_class_name() -> String {
    "autocomplete-widget".to_string()
}

fn default_min_length() -> usize {
    2
}

fn default_empty_msg() -> String {
    "No matches found".to_string()
}

fn default_debounce_wait_ms() -> Option<u64> {
    Some(1000)
}

fn default_strict_value() -> bool {
    true
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    true
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            class_name: default_class_name(),
            min_length: default_min_length(),
            empty_msg: default_empty_msg(),
            debounce_wait_ms: default_debounce_wait_ms(),
            strict_value: default_strict_value(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Load configuration from an explicit path or the default location
    ///
    /// An explicit path must exist. A missing file at the default location
    /// yields the built-in defaults.
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Self::default_path();
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - Path to default configuration file
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".typeahead")
            .join("config.toml")
    }
}

impl AutocompleteConfig {
    /// Get the debounce interval as Duration
    pub fn debounce_wait(&self) -> Option<Duration> {
        self.debounce_wait_ms.map(Duration::from_millis)
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
