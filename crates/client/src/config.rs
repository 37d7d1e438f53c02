//! Client configuration
//!
//! Every field has a default, so an empty config (or no config file at all)
//! yields a working client:
//!
//! | Field | Wire name | Default |
//! |-------|-----------|---------|
//! | `dataset` | `datasetName` | `"local"` |
//! | `log_level` | `logLevel` | `info` |
//! | `assets_directory` | `assetsDirectory` | `{cwd}/local-assets` |
//!
//! Configs can be built in code or loaded from a TOML file.

use docstore_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default dataset name
pub const DEFAULT_DATASET: &str = "local";

/// Subfolder of the working directory used when no assets directory is set
pub const DEFAULT_ASSETS_DIR: &str = "local-assets";

/// Logging verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything, including per-document store activity
    Debug,
    /// Lifecycle messages
    #[default]
    Info,
    /// Degraded results (unsupported queries, skipped patches)
    Warn,
    /// Failures only
    Error,
}

impl LogLevel {
    /// Lowercase name, usable as a tracing filter directive
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(Error::config(format!(
                "invalid log level '{}'. Expected one of debug, info, warn, error",
                other
            ))),
        }
    }
}

/// Client construction config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Dataset name, used to label log output
    #[serde(rename = "datasetName", default = "default_dataset")]
    pub dataset: String,
    /// Logging verbosity
    #[serde(default)]
    pub log_level: LogLevel,
    /// Where asset blobs are written; relative paths resolve against the
    /// working directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets_directory: Option<PathBuf>,
}

fn default_dataset() -> String {
    DEFAULT_DATASET.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            dataset: default_dataset(),
            log_level: LogLevel::default(),
            assets_directory: None,
        }
    }
}

impl ClientConfig {
    /// Default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dataset name
    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = dataset.into();
        self
    }

    /// Set the log level
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Set the assets directory
    pub fn with_assets_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_directory = Some(dir.into());
        self
    }

    /// Absolute assets directory
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined.
    pub fn resolved_assets_directory(&self) -> Result<PathBuf> {
        match &self.assets_directory {
            Some(dir) if dir.is_absolute() => Ok(dir.clone()),
            Some(dir) => Ok(std::env::current_dir()?.join(dir)),
            None => Ok(std::env::current_dir()?.join(DEFAULT_ASSETS_DIR)),
        }
    }

    /// Check field values
    pub fn validate(&self) -> Result<()> {
        if self.dataset.trim().is_empty() {
            return Err(Error::config("datasetName must not be empty"));
        }
        Ok(())
    }

    /// Parse a config from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ClientConfig = toml::from_str(content)
            .map_err(|e| Error::config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            Error::Config { reason } => {
                Error::config(format!("{} ({})", reason, path.display()))
            }
            other => other,
        })
    }

    /// Default config file content with comments
    pub fn default_toml() -> &'static str {
        r#"# docstore client configuration
#
# Dataset label used in log output (default: "local")
datasetName = "local"

# Log level: "debug", "info" (default), "warn" or "error"
# The DOCSTORE_LOG environment variable overrides this.
logLevel = "info"

# Directory for uploaded asset blobs.
# Relative paths resolve against the working directory.
# Default: ./local-assets
# assetsDirectory = "local-assets"
"#
    }
}
