//! Configuration management for the Athena console.
//!
//! Handles loading configuration from a TOML file and environment variables.
//! Command-line arguments are merged on top by the caller.

use crate::error::{AthenaError, Result};
use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Default number of history entries kept by the shell.
pub const DEFAULT_HISTORY_SIZE: usize = 500;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Query session defaults.
    #[serde(default)]
    pub session: SessionConfig,

    /// Interactive shell settings.
    #[serde(default)]
    pub shell: ShellConfig,
}

/// Settings that shape how queries are submitted and rendered.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SessionConfig {
    /// Default schema (database) for unqualified table names.
    pub schema: Option<String>,

    /// Output format; the front end picks its own default when unset.
    pub output_format: Option<OutputFormat>,

    /// AWS profile name.
    pub profile: Option<String>,

    /// AWS region.
    pub region: Option<String>,

    /// Where the service writes result files, e.g. `s3://bucket/prefix/`.
    pub result_location: Option<String>,

    /// Request SSE-S3 encryption of result files.
    #[serde(default)]
    pub encryption: bool,
}

impl SessionConfig {
    /// Merges another config into this one, with the other taking precedence.
    pub fn merge(&mut self, other: &SessionConfig) {
        if other.schema.is_some() {
            self.schema = other.schema.clone();
        }
        if other.output_format.is_some() {
            self.output_format = other.output_format;
        }
        if other.profile.is_some() {
            self.profile = other.profile.clone();
        }
        if other.region.is_some() {
            self.region = other.region.clone();
        }
        if other.result_location.is_some() {
            self.result_location = other.result_location.clone();
        }
        self.encryption |= other.encryption;
    }

    /// Applies AWS environment variables as defaults.
    pub fn apply_env_defaults(&mut self) {
        if self.profile.is_none() {
            self.profile = std::env::var("AWS_DEFAULT_PROFILE")
                .or_else(|_| std::env::var("AWS_PROFILE"))
                .ok()
                .filter(|p| !p.is_empty());
        }
        if self.region.is_none() {
            self.region = std::env::var("AWS_DEFAULT_REGION")
                .ok()
                .filter(|r| !r.is_empty());
        }
    }

    /// Parses the configured result location, if any.
    pub fn result_location_url(&self) -> Result<Option<Url>> {
        self.result_location
            .as_deref()
            .map(parse_result_location)
            .transpose()
    }

    /// Schema with surrounding whitespace and empty values removed.
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Interactive shell settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShellConfig {
    /// Pager command line; results are piped into its stdin.
    pub pager: Option<String>,

    /// History file path.
    pub history_file: Option<PathBuf>,

    /// Maximum number of history entries kept.
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

fn default_history_size() -> usize {
    DEFAULT_HISTORY_SIZE
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            pager: None,
            history_file: None,
            history_size: default_history_size(),
        }
    }
}

impl ShellConfig {
    /// Applies `ATHENA_CLI_PAGER` as the pager default.
    pub fn apply_env_defaults(&mut self) {
        if self.pager.is_none() {
            self.pager = std::env::var("ATHENA_CLI_PAGER")
                .ok()
                .filter(|p| !p.trim().is_empty());
        }
    }

    /// Pager command line for `format`. A configured pager wins over the
    /// format's default.
    pub fn pager_command(&self, format: OutputFormat) -> &str {
        self.pager.as_deref().unwrap_or(format.default_pager())
    }

    /// History file path, falling back to `~/.athena_history`.
    pub fn history_path(&self) -> PathBuf {
        self.history_file.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".athena_history")
        })
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("athena-cli")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AthenaError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            AthenaError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Applies environment defaults to every section.
    pub fn apply_env_defaults(&mut self) {
        self.session.apply_env_defaults();
        self.shell.apply_env_defaults();
    }
}

/// Parses a result location, accepting a bare bucket name as `s3://<name>`.
pub fn parse_result_location(location: &str) -> Result<Url> {
    let location = location.trim();
    if location.is_empty() {
        return Err(AthenaError::config("Result location must not be empty"));
    }

    let url = if location.contains("://") {
        Url::parse(location)
    } else {
        Url::parse(&format!("s3://{location}"))
    }
    .map_err(|e| AthenaError::config(format!("Invalid result location '{location}': {e}")))?;

    if url.scheme() != "s3" {
        return Err(AthenaError::config(format!(
            "Invalid scheme '{}' in result location. Expected 's3'",
            url.scheme()
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(AthenaError::config(format!(
            "Result location '{location}' has no bucket"
        )));
    }
    Ok(url)
}
