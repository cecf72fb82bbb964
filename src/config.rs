//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.chesstats.toml` files.

use crate::cli::OutputFormat;
use crate::client::http::DEFAULT_BASE_URL;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".chesstats.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Stats server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Setup polling settings.
    #[serde(default)]
    pub poll: PollConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Stats server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the stats server.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for each HTTP request in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

/// Setup polling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Total time to wait for setup, in milliseconds.
    #[serde(default = "default_poll_timeout")]
    pub timeout_ms: u64,

    /// Delay between polls, in milliseconds.
    #[serde(default = "default_poll_interval")]
    pub interval_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_poll_timeout(),
            interval_ms: default_poll_interval(),
        }
    }
}

fn default_poll_timeout() -> u64 {
    30_000
}

fn default_poll_interval() -> u64 {
    1_000
}

/// Output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report format.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.chesstats.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were explicitly provided.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref base_url) = args.base_url {
            self.server.base_url = base_url.clone();
        }
        if let Some(timeout) = args.request_timeout {
            self.server.request_timeout_seconds = timeout;
        }

        if let Some(timeout) = args.timeout_ms {
            self.poll.timeout_ms = timeout;
        }
        if let Some(interval) = args.interval_ms {
            self.poll.interval_ms = interval;
        }

        if let Some(format) = args.format {
            self.output.format = format;
        }
    }

    /// Validate the merged settings with the same rules as the CLI.
    pub fn validate(&self) -> Result<()> {
        let url = &self.server.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            bail!("Base URL must start with 'http://' or 'https://'");
        }

        if self.server.request_timeout_seconds == 0 {
            bail!("Request timeout must be at least 1 second");
        }

        if self.poll.timeout_ms == 0 {
            bail!("Timeout must be at least 1 ms");
        }

        if self.poll.interval_ms == 0 {
            bail!("Poll interval must be at least 1 ms");
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
