//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Chesstats - fetch chess statistics for a player
///
/// Asks the stats server to set up data for a username, waits until the
/// setup job reports Complete, then fetches game, win, loss and draw stats
/// and prints them as Markdown or JSON.
///
/// Examples:
///   chesstats hikaru
///   chesstats hikaru --format json --output hikaru.json
///   chesstats hikaru --base-url http://stats.local:8090 --timeout-ms 60000
///   chesstats --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Username to fetch stats for
    ///
    /// Sent to the server as-is.
    #[arg(value_name = "USERNAME", required_unless_present = "init_config")]
    pub username: Option<String>,

    /// Base URL of the stats server
    ///
    /// Can also be set via CHESSTATS_URL env var or .chesstats.toml config.
    #[arg(long, value_name = "URL", env = "CHESSTATS_URL")]
    pub base_url: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .chesstats.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Give up waiting for setup after this many milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Delay between setup status polls, in milliseconds
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Timeout for each individual HTTP request, in seconds
    #[arg(long, value_name = "SECS")]
    pub request_timeout: Option<u64>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Do not show the progress spinner
    #[arg(long)]
    pub no_progress: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .chesstats.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The username, or an empty string if not set (should be validated first).
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or("")
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref url) = self.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Base URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.timeout_ms == Some(0) {
            return Err("Timeout must be at least 1 ms".to_string());
        }

        if self.interval_ms == Some(0) {
            return Err("Poll interval must be at least 1 ms".to_string());
        }

        if self.request_timeout == Some(0) {
            return Err("Request timeout must be at least 1 second".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Whether to draw the progress spinner.
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.no_progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            username: Some("hikaru".to_string()),
            base_url: None,
            config: None,
            timeout_ms: None,
            interval_ms: None,
            request_timeout: None,
            format: None,
            output: None,
            no_progress: false,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = Args::try_parse_from([
            "chesstats",
            "hikaru",
            "--base-url",
            "http://stats.local:8090",
            "--timeout-ms",
            "5000",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.username(), "hikaru");
        assert_eq!(args.base_url.as_deref(), Some("http://stats.local:8090"));
        assert_eq!(args.timeout_ms, Some(5000));
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_username_required_unless_init_config() {
        assert!(Args::try_parse_from(["chesstats"]).is_err());
        assert!(Args::try_parse_from(["chesstats", "--init-config"]).is_ok());
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut args = make_args();
        args.base_url = Some("localhost:8090".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_durations() {
        let mut args = make_args();
        args.interval_ms = Some(0);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.request_timeout = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_empty_username_is_not_rejected() {
        let mut args = make_args();
        args.username = Some(String::new());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
        assert!(!args.show_progress());
    }
}
