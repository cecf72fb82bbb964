//! Chesstats - fetch chess statistics for a player
//!
//! A CLI tool that asks a stats server to set up data for a username,
//! polls until the setup job completes, and then fetches game, win, loss
//! and draw statistics in parallel.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Any failure (bad arguments, config, setup, or stats fetch)

mod cli;
mod client;
mod config;
mod error;
mod fetcher;
mod report;
mod setup;
mod stats;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use client::HttpTransport;
use config::{Config, CONFIG_FILE_NAME};
use fetcher::StatsFetcher;
use indicatif::{ProgressBar, ProgressStyle};
use setup::PollPolicy;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args)?;

    info!("chesstats v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Fetch failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .chesstats.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE_NAME);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so stdout only carries the report.
fn init_logging(args: &Args) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")
}

/// Fetch stats for the requested user and emit the report.
async fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate().context("Invalid configuration")?;

    let username = args.username();
    let policy = PollPolicy::from(&config.poll);

    let transport = HttpTransport::new(
        &config.server.base_url,
        Duration::from_secs(config.server.request_timeout_seconds),
    )?;
    let fetcher = StatsFetcher::new(transport, policy);

    info!(
        base_url = fetcher.transport().base_url(),
        timeout_ms = config.poll.timeout_ms,
        interval_ms = config.poll.interval_ms,
        "Using stats server"
    );

    let spinner = args.show_progress().then(|| start_spinner(username));
    let result = fetcher.fetch_stats(username).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let bundle = result.with_context(|| format!("Failed to fetch stats for '{}'", username))?;

    let output = match config.output.format {
        OutputFormat::Json => report::generate_json_report(&bundle)?,
        OutputFormat::Markdown => report::generate_markdown_report(username, &bundle),
    };

    match args.output {
        Some(ref path) => {
            report::save_report(&output, path)?;
            if !args.quiet {
                eprintln!("✅ Report saved to: {}", path.display());
            }
        }
        None => println!("{}", output),
    }

    Ok(())
}

fn start_spinner(username: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Fetching stats for {}...", username));
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
