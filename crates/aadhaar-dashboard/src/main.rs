//! Aadhaar Enrolment Dashboard
//!
//! Command-line front end for the enrolment analytics API: browse regions,
//! inspect statistics and hotspots, and size enrolment centers against the
//! demand forecast.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use aadhaar_core::config::CapacityConfig;
use aadhaar_core::{
    ALL_DISTRICTS, AllocationEntry, Capacity, Config, DetailedStats, ForecastPoint,
};
use aadhaar_dashboard::render::{AllocationTable, HotspotList, RegionListing, SummaryCard};
use aadhaar_dashboard::{DashboardController, DashboardError, Result, Session, Summary};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Command line interface for the enrolment dashboard
#[derive(Parser)]
#[command(
    name = "aadhaar-dashboard",
    version = env!("CARGO_PKG_VERSION"),
    about = "Aadhaar enrolment statistics, hotspots and center allocation",
    long_about = "Browse enrolment statistics by state and district, list anomaly hotspots, and size enrolment centers against the demand forecast."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the analytics API base URL
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log format (json, pretty)
    #[arg(long)]
    log_format: Option<String>,

    /// Enable structured JSON logging
    #[arg(long)]
    json: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Load the region directory and show the hotspot list
    Overview,

    /// List states, or the districts of one state
    Regions {
        /// State to list districts for
        #[arg(short, long)]
        state: Option<String>,
    },

    /// Show statistics, forecast and center allocation for a region
    Analyze {
        /// State to analyze
        #[arg(short, long)]
        state: String,

        /// District within the state
        #[arg(short, long, default_value = ALL_DISTRICTS)]
        district: String,

        /// Capacity per center (100-2000, steps of 50)
        #[arg(short = 'C', long, value_parser = parse_capacity)]
        capacity: Option<Capacity>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Interactive session on stdin
    Session,

    /// Validate configuration
    Config {
        /// Show resolved configuration
        #[arg(short, long)]
        show: bool,
    },
}

/// Main entry point for the dashboard
///
/// # Errors
///
/// Returns error if configuration, logging or a backend request fails
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (for development convenience)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: .env file not loaded: {e}");
    }

    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(base_url) = &cli.base_url {
        config.api.base_url.clone_from(base_url);
    }

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    let format = cli.log_format.as_deref().unwrap_or(&config.logging.format);
    let json = cli.json || format == "json";
    aadhaar_core::init_logging(level, json)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.api.base_url,
        "Aadhaar dashboard starting"
    );

    match cli.command {
        Commands::Overview => overview(&config).await,
        Commands::Regions { state } => regions(&config, state.as_deref()).await,
        Commands::Analyze {
            state,
            district,
            capacity,
            format,
        } => analyze(&config, &state, &district, capacity, format).await,
        Commands::Session => session(&config).await,
        Commands::Config { show } => handle_config_command(&config, show),
    }
}

/// Load configuration from file or environment
///
/// # Errors
///
/// Returns error if the configuration file cannot be read or parsed
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = match config_path {
        Some(path) => {
            eprintln!("Loading configuration from: {}", path.display());
            Config::load_from(path)?
        }
        None => Config::load()?,
    };
    Ok(config)
}

/// Capacity argument parser with the control's default bounds
fn parse_capacity(value: &str) -> std::result::Result<Capacity, String> {
    let value: u32 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a whole number"))?;
    CapacityConfig::default()
        .control_value(value)
        .map_err(|e| e.to_string())
}

/// Load the directory and hotspots, then print a short overview
async fn overview(config: &Config) -> Result<()> {
    let controller = aadhaar_dashboard::init_with_config(config)?;
    controller.initialize().await?;

    let state = controller.snapshot();
    let directory = state.directory.value();
    println!(
        "{} states, {} districts",
        directory.states.len(),
        directory.district_count()
    );
    println!();
    print!("{}", HotspotList(state.hotspots.value()));
    Ok(())
}

/// List states or districts
async fn regions(config: &Config, state: Option<&str>) -> Result<()> {
    let controller = aadhaar_dashboard::init_with_config(config)?;
    controller.initialize().await?;

    let snapshot = controller.snapshot();
    let directory = snapshot.directory.value();
    if let Some(name) = state
        && !directory.states.iter().any(|s| s == name)
    {
        return Err(DashboardError::unknown_state(name));
    }

    print!("{}", RegionListing { directory, state });
    Ok(())
}

/// Select a region and report its figures
async fn analyze(
    config: &Config,
    state: &str,
    district: &str,
    capacity: Option<Capacity>,
    format: OutputFormat,
) -> Result<()> {
    let controller = aadhaar_dashboard::init_with_config(config)?;
    if let Some(capacity) = capacity {
        config.capacity.control_value(capacity.get())?;
        controller.set_capacity(capacity.get())?;
    }

    controller.initialize().await?;
    controller.select_state(state).await?;
    if district != ALL_DISTRICTS {
        controller.select_district(district).await?;
    }

    let snapshot = controller.snapshot();
    match format {
        OutputFormat::Json => {
            let report = AnalyzeReport {
                summary: snapshot.summary(),
                statistics: snapshot.stats.value(),
                forecast: snapshot.forecast.value(),
                allocation: snapshot.allocation(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            print!("{}", SummaryCard(&snapshot.summary()));
            if snapshot.selection.is_district() {
                println!();
                print!(
                    "{}",
                    AllocationTable {
                        entries: &snapshot.allocation(),
                        capacity: snapshot.capacity,
                    }
                );
            }
        }
    }
    Ok(())
}

/// JSON body of `analyze --format json`
#[derive(Serialize)]
struct AnalyzeReport<'a> {
    summary: Summary,
    statistics: &'a DetailedStats,
    forecast: &'a [ForecastPoint],
    allocation: Vec<AllocationEntry>,
}

/// Run the interactive session
async fn session(config: &Config) -> Result<()> {
    let controller: DashboardController = aadhaar_dashboard::init_with_config(config)?;

    if let Err(e) = controller.initialize().await {
        warn!(error = %e, "Region directory unavailable");
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    Session::new(&controller, &config.capacity)
        .run(stdin, &mut stdout)
        .await?;
    stdout.flush()?;

    info!("Session ended");
    Ok(())
}

/// Handle config subcommand
///
/// # Errors
///
/// Returns error if the configuration cannot be serialized
fn handle_config_command(config: &Config, show: bool) -> Result<()> {
    // Loading already validated it
    println!("Configuration is valid");

    if show {
        let rendered = toml::to_string_pretty(config).map_err(|e| {
            DashboardError::Core(aadhaar_core::Error::configuration(format!(
                "Failed to serialize config: {e}"
            )))
        })?;
        println!();
        println!("{rendered}");
    }

    Ok(())
}
