//! Sunbid CLI — day-ahead bidding commands.
//!
//! Commands:
//! - `forecast` — fetch a delivery day's forecast series and print it
//! - `validate` — check a series file against the delivery-day grid
//! - `transform` — turn a series file into a curve-order payload
//! - `submit` — run the full pipeline (dry-run unless --confirm)
//! - `areas` — list delivery areas or look one up

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use sunbid_core::calendar::{day_boundaries, tomorrow_str, MARKET_TZ};
use sunbid_core::client::{AuctionClient, StreemClient};
use sunbid_core::domain::{all_areas, area_strict};
use sunbid_core::transform::to_curve_order;
use sunbid_core::validate::{validate_with, Strategy, ValidationContext};
use sunbid_pipeline::runner::ForecastSource;
use sunbid_pipeline::{
    run_day_ahead, NordpoolCredentials, PipelineConfig, StreemCredentials,
};

#[derive(Parser)]
#[command(name = "sunbid", about = "Sunbid CLI — day-ahead auction bidding")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a delivery day's forecast series and print it as JSON.
    Forecast {
        /// Path to the TOML run config.
        #[arg(long)]
        config: PathBuf,

        /// Delivery date (YYYY-MM-DD). Defaults to tomorrow in the market zone.
        #[arg(long)]
        date: Option<String>,
    },
    /// Validate a series file against the delivery-day grid.
    Validate {
        /// Path to a JSON file holding the series array.
        input: PathBuf,

        /// Delivery date (YYYY-MM-DD).
        #[arg(long)]
        date: String,

        /// Series frequency: 1h or 15min.
        #[arg(long, default_value = "1h")]
        freq: String,

        /// Smallest admissible value.
        #[arg(long, default_value_t = 0.0)]
        mini: f64,

        /// Largest admissible value.
        #[arg(long, default_value_t = 10_000.0)]
        maxi: f64,

        /// Use the columnar strategy instead of the row walk.
        #[arg(long, default_value_t = false)]
        columnar: bool,
    },
    /// Turn a series file into a curve-order payload.
    Transform {
        /// Path to a JSON file holding the series array.
        input: PathBuf,

        /// Path to the TOML run config (product, area, numbering).
        #[arg(long)]
        config: PathBuf,
    },
    /// Run the full pipeline: fetch, validate, transform, submit.
    Submit {
        /// Path to the TOML run config.
        #[arg(long)]
        config: PathBuf,

        /// Delivery date (YYYY-MM-DD). Defaults to tomorrow in the market zone.
        #[arg(long)]
        date: Option<String>,

        /// Actually submit (without this flag, the order is only built and printed).
        #[arg(long, default_value_t = false)]
        confirm: bool,
    },
    /// List delivery areas, or look one up by code.
    Areas {
        /// Area code to look up (e.g. FR).
        code: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Forecast { config, date } => run_forecast(&config, date.as_deref()),
        Commands::Validate {
            input,
            date,
            freq,
            mini,
            maxi,
            columnar,
        } => run_validate(&input, &date, &freq, mini, maxi, columnar),
        Commands::Transform { input, config } => run_transform(&input, &config),
        Commands::Submit {
            config,
            date,
            confirm,
        } => run_submit(&config, date.as_deref(), confirm),
        Commands::Areas { code } => run_areas(code.as_deref()),
    }
}

fn run_forecast(config_path: &Path, date: Option<&str>) -> Result<()> {
    let config = PipelineConfig::from_file(config_path)?;
    let date = match date {
        Some(d) => d.to_string(),
        None => tomorrow_str(MARKET_TZ),
    };
    let (start, end) = day_boundaries(&date, MARKET_TZ)?;

    let creds = StreemCredentials::from_env()?;
    let client = StreemClient::connect(&creds.username, &creds.password)?;
    let series = client.fetch(&config.installation, start, end, config.frequency()?)?;

    println!("{}", serde_json::to_string_pretty(&series)?);
    Ok(())
}

fn run_validate(
    input: &Path,
    date: &str,
    freq: &str,
    mini: f64,
    maxi: f64,
    columnar: bool,
) -> Result<()> {
    let series = read_series(input)?;
    let ctx = ValidationContext::new(date, freq, mini, maxi, MARKET_TZ)?;
    let strategy = if columnar {
        Strategy::Columnar
    } else {
        Strategy::RowWalk
    };

    if !validate_with(&series, &ctx, strategy) {
        eprintln!("{}: series is invalid for {date}", input.display());
        std::process::exit(1);
    }
    println!("{}: {} items valid for {date}", input.display(), series.len());
    Ok(())
}

fn run_transform(input: &Path, config_path: &Path) -> Result<()> {
    let config = PipelineConfig::from_file(config_path)?;
    let series = read_series(input)?;

    let order = to_curve_order(&series, &config.order_header(), config.numbering, MARKET_TZ)?;
    println!("{}", serde_json::to_string_pretty(&order)?);
    Ok(())
}

fn run_submit(config_path: &Path, date: Option<&str>, confirm: bool) -> Result<()> {
    let config = PipelineConfig::from_file(config_path)?;

    let streem_creds = StreemCredentials::from_env()?;
    let source = StreemClient::connect(&streem_creds.username, &streem_creds.password)?;
    let nordpool_creds = NordpoolCredentials::from_env()?;
    let sink = AuctionClient::connect(
        &nordpool_creds.username,
        &nordpool_creds.password,
        config.environment,
    )?;

    let report = run_day_ahead(&config, &source, &sink, date, !confirm)?;

    if report.dry_run {
        println!(
            "dry run: built {} with {} curves for {} (use --confirm to submit)",
            report.auction_id, report.curve_count, report.delivery_date
        );
    } else {
        println!(
            "submitted {} with {} curves for {} (order id: {})",
            report.auction_id,
            report.curve_count,
            report.delivery_date,
            report.order_id.as_deref().unwrap_or("not reported")
        );
    }
    Ok(())
}

fn run_areas(code: Option<&str>) -> Result<()> {
    match code {
        Some(code) => {
            let area = area_strict(code)?;
            println!("{}\t{}\t{}", area.code, area.eic_code, area.name);
        }
        None => {
            for area in all_areas() {
                println!("{}\t{}\t{}", area.code, area.eic_code, area.name);
            }
        }
    }
    Ok(())
}

fn read_series(path: &Path) -> Result<Vec<serde_json::Value>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}
