//! Fetch command arguments

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use super::{CliError, ConsoleObserver};
use crate::config::{Credentials, FetchConfig, Provider, SchemaMode, DEFAULT_OUTPUT_DIR};
use crate::downloader::config::MAX_RETRIES;
use crate::downloader::{FetchPipeline, PipelineOutcome};
use crate::fetcher::create_source;
use crate::range::{parse_cli_datetime, utc_now, TimeRange};
use crate::Interval;

/// Historical candlestick downloader
#[derive(Parser, Debug)]
#[command(name = "historical-data")]
#[command(about = "Download historical candlestick data into a local CSV dataset", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data provider
    #[arg(long, default_value = "binance")]
    pub source: String,

    /// Start of the range (DD/MM/YYYY HH:MM:SS, default: 200 days ago)
    #[arg(long)]
    pub from_date: Option<String>,

    /// End of the range (DD/MM/YYYY HH:MM:SS, default: now)
    #[arg(long)]
    pub to_date: Option<String>,

    /// Trading symbol (e.g., BTCUSDT)
    #[arg(short, long)]
    pub symbol: String,

    /// Candle interval (e.g., 1m, 1h, 1d)
    #[arg(short, long, default_value = "1m")]
    pub interval: String,

    /// Output directory
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub dir: PathBuf,

    /// Column set: short (OHLCV) or full (every provider field)
    #[arg(long, default_value = "short")]
    pub format: String,

    /// Write open time as epoch milliseconds (true) or as a UTC date-time (false)
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub timestamp: bool,

    /// Maximum number of retries for failed requests
    #[arg(long, default_value_t = MAX_RETRIES, value_parser = clap::value_parser!(u32).range(0..=20))]
    pub max_retries: u32,
}

impl Cli {
    /// Resolve the arguments into a validated [`FetchConfig`]
    ///
    /// Missing dates default to a 200-day window ending now.
    pub fn build_config(&self) -> Result<FetchConfig, CliError> {
        let provider = Provider::from_str(&self.source)?;
        let interval = Interval::from_str(&self.interval)?;
        let schema = SchemaMode::from_str(&self.format)?;

        let default_range = TimeRange::lookback_from(utc_now());
        let from = match &self.from_date {
            Some(input) => parse_cli_datetime(input)?,
            None => default_range.from(),
        };
        let to = match &self.to_date {
            Some(input) => parse_cli_datetime(input)?,
            None => default_range.to(),
        };
        let range = TimeRange::validate(from, to)?;

        Ok(FetchConfig::new(&self.symbol, interval, range)?
            .with_provider(provider)
            .with_output_dir(&self.dir)
            .with_schema(schema)
            .with_timestamp(self.timestamp))
    }

    /// Run the fetch described by the arguments
    ///
    /// Configuration is validated before credentials are read, and both
    /// before any request goes out.
    pub async fn execute(&self) -> Result<PipelineOutcome, CliError> {
        let config = self.build_config()?;
        let credentials = Credentials::from_env()?;

        info!(
            "Starting {} fetch for {} {} ({})",
            config.provider(),
            config.symbol(),
            config.interval(),
            config.range()
        );

        let source = create_source(config.provider(), credentials, self.max_retries);
        let pipeline = FetchPipeline::new(source, Arc::new(ConsoleObserver::new()));
        Ok(pipeline.run(&config).await?)
    }
}
