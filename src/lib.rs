//! # Historical Data Library
//!
//! Retrieves historical candlestick (OHLCV) data for a trading symbol over a
//! date range, normalizes it into a tabular schema, and persists it as a CSV
//! dataset whose file name encodes the query. Built for reproducible local
//! datasets used in backtesting.
//!
//! ## Quick Start
//!
//! ```no_run
//! use historical_data::config::{Credentials, FetchConfig, SchemaMode};
//! use historical_data::downloader::{FetchPipeline, NoopObserver};
//! use historical_data::fetcher::binance_spot::BinanceSpotSource;
//! use historical_data::range::TimeRange;
//! use historical_data::Interval;
//! use chrono::NaiveDate;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let from = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let to = NaiveDate::from_ymd_opt(2021, 1, 5).unwrap().and_hms_opt(0, 0, 0).unwrap();
//!
//! let config = FetchConfig::new("BTCUSDT", Interval::OneDay, TimeRange::validate(from, to)?)?
//!     .with_schema(SchemaMode::Short)
//!     .with_timestamp(false);
//!
//! let credentials = Credentials::from_env()?;
//! let source = BinanceSpotSource::new(credentials, 5);
//! let pipeline = FetchPipeline::new(Box::new(source), Arc::new(NoopObserver));
//! let outcome = pipeline.run(&config).await?;
//! println!("wrote {} rows to {}", outcome.rows, outcome.path.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`range`] - Inclusive, validated time range
//! - [`config`] - Typed run configuration and injected credentials
//! - [`fetcher`] - Paginated, rate-limited kline sources
//! - [`output`] - Schema projection, path derivation and the CSV writer
//! - [`downloader`] - The fetch pipeline, its observer events and transport tuning
//! - [`cli`] - Command-line surface

#![warn(missing_docs)]
#![warn(clippy::all)]

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Command-line surface
pub mod cli;

/// Typed run configuration
pub mod config;

/// Fetch pipeline orchestration
pub mod downloader;

/// Kline sources
pub mod fetcher;

/// Projection and dataset writers
pub mod output;

/// Inclusive time range
pub mod range;

pub use config::{ConfigError, Credentials, FetchConfig, SchemaMode};
pub use range::TimeRange;

/// One OHLCV record as delivered by a provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candle {
    /// Open time (Unix timestamp in milliseconds)
    pub open_time: i64,
    /// Open price
    pub open: Decimal,
    /// High price
    pub high: Decimal,
    /// Low price
    pub low: Decimal,
    /// Close price
    pub close: Decimal,
    /// Volume (base asset)
    pub volume: Decimal,
    /// Close time (Unix timestamp in milliseconds)
    pub close_time: i64,
    /// Quote asset volume
    pub quote_asset_volume: Decimal,
    /// Number of trades
    pub number_of_trades: u64,
    /// Taker buy base asset volume
    pub taker_buy_base_asset_volume: Decimal,
    /// Taker buy quote asset volume
    pub taker_buy_quote_asset_volume: Decimal,
}

impl Candle {
    /// Check OHLC consistency of a single record
    pub fn validate(&self) -> Result<(), String> {
        if self.close_time < self.open_time {
            return Err(format!(
                "Close time ({}) must not precede open time ({})",
                self.close_time, self.open_time
            ));
        }

        if self.high < self.low {
            return Err(format!(
                "High ({}) must be >= low ({})",
                self.high, self.low
            ));
        }

        if self.volume < Decimal::ZERO {
            return Err(format!("Volume must be non-negative, got {}", self.volume));
        }

        Ok(())
    }
}

/// Candle bucket granularity accepted by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    /// 1 minute
    #[default]
    #[serde(rename = "1m")]
    OneMinute,
    /// 3 minutes
    #[serde(rename = "3m")]
    ThreeMinutes,
    /// 5 minutes
    #[serde(rename = "5m")]
    FiveMinutes,
    /// 15 minutes
    #[serde(rename = "15m")]
    FifteenMinutes,
    /// 30 minutes
    #[serde(rename = "30m")]
    ThirtyMinutes,
    /// 1 hour
    #[serde(rename = "1h")]
    OneHour,
    /// 2 hours
    #[serde(rename = "2h")]
    TwoHours,
    /// 4 hours
    #[serde(rename = "4h")]
    FourHours,
    /// 6 hours
    #[serde(rename = "6h")]
    SixHours,
    /// 8 hours
    #[serde(rename = "8h")]
    EightHours,
    /// 12 hours
    #[serde(rename = "12h")]
    TwelveHours,
    /// 1 day
    #[serde(rename = "1d")]
    OneDay,
    /// 3 days
    #[serde(rename = "3d")]
    ThreeDays,
    /// 1 week
    #[serde(rename = "1w")]
    OneWeek,
    /// 1 month
    #[serde(rename = "1M")]
    OneMonth,
}

impl Interval {
    /// Every supported interval, shortest first
    pub const ALL: [Interval; 15] = [
        Interval::OneMinute,
        Interval::ThreeMinutes,
        Interval::FiveMinutes,
        Interval::FifteenMinutes,
        Interval::ThirtyMinutes,
        Interval::OneHour,
        Interval::TwoHours,
        Interval::FourHours,
        Interval::SixHours,
        Interval::EightHours,
        Interval::TwelveHours,
        Interval::OneDay,
        Interval::ThreeDays,
        Interval::OneWeek,
        Interval::OneMonth,
    ];

    /// Provider wire code ("1m", "1h", ...)
    pub fn code(&self) -> &'static str {
        match self {
            Interval::OneMinute => "1m",
            Interval::ThreeMinutes => "3m",
            Interval::FiveMinutes => "5m",
            Interval::FifteenMinutes => "15m",
            Interval::ThirtyMinutes => "30m",
            Interval::OneHour => "1h",
            Interval::TwoHours => "2h",
            Interval::FourHours => "4h",
            Interval::SixHours => "6h",
            Interval::EightHours => "8h",
            Interval::TwelveHours => "12h",
            Interval::OneDay => "1d",
            Interval::ThreeDays => "3d",
            Interval::OneWeek => "1w",
            Interval::OneMonth => "1M",
        }
    }

    /// Bucket length in milliseconds (months approximated as 30 days)
    pub fn to_milliseconds(&self) -> i64 {
        const MINUTE: i64 = 60_000;
        const HOUR: i64 = 60 * MINUTE;
        const DAY: i64 = 24 * HOUR;
        match self {
            Interval::OneMinute => MINUTE,
            Interval::ThreeMinutes => 3 * MINUTE,
            Interval::FiveMinutes => 5 * MINUTE,
            Interval::FifteenMinutes => 15 * MINUTE,
            Interval::ThirtyMinutes => 30 * MINUTE,
            Interval::OneHour => HOUR,
            Interval::TwoHours => 2 * HOUR,
            Interval::FourHours => 4 * HOUR,
            Interval::SixHours => 6 * HOUR,
            Interval::EightHours => 8 * HOUR,
            Interval::TwelveHours => 12 * HOUR,
            Interval::OneDay => DAY,
            Interval::ThreeDays => 3 * DAY,
            Interval::OneWeek => 7 * DAY,
            Interval::OneMonth => 30 * DAY,
        }
    }

    /// Upper bound on the number of buckets in `[start_ms, end_ms]`
    pub fn expected_candles(&self, start_ms: i64, end_ms: i64) -> u64 {
        if end_ms < start_ms {
            return 0;
        }
        let span = (end_ms - start_ms) as u64;
        span / self.to_milliseconds() as u64 + 1
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Interval {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::ALL
            .iter()
            .copied()
            .find(|interval| interval.code() == s)
            .ok_or_else(|| ConfigError::InvalidInterval(s.to_string()))
    }
}
