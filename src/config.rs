//! Typed run configuration
//!
//! A [`FetchConfig`] is fully validated when it is built, so the pipeline never
//! meets an unknown schema mode or a reversed range halfway through a run.
//! Credentials are a plain value sourced once by the entrypoint and injected
//! into the kline source.

use crate::range::TimeRange;
use crate::Interval;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable holding the Binance API key
pub const API_KEY_ENV: &str = "BINANCE_API_KEY";
/// Environment variable holding the Binance API secret
pub const API_SECRET_ENV: &str = "BINANCE_API_SECRET";

/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "dataset";

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// from-date is later than to-date
    #[error("from-date {from} is after to-date {to}")]
    InvalidRange {
        /// Requested start
        from: String,
        /// Requested end
        to: String,
    },

    /// Date argument could not be parsed
    #[error("invalid date '{input}' (expected DD/MM/YYYY HH:MM:SS): {reason}")]
    InvalidDate {
        /// Raw argument
        input: String,
        /// Parser message
        reason: String,
    },

    /// Interval outside the supported set
    #[error("invalid interval '{0}' (expected 1m|3m|5m|15m|30m|1h|2h|4h|6h|8h|12h|1d|3d|1w|1M)")]
    InvalidInterval(String),

    /// Schema mode other than short/full
    #[error("unknown format '{0}' (expected short|full)")]
    UnknownSchemaMode(String),

    /// Provider other than binance
    #[error("unsupported data provider '{0}'")]
    UnsupportedProvider(String),

    /// Blank symbol
    #[error("symbol must not be empty")]
    EmptySymbol,
}

/// Credential errors, raised before any network call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// API key missing or empty
    #[error("missing the binance api key ({0} is unset or empty)")]
    MissingApiKey(&'static str),

    /// API secret missing or empty
    #[error("missing the binance api secret ({0} is unset or empty)")]
    MissingApiSecret(&'static str),
}

/// API key/secret pair for the data provider
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    key: String,
    secret: String,
}

impl Credentials {
    /// Build credentials, rejecting empty values
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Result<Self, AuthError> {
        let key = key.into();
        let secret = secret.into();
        if key.trim().is_empty() {
            return Err(AuthError::MissingApiKey(API_KEY_ENV));
        }
        if secret.trim().is_empty() {
            return Err(AuthError::MissingApiSecret(API_SECRET_ENV));
        }
        Ok(Self { key, secret })
    }

    /// Resolve credentials through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = lookup(API_KEY_ENV).ok_or(AuthError::MissingApiKey(API_KEY_ENV))?;
        let secret = lookup(API_SECRET_ENV).ok_or(AuthError::MissingApiSecret(API_SECRET_ENV))?;
        Self::new(key, secret)
    }

    /// Resolve credentials from the process environment
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// API key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// API secret
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &"<redacted>")
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Supported data providers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Provider {
    /// Binance spot market
    #[default]
    Binance,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Binance => f.write_str("binance"),
        }
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "binance" => Ok(Provider::Binance),
            _ => Err(ConfigError::UnsupportedProvider(s.to_string())),
        }
    }
}

/// Column projection applied to the fetched candles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaMode {
    /// open time plus OHLCV
    #[default]
    Short,
    /// every provider column
    Full,
}

impl std::fmt::Display for SchemaMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaMode::Short => f.write_str("short"),
            SchemaMode::Full => f.write_str("full"),
        }
    }
}

impl FromStr for SchemaMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(SchemaMode::Short),
            "full" => Ok(SchemaMode::Full),
            _ => Err(ConfigError::UnknownSchemaMode(s.to_string())),
        }
    }
}

/// Fully-resolved configuration for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    provider: Provider,
    symbol: String,
    interval: Interval,
    range: TimeRange,
    output_dir: PathBuf,
    schema: SchemaMode,
    in_timestamp: bool,
}

impl FetchConfig {
    /// Create a configuration with default provider, directory, schema and timestamp mode
    pub fn new(
        symbol: impl Into<String>,
        interval: Interval,
        range: TimeRange,
    ) -> Result<Self, ConfigError> {
        let symbol = symbol.into().trim().to_string();
        if symbol.is_empty() {
            return Err(ConfigError::EmptySymbol);
        }
        Ok(Self {
            provider: Provider::default(),
            symbol,
            interval,
            range,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            schema: SchemaMode::default(),
            in_timestamp: true,
        })
    }

    /// Set the data provider
    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the schema mode
    pub fn with_schema(mut self, schema: SchemaMode) -> Self {
        self.schema = schema;
        self
    }

    /// Keep open time as epoch milliseconds (`true`) or render it as a date-time
    pub fn with_timestamp(mut self, in_timestamp: bool) -> Self {
        self.in_timestamp = in_timestamp;
        self
    }

    /// Data provider
    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Trading symbol
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Candle interval
    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Requested range
    pub fn range(&self) -> &TimeRange {
        &self.range
    }

    /// Output directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Schema mode
    pub fn schema(&self) -> SchemaMode {
        self.schema
    }

    /// Whether open time stays in epoch milliseconds
    pub fn in_timestamp(&self) -> bool {
        self.in_timestamp
    }
}
