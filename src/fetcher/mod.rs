//! Kline sources

use crate::config::{Credentials, Provider};
use crate::range::TimeRange;
use crate::{Candle, Interval};
use async_trait::async_trait;

pub mod binance_config;
pub mod binance_http;
pub mod binance_parser;
pub mod binance_spot;
pub mod pagination;
pub mod shared_resources;

/// Fetcher errors
#[derive(Debug, thiserror::Error)]
pub enum FetcherError {
    /// Credentials missing or rejected by the provider
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Symbol not recognised by the provider
    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Interval not recognised by the provider
    #[error("invalid interval: {0}")]
    InvalidInterval(String),

    /// Connectivity, timeout or server failure after retries were exhausted
    #[error("network error: {0}")]
    NetworkError(String),

    /// Rate limit still exceeded after retries were exhausted
    #[error("rate limit exceeded")]
    RateLimitExceeded,

    /// Any other provider-side rejection
    #[error("API error: {0}")]
    ApiError(String),

    /// Response body did not match the expected layout
    #[error("parse error: {0}")]
    ParseError(String),
}

/// Result type for fetcher operations
pub type FetcherResult<T> = Result<T, FetcherError>;

/// Receives one notification per retrieved page
pub trait PageObserver: Send + Sync {
    /// Called after page `page` (1-indexed) arrived with `rows` new candles
    fn page_retrieved(&self, page: usize, rows: usize, total: usize);
}

/// Observer that ignores every page
pub struct NoopPageObserver;

impl PageObserver for NoopPageObserver {
    fn page_retrieved(&self, _page: usize, _rows: usize, _total: usize) {}
}

/// A remote source of historical candles
///
/// Implementations transparently walk the provider's pagination and return a
/// single ascending, deduplicated sequence.
#[async_trait]
pub trait KlineSource: Send + Sync {
    /// Fetch every candle whose open time lies in `range`
    ///
    /// An empty vector is a valid result for a range without trading activity.
    /// Any unrecoverable page failure aborts the whole fetch.
    async fn fetch(
        &self,
        symbol: &str,
        interval: Interval,
        range: &TimeRange,
        observer: &dyn PageObserver,
    ) -> FetcherResult<Vec<Candle>>;

    /// Provider name used in progress messages
    fn name(&self) -> &str;
}

/// Create the kline source for a provider
///
/// Adding a provider means adding a [`KlineSource`] implementation and an arm here.
pub fn create_source(
    provider: Provider,
    credentials: Credentials,
    max_retries: u32,
) -> Box<dyn KlineSource> {
    match provider {
        Provider::Binance => Box::new(binance_spot::BinanceSpotSource::new(
            credentials,
            max_retries,
        )),
    }
}
