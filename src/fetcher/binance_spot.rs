//! Binance spot kline source
//!
//! Implements [`KlineSource`] against `GET /api/v3/klines`, walking the
//! provider's 1000-candle page cap with [`PaginationHelper`].

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::binance_config::{BinanceMarketConfig, SPOT_CONFIG};
use super::binance_http::BinanceHttpClient;
use super::binance_parser::BinanceParser;
use super::pagination::PaginationHelper;
use super::shared_resources::{global_binance_rate_limiter, global_http_client};
use super::{FetcherResult, KlineSource, PageObserver};
use crate::config::Credentials;
use crate::range::TimeRange;
use crate::{Candle, Interval};

/// Kline source for the Binance spot market
pub struct BinanceSpotSource {
    http_client: BinanceHttpClient,
    config: &'static BinanceMarketConfig,
}

impl BinanceSpotSource {
    /// Create a source using the shared HTTP client and rate limiter
    pub fn new(credentials: Credentials, max_retries: u32) -> Self {
        Self::new_with_base_url(credentials, SPOT_CONFIG.base_url, max_retries)
    }

    /// Create a source against a custom base URL (mock servers, testnets)
    pub fn new_with_base_url(
        credentials: Credentials,
        base_url: impl Into<String>,
        max_retries: u32,
    ) -> Self {
        let config = &SPOT_CONFIG;
        let http_client = BinanceHttpClient::new(
            global_http_client(),
            base_url,
            global_binance_rate_limiter(),
            credentials,
            config.api_key_header,
            max_retries,
        );
        Self {
            http_client,
            config,
        }
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        self.http_client.base_url()
    }

    async fn fetch_page(
        &self,
        symbol: &str,
        interval: Interval,
        window_start: i64,
        end_time: i64,
    ) -> FetcherResult<Vec<Candle>> {
        let params = [
            ("symbol", symbol.to_string()),
            ("interval", interval.code().to_string()),
            ("startTime", window_start.to_string()),
            ("endTime", end_time.to_string()),
            ("limit", self.config.klines_page_limit.to_string()),
        ];

        let body: Vec<Value> = self
            .http_client
            .get(self.config.klines_endpoint, &params, self.config.klines_weight)
            .await?;

        BinanceParser::parse_klines(body)
    }
}

#[async_trait]
impl KlineSource for BinanceSpotSource {
    async fn fetch(
        &self,
        symbol: &str,
        interval: Interval,
        range: &TimeRange,
        observer: &dyn PageObserver,
    ) -> FetcherResult<Vec<Candle>> {
        let start_time = range.start_ms();
        let end_time = range.end_ms();

        info!(
            "Fetching {} {} klines from {} to {} (up to {} candles)",
            symbol,
            interval,
            start_time,
            end_time,
            interval.expected_candles(start_time, end_time)
        );

        PaginationHelper::paginate_klines(
            symbol,
            start_time,
            end_time,
            self.config.klines_page_limit,
            observer,
            |window_start| self.fetch_page(symbol, interval, window_start, end_time),
        )
        .await
    }

    fn name(&self) -> &str {
        "binance"
    }
}
