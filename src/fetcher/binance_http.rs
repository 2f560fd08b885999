//! Binance HTTP client
//!
//! Every request passes the shared rate limiter, carries the API key header,
//! and is retried with exponential backoff on:
//! - network errors (timeout, connection refused)
//! - 5xx server errors
//! - 429 / 418 rate limit responses
//!
//! Other 4xx responses are classified by Binance error code and returned at once.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::Credentials;
use crate::downloader::config::calculate_backoff;
use crate::downloader::rate_limit::RateLimiter;
use crate::fetcher::binance_parser::BinanceParser;
use crate::fetcher::{FetcherError, FetcherResult};

/// Header reporting the weight consumed in the current minute
const USED_WEIGHT_HEADER: &str = "X-MBX-USED-WEIGHT-1M";

/// HTTP client for Binance REST endpoints
pub struct BinanceHttpClient {
    client: Arc<Client>,
    base_url: String,
    rate_limiter: Arc<RateLimiter>,
    credentials: Credentials,
    api_key_header: &'static str,
    max_retries: u32,
}

impl BinanceHttpClient {
    /// Create a new HTTP client
    ///
    /// # Arguments
    /// * `client` - Shared reqwest client
    /// * `base_url` - Base URL for API endpoints (e.g., "<https://api.binance.com>")
    /// * `rate_limiter` - Shared limiter enforcing the provider quota
    /// * `credentials` - API key sent with every request
    /// * `api_key_header` - Header name carrying the key
    /// * `max_retries` - Retries after the first attempt
    pub fn new(
        client: Arc<Client>,
        base_url: impl Into<String>,
        rate_limiter: Arc<RateLimiter>,
        credentials: Credentials,
        api_key_header: &'static str,
        max_retries: u32,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            rate_limiter,
            credentials,
            api_key_header,
            max_retries,
        }
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute a GET request and deserialize the JSON body
    ///
    /// # Errors
    /// Returns the classified provider error, or `NetworkError`/`RateLimitExceeded`
    /// once the retry budget is spent.
    pub async fn get<T>(&self, endpoint: &str, params: &[(&str, String)], weight: u32) -> FetcherResult<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {} with {} params (weight {})", url, params.len(), weight);
        self.request_with_retry(&url, params, weight).await
    }

    async fn request_with_retry<T>(
        &self,
        url: &str,
        params: &[(&str, String)],
        weight: u32,
    ) -> FetcherResult<T>
    where
        T: DeserializeOwned,
    {
        let mut last_error = None;
        let attempts = self.max_retries + 1;

        for attempt in 0..attempts {
            self.rate_limiter
                .acquire(weight)
                .await
                .map_err(|e| FetcherError::NetworkError(format!("Rate limiter error: {e}")))?;

            let response = match self
                .client
                .get(url)
                .header(self.api_key_header, self.credentials.key())
                .query(params)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    warn!("Network error on attempt {}/{}: {}", attempt + 1, attempts, e);
                    last_error = Some(FetcherError::NetworkError(e.to_string()));
                    self.backoff(attempt).await;
                    continue;
                }
            };

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::IM_A_TEAPOT {
                warn!(
                    "Rate limit response ({}) on attempt {}/{}",
                    status.as_u16(),
                    attempt + 1,
                    attempts
                );
                last_error = Some(FetcherError::RateLimitExceeded);
                self.backoff(attempt).await;
                continue;
            }

            if status.is_server_error() {
                warn!("Server error {} on attempt {}/{}", status, attempt + 1, attempts);
                last_error = Some(FetcherError::NetworkError(format!("Server error: {status}")));
                self.backoff(attempt).await;
                continue;
            }

            if status.is_client_error() {
                let body = response.text().await.unwrap_or_default();
                return Err(BinanceParser::classify_client_error(status.as_u16(), &body));
            }

            if let Some(used) = Self::parse_weight_header(response.headers()) {
                debug!("Used weight this minute: {}", used);
            }

            return response.json::<T>().await.map_err(|e| {
                FetcherError::ParseError(format!("Failed to deserialize response: {e}"))
            });
        }

        Err(last_error
            .unwrap_or_else(|| FetcherError::NetworkError("All retries exhausted".to_string())))
    }

    async fn backoff(&self, attempt: u32) {
        if attempt < self.max_retries {
            let delay = calculate_backoff(attempt);
            debug!("Retrying after {:?}", delay);
            tokio::time::sleep(delay).await;
        }
    }

    fn parse_weight_header(headers: &reqwest::header::HeaderMap) -> Option<u32> {
        let weight_str = headers.get(USED_WEIGHT_HEADER)?.to_str().ok()?;
        match weight_str.parse::<u32>() {
            Ok(weight) => Some(weight),
            Err(e) => {
                warn!("Failed to parse weight header '{}': {}", weight_str, e);
                None
            }
        }
    }
}
