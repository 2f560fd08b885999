//! Process-wide HTTP client and rate limiter
//!
//! Binance enforces its quota per IP, so every source instance must draw from
//! the same limiter and reuse one connection pool.

use once_cell::sync::Lazy;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

use crate::downloader::rate_limit::RateLimiter;
use crate::fetcher::binance_config::SPOT_CONFIG;

/// HTTP connect timeout (seconds)
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
/// HTTP request timeout (seconds)
const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Binance rate limit window
const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

/// Shared HTTP client with explicit timeouts
///
/// Falls back to a default client if the configured builder fails.
pub static GLOBAL_HTTP_CLIENT: Lazy<Arc<Client>> = Lazy::new(|| {
    let client = Client::builder()
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|e| {
            error!("Failed to build configured HTTP client, using defaults: {}", e);
            Client::new()
        });
    Arc::new(client)
});

/// Shared limiter for Binance spot endpoints
pub static GLOBAL_BINANCE_RATE_LIMITER: Lazy<Arc<RateLimiter>> = Lazy::new(|| {
    Arc::new(RateLimiter::weight_based(
        SPOT_CONFIG.weight_per_window,
        RATE_LIMIT_WINDOW,
    ))
});

/// Get the global HTTP client
pub fn global_http_client() -> Arc<Client> {
    GLOBAL_HTTP_CLIENT.clone()
}

/// Get the global Binance rate limiter
pub fn global_binance_rate_limiter() -> Arc<RateLimiter> {
    GLOBAL_BINANCE_RATE_LIMITER.clone()
}
