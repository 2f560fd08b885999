//! Binance spot market configuration
//!
//! Endpoint paths, page cap and rate-limit weights for `https://api.binance.com`.

/// Configuration for a Binance REST market
#[derive(Debug, Clone)]
pub struct BinanceMarketConfig {
    /// Base URL for API
    pub base_url: &'static str,

    /// Klines endpoint path
    pub klines_endpoint: &'static str,

    /// Maximum klines returned per request
    pub klines_page_limit: usize,

    /// Rate limit weight of one klines request
    pub klines_weight: u32,

    /// Request weight allowed per rate-limit window
    pub weight_per_window: u32,

    /// Header carrying the API key
    pub api_key_header: &'static str,
}

/// Binance spot (`/api/v3`)
///
/// Weights from the Binance API documentation:
/// - klines: 2 weight for any limit up to 1000
/// - quota: 6000 weight per minute per IP
pub const SPOT_CONFIG: BinanceMarketConfig = BinanceMarketConfig {
    base_url: "https://api.binance.com",
    klines_endpoint: "/api/v3/klines",
    klines_page_limit: 1000,
    klines_weight: 2,
    weight_per_window: 6000,
    api_key_header: "X-MBX-APIKEY",
};
