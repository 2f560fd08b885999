//! Unit tests for kline source construction

use historical_data::config::{Credentials, Provider};
use historical_data::fetcher::binance_spot::BinanceSpotSource;
use historical_data::fetcher::create_source;

fn credentials() -> Credentials {
    Credentials::new("test-key", "test-secret").unwrap()
}

#[test]
fn test_create_source_for_binance() {
    let source = create_source(Provider::Binance, credentials(), 5);
    assert_eq!(source.name(), "binance");
}

#[test]
fn test_spot_source_defaults_to_public_endpoint() {
    let source = BinanceSpotSource::new(credentials(), 5);
    assert_eq!(source.base_url(), "https://api.binance.com");
}

#[test]
fn test_spot_source_custom_base_url() {
    let source = BinanceSpotSource::new_with_base_url(credentials(), "http://127.0.0.1:9999/", 0);
    assert_eq!(source.base_url(), "http://127.0.0.1:9999");
}

#[test]
fn test_credentials_debug_is_redacted() {
    let rendered = format!("{:?}", credentials());
    assert!(!rendered.contains("test-key"));
    assert!(!rendered.contains("test-secret"));
}
