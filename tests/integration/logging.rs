//! Integration tests for logging and tracing

use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[test]
fn test_tracing_subscriber_initialization() {
    // try_init fails harmlessly when another test installed a subscriber first
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("historical_data=debug")),
        )
        .with_test_writer()
        .try_init();

    info!("subscriber ready");
}

#[test]
fn test_tracing_json_format() {
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::new("historical_data=info"))
        .with_test_writer()
        .try_init();

    info!(symbol = "BTCUSDT", rows = 5, "json event");
}

#[test]
fn test_env_filter_directives_parse() {
    assert!(EnvFilter::try_new("info").is_ok());
    assert!(EnvFilter::try_new("historical_data=debug").is_ok());
    assert!(EnvFilter::try_new("warn,historical_data=trace").is_ok());
}

#[test]
fn test_structured_logging_fields() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("historical_data=debug"))
        .with_test_writer()
        .try_init();

    let symbol = "BTCUSDT";
    let interval = "1d";
    debug!(symbol, interval, page = 1, "Fetched page");
    warn!(symbol, attempt = 2, "Retrying request");
}
