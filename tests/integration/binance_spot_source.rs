//! Binance spot kline source against a mock server

use crate::common::{klines, JAN_1_2021, MINUTE};
use historical_data::config::Credentials;
use historical_data::fetcher::binance_spot::BinanceSpotSource;
use historical_data::fetcher::{FetcherError, KlineSource, NoopPageObserver, PageObserver};
use historical_data::range::{datetime_from_millis, TimeRange};
use historical_data::Interval;
use serde_json::json;
use std::sync::Mutex;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

async fn setup(max_retries: u32) -> (MockServer, BinanceSpotSource) {
    let mock_server = MockServer::start().await;
    let source = BinanceSpotSource::new_with_base_url(
        Credentials::new("test-key", "test-secret").unwrap(),
        mock_server.uri(),
        max_retries,
    );
    (mock_server, source)
}

fn range(start: i64, end: i64) -> TimeRange {
    TimeRange::validate(
        datetime_from_millis(start).unwrap(),
        datetime_from_millis(end).unwrap(),
    )
    .unwrap()
}

#[derive(Default)]
struct PageLog {
    pages: Mutex<Vec<(usize, usize, usize)>>,
}

impl PageObserver for PageLog {
    fn page_retrieved(&self, page: usize, rows: usize, total: usize) {
        self.pages.lock().unwrap().push((page, rows, total));
    }
}

#[tokio::test]
async fn test_multi_page_fetch_walks_windows_in_order() {
    let (mock_server, source) = setup(0).await;
    let end = JAN_1_2021 + 1499 * MINUTE;
    let second_start = JAN_1_2021 + 999 * MINUTE + 1;

    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(header("X-MBX-APIKEY", "test-key"))
        .and(query_param("symbol", "BTCUSDT"))
        .and(query_param("interval", "1m"))
        .and(query_param("limit", "1000"))
        .and(query_param("startTime", JAN_1_2021.to_string()))
        .and(query_param("endTime", end.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(klines(JAN_1_2021, MINUTE, 1000)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("startTime", second_start.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(klines(JAN_1_2021 + 1000 * MINUTE, MINUTE, 500)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let log = PageLog::default();
    let candles = source
        .fetch("BTCUSDT", Interval::OneMinute, &range(JAN_1_2021, end), &log)
        .await
        .unwrap();

    assert_eq!(candles.len(), 1500);
    assert_eq!(candles[0].open_time, JAN_1_2021);
    assert_eq!(candles[1499].open_time, end);
    assert!(candles.windows(2).all(|w| w[0].open_time < w[1].open_time));
    assert_eq!(*log.pages.lock().unwrap(), vec![(1, 1000, 1000), (2, 500, 1500)]);
}

#[tokio::test]
async fn test_empty_range_returns_no_candles() {
    let (mock_server, source) = setup(0).await;

    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let candles = source
        .fetch(
            "BTCUSDT",
            Interval::OneDay,
            &range(JAN_1_2021, JAN_1_2021),
            &NoopPageObserver,
        )
        .await
        .unwrap();
    assert!(candles.is_empty());
}

#[tokio::test]
async fn test_invalid_symbol_is_not_retried() {
    let (mock_server, source) = setup(3).await;

    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"code": -1121, "msg": "Invalid symbol."})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = source
        .fetch(
            "NOPE",
            Interval::OneDay,
            &range(JAN_1_2021, JAN_1_2021),
            &NoopPageObserver,
        )
        .await;
    assert!(matches!(result, Err(FetcherError::InvalidSymbol(_))));
}

#[tokio::test]
async fn test_rejected_key_is_unauthorized() {
    let (mock_server, source) = setup(3).await;

    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(401).set_body_json(
            json!({"code": -2015, "msg": "Invalid API-key, IP, or permissions for action."}),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = source
        .fetch(
            "BTCUSDT",
            Interval::OneDay,
            &range(JAN_1_2021, JAN_1_2021),
            &NoopPageObserver,
        )
        .await;
    assert!(matches!(result, Err(FetcherError::Unauthorized(_))));
}

#[tokio::test]
async fn test_invalid_interval_is_classified() {
    let (mock_server, source) = setup(0).await;

    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"code": -1120, "msg": "Invalid interval."})),
        )
        .mount(&mock_server)
        .await;

    let result = source
        .fetch(
            "BTCUSDT",
            Interval::OneDay,
            &range(JAN_1_2021, JAN_1_2021),
            &NoopPageObserver,
        )
        .await;
    assert!(matches!(result, Err(FetcherError::InvalidInterval(_))));
}

#[tokio::test]
async fn test_rate_limited_request_is_retried() {
    let (mock_server, source) = setup(1).await;

    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(klines(JAN_1_2021, MINUTE, 3)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let candles = source
        .fetch(
            "BTCUSDT",
            Interval::OneMinute,
            &range(JAN_1_2021, JAN_1_2021 + 2 * MINUTE),
            &NoopPageObserver,
        )
        .await
        .unwrap();
    assert_eq!(candles.len(), 3);
}

#[tokio::test]
async fn test_malformed_row_is_a_parse_error() {
    let (mock_server, source) = setup(0).await;

    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[JAN_1_2021, "1.0"]])))
        .mount(&mock_server)
        .await;

    let result = source
        .fetch(
            "BTCUSDT",
            Interval::OneMinute,
            &range(JAN_1_2021, JAN_1_2021),
            &NoopPageObserver,
        )
        .await;
    assert!(matches!(result, Err(FetcherError::ParseError(_))));
}

#[tokio::test]
async fn test_illegal_symbol_characters_are_invalid_symbol() {
    let (mock_server, source) = setup(3).await;

    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("symbol", "btcusdt"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": -1100,
            "msg": "Illegal characters found in parameter 'symbol'; legal range is '^[A-Z0-9-_.]{1,20}$'."
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = source
        .fetch(
            "btcusdt",
            Interval::OneDay,
            &range(JAN_1_2021, JAN_1_2021),
            &NoopPageObserver,
        )
        .await;
    assert!(matches!(result, Err(FetcherError::InvalidSymbol(_))));
}

#[tokio::test]
async fn test_server_errors_exhaust_retries_as_network_error() {
    let (mock_server, source) = setup(1).await;

    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&mock_server)
        .await;

    let result = source
        .fetch(
            "BTCUSDT",
            Interval::OneDay,
            &range(JAN_1_2021, JAN_1_2021),
            &NoopPageObserver,
        )
        .await;
    assert!(matches!(result, Err(FetcherError::NetworkError(_))));
}

#[tokio::test]
async fn test_persistent_rate_limit_exhausts_retries() {
    let (mock_server, source) = setup(1).await;

    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&mock_server)
        .await;

    let result = source
        .fetch(
            "BTCUSDT",
            Interval::OneDay,
            &range(JAN_1_2021, JAN_1_2021),
            &NoopPageObserver,
        )
        .await;
    assert!(matches!(result, Err(FetcherError::RateLimitExceeded)));
}
