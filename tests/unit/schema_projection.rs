//! Unit tests for schema projection and open-time rendering

use historical_data::config::SchemaMode;
use historical_data::output::{Column, OpenTime, SchemaProjector};
use historical_data::Candle;
use rust_decimal::Decimal;
use std::str::FromStr;

fn candle(open_time: i64) -> Candle {
    Candle {
        open_time,
        open: Decimal::from_str("0.01634000").unwrap(),
        high: Decimal::from_str("0.80000000").unwrap(),
        low: Decimal::from_str("0.01575800").unwrap(),
        close: Decimal::from_str("0.01577100").unwrap(),
        volume: Decimal::from_str("148976.11427815").unwrap(),
        close_time: open_time + 59_999,
        quote_asset_volume: Decimal::from_str("2434.19055334").unwrap(),
        number_of_trades: 308,
        taker_buy_base_asset_volume: Decimal::from_str("1756.87402397").unwrap(),
        taker_buy_quote_asset_volume: Decimal::from_str("28.46694368").unwrap(),
    }
}

#[test]
fn test_short_projection_keeps_ohlcv_only() {
    let table = SchemaProjector::project(&[candle(1499040000000)], SchemaMode::Short);
    assert_eq!(table.columns(), &Column::SHORT);
    let record: Vec<String> = table.records().next().unwrap();
    assert_eq!(
        record,
        vec![
            "1499040000000",
            "0.01634000",
            "0.80000000",
            "0.01575800",
            "0.01577100",
            "148976.11427815"
        ]
    );
}

#[test]
fn test_full_projection_carries_every_provider_field() {
    let table = SchemaProjector::project(&[candle(1499040000000)], SchemaMode::Full);
    assert_eq!(table.header().len(), 11);
    let record: Vec<String> = table.records().next().unwrap();
    assert_eq!(record[6], "1499040059999");
    assert_eq!(record[8], "308");
    assert_eq!(record[10], "28.46694368");
}

#[test]
fn test_datetime_rendering_inverts_exactly() {
    // one whole-second and one millisecond-bearing open time
    let candles = [candle(1_609_459_200_000), candle(1_609_459_200_123)];
    let table = SchemaProjector::project(&candles, SchemaMode::Short);
    let table = SchemaProjector::resolve_time_format(table, false).unwrap();

    let rendered: Vec<String> = table.records().map(|r| r[0].clone()).collect();
    assert_eq!(rendered[0], "2021-01-01 00:00:00");
    assert_eq!(rendered[1], "2021-01-01 00:00:00.123");

    for (text, original) in rendered.iter().zip(candles.iter()) {
        let parsed = OpenTime::parse_datetime(text).unwrap();
        assert_eq!(parsed.as_millis(), original.open_time);
    }
}

#[test]
fn test_timestamp_mode_leaves_epoch_millis() {
    let table = SchemaProjector::project(&[candle(1_609_459_200_000)], SchemaMode::Full);
    let table = SchemaProjector::resolve_time_format(table, true).unwrap();
    assert_eq!(table.records().next().unwrap()[0], "1609459200000");
}

#[test]
fn test_empty_input_projects_to_empty_table() {
    let table = SchemaProjector::project(&[], SchemaMode::Short);
    assert!(table.is_empty());
    assert_eq!(table.header(), vec!["open_time", "open", "high", "low", "close", "volume"]);
}
