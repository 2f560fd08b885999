//! Shared fixtures for the mock Binance server

use serde_json::{json, Value};

/// 2021-01-01 00:00:00 UTC
pub const JAN_1_2021: i64 = 1_609_459_200_000;
pub const MINUTE: i64 = 60_000;
pub const DAY: i64 = 86_400_000;

/// One kline row in the Binance wire layout (12 fields)
pub fn kline(open_time: i64, step: i64) -> Value {
    json!([
        open_time,
        "29000.00",
        "29500.00",
        "28800.00",
        "29200.00",
        "1000.00",
        open_time + step - 1,
        "29000000.00",
        5000,
        "500.00",
        "14500000.00",
        "0"
    ])
}

/// `count` consecutive klines starting at `start`, `step` ms apart
pub fn klines(start: i64, step: i64, count: usize) -> Value {
    Value::Array(
        (0..count as i64)
            .map(|i| kline(start + i * step, step))
            .collect(),
    )
}
