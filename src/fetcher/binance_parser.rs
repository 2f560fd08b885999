//! Binance response parser
//!
//! Stateless conversion of Binance JSON payloads into [`Candle`]s, and
//! classification of Binance error bodies into [`FetcherError`]s.

use crate::fetcher::{FetcherError, FetcherResult};
use crate::Candle;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

/// Binance: "Illegal characters found in parameter '<name>'"
pub const ERR_ILLEGAL_CHARS: i64 = -1100;
/// Binance: "Invalid interval."
pub const ERR_INVALID_INTERVAL: i64 = -1120;
/// Binance: "Invalid symbol."
pub const ERR_INVALID_SYMBOL: i64 = -1121;
/// Binance: "API-key format invalid."
pub const ERR_API_KEY_FORMAT: i64 = -2014;
/// Binance: "Invalid API-key, IP, or permissions for action."
pub const ERR_API_KEY_REJECTED: i64 = -2015;

/// Minimum number of positional fields in a kline row
const KLINE_FIELDS: usize = 11;

/// Error body returned by Binance on 4xx responses
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BinanceApiError {
    /// Binance error code (negative)
    pub code: i64,
    /// Human-readable message
    pub msg: String,
}

/// Stateless parser for Binance API responses
pub struct BinanceParser;

impl BinanceParser {
    /// Parse a klines payload
    ///
    /// # Format
    /// `[open_time, open, high, low, close, volume, close_time, quote_volume, trades, taker_buy_base, taker_buy_quote, ignore]`
    ///
    /// The trailing `ignore` field is dropped.
    pub fn parse_klines(klines: Vec<Value>) -> FetcherResult<Vec<Candle>> {
        let mut candles = Vec::with_capacity(klines.len());

        for kline in klines {
            let arr = kline
                .as_array()
                .ok_or_else(|| FetcherError::ParseError("Kline is not an array".to_string()))?;

            if arr.len() < KLINE_FIELDS {
                return Err(FetcherError::ParseError(format!(
                    "Expected at least {KLINE_FIELDS} elements in kline, got {}",
                    arr.len()
                )));
            }

            let open_time = arr[0]
                .as_i64()
                .ok_or_else(|| FetcherError::ParseError("Invalid open_time".to_string()))?;

            let close_time = arr[6]
                .as_i64()
                .ok_or_else(|| FetcherError::ParseError("Invalid close_time".to_string()))?;

            let number_of_trades = arr[8]
                .as_u64()
                .ok_or_else(|| FetcherError::ParseError("Invalid trades count".to_string()))?;

            let candle = Candle {
                open_time,
                open: Self::parse_decimal(&arr[1], "open")?,
                high: Self::parse_decimal(&arr[2], "high")?,
                low: Self::parse_decimal(&arr[3], "low")?,
                close: Self::parse_decimal(&arr[4], "close")?,
                volume: Self::parse_decimal(&arr[5], "volume")?,
                close_time,
                quote_asset_volume: Self::parse_decimal(&arr[7], "quote_asset_volume")?,
                number_of_trades,
                taker_buy_base_asset_volume: Self::parse_decimal(
                    &arr[9],
                    "taker_buy_base_asset_volume",
                )?,
                taker_buy_quote_asset_volume: Self::parse_decimal(
                    &arr[10],
                    "taker_buy_quote_asset_volume",
                )?,
            };
            candle.validate().map_err(|e| {
                FetcherError::ParseError(format!("Inconsistent kline at {open_time}: {e}"))
            })?;
            candles.push(candle);
        }

        Ok(candles)
    }

    /// Map a non-retryable 4xx response to a typed error
    pub fn classify_client_error(status: u16, body: &str) -> FetcherError {
        let api_error = serde_json::from_str::<BinanceApiError>(body).ok();

        let message = match &api_error {
            Some(err) => format!("{} (code {})", err.msg, err.code),
            None if body.trim().is_empty() => format!("HTTP {status}"),
            None => format!("HTTP {status}: {}", body.trim()),
        };

        if let Some(err) = api_error.as_ref().filter(|err| err.code == ERR_ILLEGAL_CHARS) {
            if names_parameter(&err.msg, "symbol") {
                return FetcherError::InvalidSymbol(message);
            }
            if names_parameter(&err.msg, "interval") {
                return FetcherError::InvalidInterval(message);
            }
        }

        match api_error.map(|err| err.code) {
            Some(ERR_INVALID_SYMBOL) => FetcherError::InvalidSymbol(message),
            Some(ERR_INVALID_INTERVAL) => FetcherError::InvalidInterval(message),
            Some(ERR_API_KEY_FORMAT) | Some(ERR_API_KEY_REJECTED) => {
                FetcherError::Unauthorized(message)
            }
            _ if status == 401 || status == 403 => FetcherError::Unauthorized(message),
            _ => FetcherError::ApiError(message),
        }
    }

    fn parse_decimal(value: &Value, field_name: &str) -> FetcherResult<Decimal> {
        let s = value
            .as_str()
            .ok_or_else(|| FetcherError::ParseError(format!("{field_name} is not a string")))?;

        Decimal::from_str(s)
            .map_err(|e| FetcherError::ParseError(format!("Failed to parse {field_name}: {e}")))
    }
}

/// Whether a Binance message names `param` (`parameter 'symbol'`)
fn names_parameter(msg: &str, param: &str) -> bool {
    msg.contains(&format!("'{param}'"))
}
