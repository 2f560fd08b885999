//! Schema projection
//!
//! Converts provider candles into a [`ProjectedTable`] with either the short
//! (`open_time, open, high, low, close, volume`) or the full column set, and
//! renders the open-time column as epoch milliseconds or a UTC date-time.

use crate::config::SchemaMode;
use crate::output::{OutputError, OutputResult};
use crate::range::datetime_from_millis;
use crate::Candle;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// Rendering of open-time values in date-time mode
pub const OPEN_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Output columns, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// Candle open time (index column)
    OpenTime,
    /// Open price
    Open,
    /// High price
    High,
    /// Low price
    Low,
    /// Close price
    Close,
    /// Base asset volume
    Volume,
    /// Candle close time
    CloseTime,
    /// Quote asset volume
    QuoteAssetVolume,
    /// Number of trades
    NumberOfTrades,
    /// Taker buy base asset volume
    TakerBuyBaseAssetVolume,
    /// Taker buy quote asset volume
    TakerBuyQuoteAssetVolume,
}

impl Column {
    /// Columns kept in short mode
    pub const SHORT: [Column; 6] = [
        Column::OpenTime,
        Column::Open,
        Column::High,
        Column::Low,
        Column::Close,
        Column::Volume,
    ];

    /// Columns kept in full mode
    pub const FULL: [Column; 11] = [
        Column::OpenTime,
        Column::Open,
        Column::High,
        Column::Low,
        Column::Close,
        Column::Volume,
        Column::CloseTime,
        Column::QuoteAssetVolume,
        Column::NumberOfTrades,
        Column::TakerBuyBaseAssetVolume,
        Column::TakerBuyQuoteAssetVolume,
    ];

    /// Columns for a schema mode
    pub fn for_mode(mode: SchemaMode) -> &'static [Column] {
        match mode {
            SchemaMode::Short => &Self::SHORT,
            SchemaMode::Full => &Self::FULL,
        }
    }

    /// Header name
    pub fn name(&self) -> &'static str {
        match self {
            Column::OpenTime => "open_time",
            Column::Open => "open",
            Column::High => "high",
            Column::Low => "low",
            Column::Close => "close",
            Column::Volume => "volume",
            Column::CloseTime => "close_time",
            Column::QuoteAssetVolume => "quote_av",
            Column::NumberOfTrades => "trades",
            Column::TakerBuyBaseAssetVolume => "tb_base_av",
            Column::TakerBuyQuoteAssetVolume => "tb_quote_av",
        }
    }
}

/// Open-time cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenTime {
    /// Unix milliseconds
    Millis(i64),
    /// UTC calendar date-time
    DateTime(NaiveDateTime),
}

impl OpenTime {
    /// Epoch milliseconds regardless of representation
    pub fn as_millis(&self) -> i64 {
        match self {
            OpenTime::Millis(ms) => *ms,
            OpenTime::DateTime(dt) => dt.and_utc().timestamp_millis(),
        }
    }

    /// Cell text
    pub fn render(&self) -> String {
        match self {
            OpenTime::Millis(ms) => ms.to_string(),
            OpenTime::DateTime(dt) => dt.format(OPEN_TIME_FORMAT).to_string(),
        }
    }

    /// Parse text produced by [`OpenTime::render`] in date-time mode
    pub fn parse_datetime(text: &str) -> OutputResult<Self> {
        NaiveDateTime::parse_from_str(text, OPEN_TIME_FORMAT)
            .map(OpenTime::DateTime)
            .map_err(|_| OutputError::InvalidDateTime(text.to_string()))
    }
}

/// Columns only present in full mode
#[derive(Debug, Clone, PartialEq)]
pub struct FullFields {
    /// Close time (Unix ms)
    pub close_time: i64,
    /// Quote asset volume
    pub quote_asset_volume: Decimal,
    /// Number of trades
    pub number_of_trades: u64,
    /// Taker buy base asset volume
    pub taker_buy_base_asset_volume: Decimal,
    /// Taker buy quote asset volume
    pub taker_buy_quote_asset_volume: Decimal,
}

/// One output row
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedRow {
    /// Open time
    pub open_time: OpenTime,
    /// Open price
    pub open: Decimal,
    /// High price
    pub high: Decimal,
    /// Low price
    pub low: Decimal,
    /// Close price
    pub close: Decimal,
    /// Base asset volume
    pub volume: Decimal,
    /// Present only in full mode
    pub full: Option<FullFields>,
}

impl ProjectedRow {
    /// Cell text for a column; `None` when the column is not projected
    pub fn cell(&self, column: Column) -> Option<String> {
        let full = self.full.as_ref();
        match column {
            Column::OpenTime => Some(self.open_time.render()),
            Column::Open => Some(self.open.to_string()),
            Column::High => Some(self.high.to_string()),
            Column::Low => Some(self.low.to_string()),
            Column::Close => Some(self.close.to_string()),
            Column::Volume => Some(self.volume.to_string()),
            Column::CloseTime => full.map(|f| f.close_time.to_string()),
            Column::QuoteAssetVolume => full.map(|f| f.quote_asset_volume.to_string()),
            Column::NumberOfTrades => full.map(|f| f.number_of_trades.to_string()),
            Column::TakerBuyBaseAssetVolume => {
                full.map(|f| f.taker_buy_base_asset_volume.to_string())
            }
            Column::TakerBuyQuoteAssetVolume => {
                full.map(|f| f.taker_buy_quote_asset_volume.to_string())
            }
        }
    }
}

/// Candle table after projection, ordered by ascending open time
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedTable {
    mode: SchemaMode,
    rows: Vec<ProjectedRow>,
}

impl ProjectedTable {
    /// Projected columns, open time first
    pub fn columns(&self) -> &'static [Column] {
        Column::for_mode(self.mode)
    }

    /// Header names
    pub fn header(&self) -> Vec<&'static str> {
        self.columns().iter().map(Column::name).collect()
    }

    /// Rows
    pub fn rows(&self) -> &[ProjectedRow] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row cells in column order
    pub fn records(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        let columns = self.columns();
        self.rows.iter().map(move |row| {
            columns
                .iter()
                .map(|column| row.cell(*column).unwrap_or_default())
                .collect()
        })
    }

    /// Fixed-width preview with the first and last `edge` rows
    pub fn preview(&self, edge: usize) -> String {
        let header = self.header();
        let records: Vec<Vec<String>> = self.records().collect();
        let shown: Vec<Option<&Vec<String>>> = if records.len() > edge * 2 {
            records[..edge]
                .iter()
                .map(Some)
                .chain(std::iter::once(None))
                .chain(records[records.len() - edge..].iter().map(Some))
                .collect()
        } else {
            records.iter().map(Some).collect()
        };

        let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
        for record in shown.iter().flatten() {
            for (width, cell) in widths.iter_mut().zip(record.iter()) {
                *width = (*width).max(cell.len());
            }
        }

        let mut lines = vec![format_line(header.iter().copied(), &widths)];
        for record in shown {
            match record {
                Some(cells) => lines.push(format_line(cells.iter().map(String::as_str), &widths)),
                None => lines.push("...".to_string()),
            }
        }
        lines.push(format!("[{} rows x {} columns]", self.len(), header.len()));
        lines.join("\n")
    }
}

fn format_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths.iter())
        .map(|(cell, width)| format!("{cell:>width$}"))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Pure column projection over candles
pub struct SchemaProjector;

impl SchemaProjector {
    /// Project candles onto the columns of `mode`; open time stays in milliseconds
    pub fn project(candles: &[Candle], mode: SchemaMode) -> ProjectedTable {
        let rows = candles
            .iter()
            .map(|candle| ProjectedRow {
                open_time: OpenTime::Millis(candle.open_time),
                open: candle.open,
                high: candle.high,
                low: candle.low,
                close: candle.close,
                volume: candle.volume,
                full: match mode {
                    SchemaMode::Short => None,
                    SchemaMode::Full => Some(FullFields {
                        close_time: candle.close_time,
                        quote_asset_volume: candle.quote_asset_volume,
                        number_of_trades: candle.number_of_trades,
                        taker_buy_base_asset_volume: candle.taker_buy_base_asset_volume,
                        taker_buy_quote_asset_volume: candle.taker_buy_quote_asset_volume,
                    }),
                },
            })
            .collect();

        ProjectedTable { mode, rows }
    }

    /// Render open time as epoch milliseconds (`in_timestamp`) or as a date-time
    ///
    /// Only the open-time column changes. Both directions are exact at
    /// millisecond precision.
    pub fn resolve_time_format(
        mut table: ProjectedTable,
        in_timestamp: bool,
    ) -> OutputResult<ProjectedTable> {
        for row in &mut table.rows {
            let ms = row.open_time.as_millis();
            row.open_time = if in_timestamp {
                OpenTime::Millis(ms)
            } else {
                let dt = datetime_from_millis(ms).ok_or(OutputError::InvalidTimestamp(ms))?;
                OpenTime::DateTime(dt)
            };
        }
        Ok(table)
    }
}
