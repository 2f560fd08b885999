//! Inclusive calendar time range and the date formats used around it

use crate::config::ConfigError;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Date format accepted on the command line (`DD/MM/YYYY HH:MM:SS`)
pub const CLI_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Lookback used when no from-date is given
pub const DEFAULT_LOOKBACK_DAYS: i64 = 200;

/// Inclusive `[from, to]` pair of UTC calendar date-times
///
/// Only constructible through [`TimeRange::validate`], so `from <= to` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    from: NaiveDateTime,
    to: NaiveDateTime,
}

impl TimeRange {
    /// Build a range, rejecting `from > to`
    pub fn validate(from: NaiveDateTime, to: NaiveDateTime) -> Result<Self, ConfigError> {
        if from > to {
            return Err(ConfigError::InvalidRange {
                from: from.format(CLI_DATETIME_FORMAT).to_string(),
                to: to.format(CLI_DATETIME_FORMAT).to_string(),
            });
        }
        Ok(Self { from, to })
    }

    /// The default window: [`DEFAULT_LOOKBACK_DAYS`] ending at `now`
    pub fn lookback_from(now: NaiveDateTime) -> Self {
        Self {
            from: now - Duration::days(DEFAULT_LOOKBACK_DAYS),
            to: now,
        }
    }

    /// Inclusive start
    pub fn from(&self) -> NaiveDateTime {
        self.from
    }

    /// Inclusive end
    pub fn to(&self) -> NaiveDateTime {
        self.to
    }

    /// Start as Unix milliseconds (UTC)
    pub fn start_ms(&self) -> i64 {
        self.from.and_utc().timestamp_millis()
    }

    /// End as Unix milliseconds (UTC)
    pub fn end_ms(&self) -> i64 {
        self.to.and_utc().timestamp_millis()
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.from, self.to)
    }
}

/// Parse a `DD/MM/YYYY HH:MM:SS` argument
pub fn parse_cli_datetime(input: &str) -> Result<NaiveDateTime, ConfigError> {
    NaiveDateTime::parse_from_str(input.trim(), CLI_DATETIME_FORMAT).map_err(|e| {
        ConfigError::InvalidDate {
            input: input.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Current UTC wall-clock time without offset
pub fn utc_now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Convert Unix milliseconds to a UTC calendar date-time
pub fn datetime_from_millis(ms: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
}
