//! Output path derivation
//!
//! A dataset lands at `<dir>/<symbol>-<interval>-<fromDate>-to-<toDate>.<ext>`,
//! with dates rendered `DD-Mon-YYYY`. The path is a pure function of the query,
//! so re-running the same query replaces the same file.
//!
//! ```rust
//! use historical_data::output::OutputDescriptor;
//! use historical_data::Interval;
//! use chrono::NaiveDate;
//!
//! let from = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let to = NaiveDate::from_ymd_opt(2021, 1, 5).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let descriptor = OutputDescriptor::new("dataset", "BTCUSDT", Interval::OneDay, from, to);
//!
//! assert_eq!(
//!     descriptor.path().to_str().unwrap(),
//!     "dataset/BTCUSDT-1d-01-Jan-2021-to-05-Jan-2021.csv"
//! );
//! ```

use crate::config::FetchConfig;
use crate::Interval;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// Date format used in file names
pub const FILENAME_DATE_FORMAT: &str = "%d-%b-%Y";

/// Default dataset extension
pub const DEFAULT_EXTENSION: &str = "csv";

/// Query parameters that determine where a dataset is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDescriptor {
    dir: PathBuf,
    symbol: String,
    interval: Interval,
    from: NaiveDateTime,
    to: NaiveDateTime,
}

impl OutputDescriptor {
    /// Create a descriptor for a `csv` dataset
    ///
    /// The symbol is sanitized so it cannot escape `dir`:
    /// `/`, `\`, `:` become `_` and `..` becomes `__`.
    pub fn new(
        dir: impl Into<PathBuf>,
        symbol: &str,
        interval: Interval,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Self {
        Self {
            dir: dir.into(),
            symbol: sanitize_symbol(symbol),
            interval,
            from,
            to,
        }
    }

    /// Descriptor for a run configuration
    pub fn for_config(config: &FetchConfig) -> Self {
        Self::new(
            config.output_dir(),
            config.symbol(),
            config.interval(),
            config.range().from(),
            config.range().to(),
        )
    }

    /// Output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<symbol>-<interval>-<fromDate>-to-<toDate>.<ext>`
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}-{}-to-{}.{}",
            self.symbol,
            self.interval,
            self.from.format(FILENAME_DATE_FORMAT),
            self.to.format(FILENAME_DATE_FORMAT),
            DEFAULT_EXTENSION
        )
    }

    /// Full output path
    pub fn path(&self) -> PathBuf {
        self.dir.join(self.file_name())
    }
}

fn sanitize_symbol(name: &str) -> String {
    name.replace("..", "__").replace(['/', '\\', ':'], "_")
}
