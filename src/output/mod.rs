//! Dataset projection and writers
//!
//! - [`path`] - Deterministic, query-derived output paths
//! - [`projection`] - Short/full column projection and open-time rendering
//! - [`csv`] - CSV dataset writer with temp-file-then-rename replacement

pub mod csv;
pub mod path;
pub mod projection;

pub use self::csv::{DatasetWriter, WriteResult};
pub use path::OutputDescriptor;
pub use projection::{Column, OpenTime, ProjectedRow, ProjectedTable, SchemaProjector};

/// Output errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// CSV write error
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Epoch milliseconds outside the representable calendar
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(i64),

    /// Open-time text that is not a rendered date-time
    #[error("invalid date-time '{0}'")]
    InvalidDateTime(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
