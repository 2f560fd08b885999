//! CSV dataset writer
//!
//! Writes a [`ProjectedTable`] to the descriptor's path. Rows go to a sibling
//! `<name>.tmp` file which is synced and renamed over the target only once
//! every row is on disk, so a failed write never clobbers an earlier dataset.

use csv::Writer;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::{OutputDescriptor, OutputError, OutputResult, ProjectedTable};

const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Outcome of a successful write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
    /// Final dataset path
    pub path: PathBuf,
    /// Data rows written (header excluded)
    pub rows: usize,
}

/// CSV writer for projected candle tables
#[derive(Debug, Clone)]
pub struct DatasetWriter {
    buffer_size: usize,
}

impl Default for DatasetWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetWriter {
    /// Create a writer with the default buffer size
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Write `table` to `descriptor.path()`, replacing any existing file
    ///
    /// # Errors
    /// `OutputError::IoError`/`CsvError` on any failure. The target is left
    /// untouched in that case.
    pub fn write(
        &self,
        table: &ProjectedTable,
        descriptor: &OutputDescriptor,
    ) -> OutputResult<WriteResult> {
        let path = descriptor.path();
        let temp_path = temp_path_for(&path);
        info!("Writing {} rows to {}", table.len(), path.display());

        std::fs::create_dir_all(descriptor.dir()).map_err(|e| {
            OutputError::IoError(format!(
                "Failed to create directory {}: {}",
                descriptor.dir().display(),
                e
            ))
        })?;

        let result = self
            .write_rows(table, &temp_path)
            .and_then(|()| replace(&temp_path, &path));

        if let Err(e) = &result {
            warn!("Write to {} failed: {}", path.display(), e);
            if temp_path.exists() {
                if let Err(remove_err) = std::fs::remove_file(&temp_path) {
                    warn!("Failed to remove {}: {}", temp_path.display(), remove_err);
                }
            }
        }
        result?;

        info!("Dataset written: {} ({} rows)", path.display(), table.len());
        Ok(WriteResult {
            path,
            rows: table.len(),
        })
    }

    fn write_rows(&self, table: &ProjectedTable, temp_path: &Path) -> OutputResult<()> {
        let file = File::create(temp_path)
            .map_err(|e| OutputError::IoError(format!("Failed to create file: {e}")))?;
        let mut writer = Writer::from_writer(BufWriter::with_capacity(self.buffer_size, file));

        writer
            .write_record(table.header())
            .map_err(|e| OutputError::CsvError(format!("Failed to write header: {e}")))?;

        for record in table.records() {
            writer
                .write_record(&record)
                .map_err(|e| OutputError::CsvError(format!("Failed to write row: {e}")))?;
        }

        writer
            .flush()
            .map_err(|e| OutputError::IoError(format!("Failed to flush: {e}")))?;

        let buf_writer = writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("Failed to get inner writer: {e}")))?;
        let file = buf_writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("Failed to get file handle: {e}")))?;
        file.sync_all()
            .map_err(|e| OutputError::IoError(format!("Failed to sync file: {e}")))?;

        debug!("Temp file {} complete", temp_path.display());
        Ok(())
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn replace(temp_path: &Path, path: &Path) -> OutputResult<()> {
    std::fs::rename(temp_path, path).map_err(|e| {
        OutputError::IoError(format!(
            "Failed to move {} into place: {}",
            temp_path.display(),
            e
        ))
    })
}
