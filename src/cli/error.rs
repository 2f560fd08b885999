//! CLI error types and conversions

use crate::config::{AuthError, ConfigError};
use crate::downloader::PipelineError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Invalid arguments
    #[error("configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    /// Missing credentials
    #[error("authentication error: {0}")]
    AuthError(#[from] AuthError),

    /// The run itself failed
    #[error("{0}")]
    PipelineError(#[from] PipelineError),
}
