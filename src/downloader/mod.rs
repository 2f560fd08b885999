//! Fetch pipeline orchestration
//!
//! A run walks `Validated → Fetched → Projected → Written`. Any stage may fail,
//! which ends the run with [`PipelineError`] naming the stage. There are no
//! retries above the kline source; transport retries live in
//! [`crate::fetcher::binance_http`] and are tuned by [`config`].
//!
//! # Components
//!
//! - [`pipeline`] - [`FetchPipeline`], the orchestrator
//! - [`events`] - Observer callbacks emitted at stage checkpoints
//! - [`rate_limit`] - Weight-based request limiter
//! - [`config`] - Retry and backoff constants

pub mod config;
pub mod events;
pub mod pipeline;
pub mod rate_limit;

pub use events::{NoopObserver, PipelineEvent, PipelineObserver};
pub use pipeline::{FetchPipeline, PipelineOutcome, PipelineState};
pub use rate_limit::{RateLimitError, RateLimiter};

use crate::config::ConfigError;
use crate::fetcher::FetcherError;
use crate::output::OutputError;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Configuration and range validation
    Validate,
    /// Remote retrieval
    Fetch,
    /// Schema projection and time formatting
    Project,
    /// Dataset write
    Write,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Validate => "validate",
            Stage::Fetch => "fetch",
            Stage::Project => "project",
            Stage::Write => "write",
        };
        f.write_str(s)
    }
}

/// Pipeline errors, one variant per failing stage
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Invalid configuration
    #[error("validate stage failed: {0}")]
    Config(#[from] ConfigError),

    /// Remote retrieval failed
    #[error("fetch stage failed: {0}")]
    Fetch(#[from] FetcherError),

    /// Projection failed
    #[error("project stage failed: {0}")]
    Project(OutputError),

    /// Dataset write failed
    #[error("write stage failed: {0}")]
    Write(OutputError),
}

impl PipelineError {
    /// Stage that produced the error
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Config(_) => Stage::Validate,
            PipelineError::Fetch(_) => Stage::Fetch,
            PipelineError::Project(_) => Stage::Project,
            PipelineError::Write(_) => Stage::Write,
        }
    }
}
