//! Observer callbacks for pipeline checkpoints
//!
//! The pipeline never prints. Front ends render these events however they
//! like; tests can record them.

use crate::downloader::{PipelineError, PipelineState, Stage};
use crate::fetcher::PageObserver;
use crate::output::{ProjectedTable, WriteResult};
use crate::range::TimeRange;
use crate::Interval;

/// Checkpoint notifications emitted during a run
#[derive(Debug)]
pub enum PipelineEvent<'a> {
    /// The run reached a new checkpoint
    StateChanged {
        /// Checkpoint reached
        state: PipelineState,
    },
    /// Retrieval is about to start
    FetchStarted {
        /// Provider name
        source: &'a str,
        /// Trading symbol
        symbol: &'a str,
        /// Candle interval
        interval: Interval,
        /// Requested range
        range: &'a TimeRange,
        /// Upper bound on the candle count
        expected: u64,
    },
    /// One page arrived
    PageRetrieved {
        /// Page number (1-indexed)
        page: usize,
        /// New candles in this page
        rows: usize,
        /// Candles collected so far
        total: usize,
    },
    /// Retrieval finished
    Fetched {
        /// Candles retrieved
        rows: usize,
    },
    /// Projection and time formatting finished
    Projected {
        /// Table about to be written
        table: &'a ProjectedTable,
    },
    /// Dataset is on disk
    WriteSucceeded {
        /// Final path and row count
        result: &'a WriteResult,
    },
    /// The run stopped
    Failed {
        /// Failing stage
        stage: Stage,
        /// Cause
        error: &'a PipelineError,
    },
}

/// Receives pipeline events
pub trait PipelineObserver: Send + Sync {
    /// Handle one event
    fn on_event(&self, event: &PipelineEvent<'_>);
}

/// Observer that ignores every event
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {
    fn on_event(&self, _event: &PipelineEvent<'_>) {}
}

/// Forwards source page notifications as [`PipelineEvent::PageRetrieved`]
pub(crate) struct PageForwarder<'a> {
    pub(crate) observer: &'a dyn PipelineObserver,
}

impl PageObserver for PageForwarder<'_> {
    fn page_retrieved(&self, page: usize, rows: usize, total: usize) {
        self.observer
            .on_event(&PipelineEvent::PageRetrieved { page, rows, total });
    }
}
