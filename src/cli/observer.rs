//! Console rendering of pipeline events

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

use crate::downloader::{PipelineEvent, PipelineObserver};

/// Rows shown at each end of the table preview
const PREVIEW_EDGE_ROWS: usize = 5;

const SPINNER_TICK: Duration = Duration::from_millis(120);

/// Spinner while fetching, plain lines for every other checkpoint
pub struct ConsoleObserver {
    spinner: Mutex<Option<ProgressBar>>,
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleObserver {
    /// Create an observer with no active spinner
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn start_spinner(&self, message: String) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
        {
            pb.set_style(style);
        }
        pb.set_message(message);
        pb.enable_steady_tick(SPINNER_TICK);
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(pb);
        }
    }

    fn update_spinner(&self, message: String) {
        if let Ok(slot) = self.spinner.lock() {
            if let Some(pb) = slot.as_ref() {
                pb.set_message(message);
            }
        }
    }

    fn stop_spinner(&self) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(pb) = slot.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl PipelineObserver for ConsoleObserver {
    fn on_event(&self, event: &PipelineEvent<'_>) {
        match event {
            PipelineEvent::StateChanged { .. } => {}
            PipelineEvent::FetchStarted {
                source,
                symbol,
                interval,
                range,
                expected,
            } => {
                println!("Fetching {symbol} {interval} candles from {source} ({range})");
                self.start_spinner(format!("waiting for first page (up to {expected} candles)"));
            }
            PipelineEvent::PageRetrieved { page, total, .. } => {
                self.update_spinner(format!("page {page}: {total} candles"));
            }
            PipelineEvent::Fetched { rows } => {
                self.stop_spinner();
                println!("Retrieved {rows} candles");
            }
            PipelineEvent::Projected { table } => {
                if !table.is_empty() {
                    println!("{}", table.preview(PREVIEW_EDGE_ROWS));
                }
            }
            PipelineEvent::WriteSucceeded { result } => {
                println!(
                    "Data saved to {} ({} rows)",
                    result.path.display(),
                    result.rows
                );
            }
            PipelineEvent::Failed { .. } => {
                if let Ok(mut slot) = self.spinner.lock() {
                    if let Some(pb) = slot.take() {
                        pb.abandon();
                    }
                }
            }
        }
    }
}
