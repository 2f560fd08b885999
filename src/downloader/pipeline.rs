//! Fetch pipeline
//!
//! Drives one run from a [`FetchConfig`] to a dataset on disk:
//! validate, fetch every page, project to the configured schema, resolve the
//! open-time format and write the file. The observer sees every checkpoint and
//! exactly one terminal event.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::events::{PageForwarder, PipelineEvent, PipelineObserver};
use super::{PipelineError, Stage};
use crate::config::{ConfigError, FetchConfig};
use crate::fetcher::KlineSource;
use crate::output::{DatasetWriter, OutputDescriptor, SchemaProjector};
use crate::range::TimeRange;
use crate::Candle;

/// Checkpoint a run has reached, reported through [`PipelineEvent::StateChanged`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Configuration accepted
    Validated,
    /// All pages retrieved
    Fetched,
    /// Table projected and time-formatted
    Projected,
    /// Dataset written (terminal)
    Written,
    /// Run stopped at the given stage (terminal)
    Failed(Stage),
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// Dataset path
    pub path: PathBuf,
    /// Data rows written
    pub rows: usize,
}

/// Orchestrates one fetch-project-write run
pub struct FetchPipeline {
    source: Box<dyn KlineSource>,
    writer: DatasetWriter,
    observer: Arc<dyn PipelineObserver>,
}

impl FetchPipeline {
    /// Create a pipeline over `source`, reporting to `observer`
    pub fn new(source: Box<dyn KlineSource>, observer: Arc<dyn PipelineObserver>) -> Self {
        Self {
            source,
            writer: DatasetWriter::new(),
            observer,
        }
    }

    /// Run the pipeline for `config`
    ///
    /// # Errors
    /// [`PipelineError`] tagged with the failing stage. A
    /// [`PipelineEvent::Failed`] event is emitted before returning.
    pub async fn run(&self, config: &FetchConfig) -> Result<PipelineOutcome, PipelineError> {
        match self.execute(config).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                let stage = e.stage();
                self.enter(PipelineState::Failed(stage));
                error!("Pipeline failed at {} stage: {}", stage, e);
                self.observer
                    .on_event(&PipelineEvent::Failed { stage, error: &e });
                Err(e)
            }
        }
    }

    async fn execute(&self, config: &FetchConfig) -> Result<PipelineOutcome, PipelineError> {
        self.validate(config)?;
        self.enter(PipelineState::Validated);

        let candles = self.fetch(config).await?;
        self.enter(PipelineState::Fetched);

        let table = SchemaProjector::project(&candles, config.schema());
        let table = SchemaProjector::resolve_time_format(table, config.in_timestamp())
            .map_err(PipelineError::Project)?;
        self.enter(PipelineState::Projected);
        self.observer
            .on_event(&PipelineEvent::Projected { table: &table });

        let descriptor = OutputDescriptor::for_config(config);
        let result = self
            .writer
            .write(&table, &descriptor)
            .map_err(PipelineError::Write)?;
        self.enter(PipelineState::Written);
        self.observer
            .on_event(&PipelineEvent::WriteSucceeded { result: &result });

        info!(
            "{} {} data for {} saved to {}",
            config.symbol(),
            config.interval(),
            config.range(),
            result.path.display()
        );

        Ok(PipelineOutcome {
            path: result.path,
            rows: result.rows,
        })
    }

    fn enter(&self, state: PipelineState) {
        debug!("Pipeline state -> {:?}", state);
        self.observer
            .on_event(&PipelineEvent::StateChanged { state });
    }

    fn validate(&self, config: &FetchConfig) -> Result<(), PipelineError> {
        let provider = config.provider().to_string();
        if self.source.name() != provider {
            return Err(ConfigError::UnsupportedProvider(format!(
                "{} (pipeline source is {})",
                provider,
                self.source.name()
            ))
            .into());
        }
        TimeRange::validate(config.range().from(), config.range().to())?;
        Ok(())
    }

    async fn fetch(&self, config: &FetchConfig) -> Result<Vec<Candle>, PipelineError> {
        let range = config.range();
        self.observer.on_event(&PipelineEvent::FetchStarted {
            source: self.source.name(),
            symbol: config.symbol(),
            interval: config.interval(),
            range,
            expected: config
                .interval()
                .expected_candles(range.start_ms(), range.end_ms()),
        });

        let forwarder = PageForwarder {
            observer: self.observer.as_ref(),
        };
        let candles = self
            .source
            .fetch(config.symbol(), config.interval(), range, &forwarder)
            .await?;

        self.observer
            .on_event(&PipelineEvent::Fetched { rows: candles.len() });
        Ok(candles)
    }
}
