pub mod loader;
pub mod summarizer;
pub mod writer;

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::error::Error;
use crate::progress::PipelineReporter;

pub use loader::{load_report, spawn_loader};
pub use summarizer::{summarize, SummaryPool};
pub use writer::{spawn_writer, write_summaries};

pub struct Pipeline {
    config: PipelineConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub records_loaded: usize,
    pub records_summarized: usize,
    pub rows_written: usize,
    pub duration: Duration,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run loader → summarizer pool → writer and block until the writer
    /// reports its terminal outcome.
    ///
    /// An unreadable or undecodable input is not an error here: it is
    /// reported through `on_load_failed` and the output holds only the
    /// header. Output open and write failures are returned.
    pub fn run(
        &self,
        input: &Path,
        output: &Path,
        reporter: Arc<dyn PipelineReporter>,
    ) -> Result<RunSummary, Error> {
        self.config.validate()?;
        let start = Instant::now();
        let capacity = self.config.channel_capacity;

        info!(
            "Summarizing '{}' into '{}' with {} workers",
            input.display(),
            output.display(),
            self.config.parallelism
        );

        let (records_rx, loader) =
            spawn_loader(input.to_path_buf(), capacity, Arc::clone(&reporter));
        let (pool, summaries_rx) = SummaryPool::spawn(
            records_rx,
            self.config.parallelism,
            capacity,
            Arc::clone(&reporter),
        )?;
        let result_rx = spawn_writer(summaries_rx, output.to_path_buf(), reporter);

        // Wait for the writer first; once it is done every upstream stage
        // either has drained or will stop at its next send.
        let outcome = result_rx
            .recv()
            .map_err(|_| Error::StageFailed("writer"))?;

        let records_loaded = loader.join().map_err(|_| Error::StageFailed("loader"))?;
        let records_summarized = pool.join()?;
        let rows_written = outcome?;

        let duration = start.elapsed();
        debug!(
            "Pipeline finished in {:.2}s: {} loaded, {} summarized, {} written",
            duration.as_secs_f64(),
            records_loaded,
            records_summarized,
            rows_written
        );

        Ok(RunSummary {
            records_loaded,
            records_summarized,
            rows_written,
            duration,
        })
    }
}
