use colored::*;
use dupes_report_csv::{Error, PipelineReporter};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// CLI progress reporter: log lines through tracing plus a spinner that
/// counts rows as the writer emits them.
pub struct CliReporter {
    bar: ProgressBar,
}

impl CliReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        bar.set_message("Loading report...");
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }
}

impl PipelineReporter for CliReporter {
    fn on_report_loaded(&self, item_count: i64, dupes_count: i64, records: usize) {
        info!(
            "Loaded {} duplicate groups ({} items, {} duplicates)",
            records, item_count, dupes_count
        );
        self.bar.set_message("Summarizing...");
    }

    fn on_load_failed(&self, path: &Path, _err: &Error) {
        warn!(
            "No records loaded from '{}', output will only contain the header",
            path.display()
        );
    }

    fn on_worker_finished(&self, worker_id: usize, summarized: usize) {
        debug!("Worker {} summarized {} groups", worker_id, summarized);
    }

    fn on_row_written(&self, rows: usize) {
        self.bar.set_message(format!("Wrote {} rows", rows));
    }

    fn on_write_complete(&self, rows: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "  {} CSV written: {} rows",
            "✓".green(),
            format!("{}", rows).green()
        );
    }

    fn on_write_failed(&self, err: &Error) {
        self.bar.abandon_with_message(format!("{} {}", "✗".red(), err));
    }
}
