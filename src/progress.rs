use std::path::Path;

use crate::error::Error;

/// Trait for reporting pipeline progress.
///
/// The CLI implements this with tracing and indicatif; tests use
/// `SilentReporter` or a recording implementation. All methods have default
/// no-op implementations and may be called from any pipeline thread.
pub trait PipelineReporter: Send + Sync {
    fn on_report_loaded(&self, _item_count: i64, _dupes_count: i64, _records: usize) {}
    fn on_load_failed(&self, _path: &Path, _error: &Error) {}
    fn on_worker_finished(&self, _worker_id: usize, _summarized: usize) {}
    fn on_row_written(&self, _rows: usize) {}
    fn on_write_complete(&self, _rows: usize) {}
    fn on_write_failed(&self, _error: &Error) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl PipelineReporter for SilentReporter {}
