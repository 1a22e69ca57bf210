pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod progress;

pub use config::PipelineConfig;
pub use error::Error;
pub use model::{DuplicateEntry, DuplicateRecord, DuplicatesReport, SummaryRecord};
pub use pipeline::{Pipeline, RunSummary};
pub use progress::{PipelineReporter, SilentReporter};
