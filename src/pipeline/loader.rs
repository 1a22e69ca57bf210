use crossbeam_channel::{bounded, Receiver};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info};

use crate::error::Error;
use crate::model::{DuplicateRecord, DuplicatesReport};
use crate::progress::PipelineReporter;

/// Open the report, read it fully and decode it in one shot.
pub fn load_report(path: &Path) -> Result<DuplicatesReport, Error> {
    let mut f = File::open(path).map_err(|source| Error::InputOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let mut data = Vec::new();
    f.read_to_end(&mut data).map_err(|source| Error::InputRead {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&data).map_err(|source| Error::InputDecode {
        path: path.to_path_buf(),
        source,
    })
}

/// Start the loader stage on its own thread.
///
/// Records are sent in document order. Any load failure is logged and
/// reported, and the channel is closed without sending anything, so the rest
/// of the pipeline sees an empty input. The join handle yields the number of
/// records sent.
pub fn spawn_loader(
    path: PathBuf,
    capacity: usize,
    reporter: Arc<dyn PipelineReporter>,
) -> (Receiver<DuplicateRecord>, JoinHandle<usize>) {
    let (tx, rx) = bounded(capacity);

    let handle = thread::spawn(move || {
        let report = match load_report(&path) {
            Ok(report) => report,
            Err(err) => {
                error!("{}", err);
                reporter.on_load_failed(&path, &err);
                return 0;
            }
        };

        match report.dupe_percentage() {
            Some(pct) => info!(
                "This vault has a total of {} items of which {} are duplicates ({:.0}%)",
                report.item_count, report.dupes_count, pct
            ),
            None => info!(
                "This vault has no items and {} duplicates",
                report.dupes_count
            ),
        }
        reporter.on_report_loaded(
            report.item_count,
            report.dupes_count,
            report.duplicates.len(),
        );

        let mut sent = 0;
        for record in report.duplicates {
            if tx.send(record).is_err() {
                debug!("Loader: downstream closed after {} records, stopping", sent);
                break;
            }
            sent += 1;
        }
        debug!("Loader: end of stream after {} records", sent);
        sent
    });

    (rx, handle)
}
