use crossbeam_channel::{bounded, Receiver};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tracing::{debug, error};

use crate::error::Error;
use crate::model::{SummaryRecord, SUMMARY_HEADER};
use crate::progress::PipelineReporter;

/// Write the fixed header and then one row per incoming summary, in arrival
/// order, until the input is closed. Returns the number of data rows.
///
/// Each row is handed to the CSV writer as soon as it arrives. On the first
/// failure whatever is already buffered is flushed and the error returned;
/// the input receiver is dropped on return, which stops upstream stages at
/// their next send.
pub fn write_summaries<W: Write>(
    input: Receiver<SummaryRecord>,
    sink: W,
    reporter: &dyn PipelineReporter,
) -> Result<usize, Error> {
    let mut wtr = csv::Writer::from_writer(sink);

    let result = write_rows(&input, &mut wtr, reporter);
    let flushed = wtr.flush().map_err(Error::from);

    match (result, flushed) {
        (Ok(rows), Ok(())) => {
            debug!("Writer: got end of stream after {} rows, exiting", rows);
            reporter.on_write_complete(rows);
            Ok(rows)
        }
        (Err(err), _) | (Ok(_), Err(err)) => {
            error!("Could not write output: {}", err);
            reporter.on_write_failed(&err);
            Err(err)
        }
    }
}

fn write_rows<W: Write>(
    input: &Receiver<SummaryRecord>,
    wtr: &mut csv::Writer<W>,
    reporter: &dyn PipelineReporter,
) -> Result<usize, Error> {
    wtr.write_record(SUMMARY_HEADER)?;

    let mut rows = 0;
    for summary in input.iter() {
        wtr.write_record(summary.to_csv_row())?;
        rows += 1;
        reporter.on_row_written(rows);
    }
    Ok(rows)
}

/// Start the writer stage on its own thread.
///
/// The destination is created or truncated. The terminal outcome, success
/// with the row count or the first error, arrives on the returned channel.
pub fn spawn_writer(
    input: Receiver<SummaryRecord>,
    path: PathBuf,
    reporter: Arc<dyn PipelineReporter>,
) -> Receiver<Result<usize, Error>> {
    let (result_tx, result_rx) = bounded(1);

    thread::spawn(move || {
        let outcome = match File::create(&path) {
            Ok(file) => write_summaries(input, file, reporter.as_ref()),
            Err(source) => {
                let err = Error::OutputOpen { path, source };
                error!("{}", err);
                reporter.on_write_failed(&err);
                Err(err)
            }
        };
        // The caller may have given up waiting; nothing left to do then.
        let _ = result_tx.send(outcome);
    });

    result_rx
}
