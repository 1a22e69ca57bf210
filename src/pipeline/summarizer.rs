use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::debug;

use crate::error::Error;
use crate::model::{DuplicateEntry, DuplicateRecord, SummaryRecord};
use crate::progress::PipelineReporter;

fn find_a_type(entries: &[DuplicateEntry]) -> String {
    entries
        .iter()
        .find_map(DuplicateEntry::media_type)
        .unwrap_or_default()
        .to_string()
}

fn find_a_project(entries: &[DuplicateEntry]) -> String {
    entries
        .iter()
        .find_map(DuplicateEntry::project)
        .unwrap_or_default()
        .to_string()
}

fn count_total_size(entries: &[DuplicateEntry]) -> u64 {
    entries
        .iter()
        .fold(0u64, |acc, entry| acc.saturating_add(entry.byte_size))
}

/// Derive the summary row for one duplicate group.
///
/// The individual file size is the size of the first listed entry, not the
/// smallest or most common one.
pub fn summarize(record: DuplicateRecord) -> SummaryRecord {
    let individual_file_size = record
        .duplicates_data
        .first()
        .map(|entry| entry.byte_size)
        .unwrap_or(0);

    SummaryRecord {
        maybe_type: find_a_type(&record.duplicates_data),
        maybe_project: find_a_project(&record.duplicates_data),
        total_size: count_total_size(&record.duplicates_data),
        individual_file_size,
        duplicate_count: record.duplicate_count,
        mxfs_path: record.mxfs_path,
    }
}

/// A fixed-size pool of summarizer workers sharing one input and one output
/// channel.
///
/// Every worker owns a clone of the output sender and the pool keeps none,
/// so the output channel disconnects exactly when the last worker exits.
/// Output order across workers is not deterministic.
pub struct SummaryPool {
    workers: Vec<JoinHandle<usize>>,
}

impl SummaryPool {
    pub fn spawn(
        input: Receiver<DuplicateRecord>,
        parallelism: usize,
        capacity: usize,
        reporter: Arc<dyn PipelineReporter>,
    ) -> Result<(Self, Receiver<SummaryRecord>), Error> {
        if parallelism == 0 {
            return Err(Error::InvalidConfig(
                "parallelism must be at least 1".to_string(),
            ));
        }

        let (tx, rx) = bounded(capacity);
        let workers = (0..parallelism)
            .map(|worker_id| {
                let input = input.clone();
                let output = tx.clone();
                let reporter = Arc::clone(&reporter);
                thread::spawn(move || summary_worker(worker_id, input, output, reporter.as_ref()))
            })
            .collect();

        Ok((Self { workers }, rx))
    }

    /// Wait for every worker and return the total number of records
    /// summarized.
    pub fn join(self) -> Result<usize, Error> {
        let mut total = 0;
        for handle in self.workers {
            total += handle
                .join()
                .map_err(|_| Error::StageFailed("summarizer"))?;
        }
        Ok(total)
    }
}

fn summary_worker(
    worker_id: usize,
    input: Receiver<DuplicateRecord>,
    output: Sender<SummaryRecord>,
    reporter: &dyn PipelineReporter,
) -> usize {
    let mut summarized = 0;
    for record in input.iter() {
        if output.send(summarize(record)).is_err() {
            debug!("Summarizer {}: output closed, exiting", worker_id);
            break;
        }
        summarized += 1;
    }
    debug!(
        "Summarizer {}: got end of stream after {} records, exiting",
        worker_id, summarized
    );
    reporter.on_worker_finished(worker_id, summarized);
    summarized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SilentReporter;

    fn entry(media_type: &str, project: &str, size: u64) -> DuplicateEntry {
        DuplicateEntry {
            maybe_type: Some(media_type.to_string()),
            maybe_project: Some(project.to_string()),
            byte_size: size,
            ..Default::default()
        }
    }

    #[test]
    fn test_summarize_mixed_classification() {
        let record = DuplicateRecord {
            mxfs_path: "/vol/a.mov".to_string(),
            duplicate_count: 3,
            duplicates_data: vec![
                entry("", "P1", 100),
                entry("movie", "", 100),
                entry("", "", 50),
            ],
        };

        let summary = summarize(record);
        assert_eq!(summary.mxfs_path, "/vol/a.mov");
        assert_eq!(summary.maybe_type, "movie");
        assert_eq!(summary.maybe_project, "P1");
        assert_eq!(summary.duplicate_count, 3);
        assert_eq!(summary.individual_file_size, 100);
        assert_eq!(summary.total_size, 250);
    }

    #[test]
    fn test_summarize_empty_group() {
        let record = DuplicateRecord {
            mxfs_path: "/vol/b.mov".to_string(),
            duplicate_count: 0,
            duplicates_data: vec![],
        };

        let summary = summarize(record);
        assert_eq!(summary.maybe_type, "");
        assert_eq!(summary.maybe_project, "");
        assert_eq!(summary.individual_file_size, 0);
        assert_eq!(summary.total_size, 0);
    }

    #[test]
    fn test_summarize_keeps_declared_count() {
        let record = DuplicateRecord {
            mxfs_path: "/vol/c.mov".to_string(),
            duplicate_count: 7,
            duplicates_data: vec![entry("", "", 10), entry("", "", 10)],
        };
        assert_eq!(summarize(record).duplicate_count, 7);
    }

    #[test]
    fn test_summarize_individual_size_is_positional() {
        let record = DuplicateRecord {
            duplicates_data: vec![entry("", "", 300), entry("", "", 1), entry("", "", 1)],
            ..Default::default()
        };
        assert_eq!(summarize(record).individual_file_size, 300);
    }

    #[test]
    fn test_summarize_missing_classification() {
        let record = DuplicateRecord {
            duplicates_data: vec![DuplicateEntry {
                byte_size: 42,
                ..Default::default()
            }],
            ..Default::default()
        };
        let summary = summarize(record);
        assert_eq!(summary.maybe_type, "");
        assert_eq!(summary.maybe_project, "");
        assert_eq!(summary.total_size, 42);
    }

    #[test]
    fn test_pool_rejects_zero_parallelism() {
        let (_tx, rx) = bounded::<DuplicateRecord>(1);
        let result = SummaryPool::spawn(rx, 0, 1, Arc::new(SilentReporter));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_pool_output_closes_after_all_workers() {
        let (tx, rx) = bounded(2);
        let (pool, out) = SummaryPool::spawn(rx, 4, 2, Arc::new(SilentReporter)).unwrap();

        let producer = thread::spawn(move || {
            for i in 0..200 {
                tx.send(DuplicateRecord {
                    mxfs_path: format!("/vol/{i}"),
                    duplicate_count: i,
                    duplicates_data: vec![],
                })
                .unwrap();
            }
        });

        let mut paths: Vec<String> = out.iter().map(|s| s.mxfs_path).collect();
        producer.join().unwrap();
        assert_eq!(pool.join().unwrap(), 200);

        paths.sort();
        let mut expected: Vec<String> = (0..200).map(|i| format!("/vol/{i}")).collect();
        expected.sort();
        assert_eq!(paths, expected);
    }

    #[test]
    fn test_pool_stops_when_output_dropped() {
        let (tx, rx) = bounded(1);
        let (pool, out) = SummaryPool::spawn(rx, 2, 1, Arc::new(SilentReporter)).unwrap();
        drop(out);

        // Workers exit on their first failed send, which drops every input
        // receiver; the producer then sees a disconnect instead of blocking.
        let mut sent = 0;
        while tx.send(DuplicateRecord::default()).is_ok() {
            sent += 1;
            assert!(sent < 10_000, "producer was never disconnected");
        }
        assert_eq!(pool.join().unwrap(), 0);
    }
}
