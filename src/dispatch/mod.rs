// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Work partitioning and supervision.
//!
//! The [`Dispatcher`] splits the `C(20, L) * 3^L` index space into N
//! contiguous ranges and hands them out pull-style: workers call
//! [`Dispatcher::next_job`] until it returns `None`. The only shared mutable
//! state is the range cursor (mutex-protected) and the per-worker counter
//! blocks (relaxed atomics, summed on demand for progress snapshots).
//!
//! [`Dispatcher::launch`] runs the whole pipeline: spawn workers, poll
//! progress on a fixed interval, join, k-way merge the per-range files into
//! the final output, and hand the summary to the caller. Cancellation via
//! [`Dispatcher::kill`] is cooperative: in-flight ranges finish, no further
//! ranges are assigned.

pub mod worker;

use crate::code::total_codes;
use crate::error::SearchError;
use crate::output::{external_sort, OutputSink};
use crate::report::{null_progress, ProgressFn, RunSummary};
use crate::stats::{self, Counters, SearchStats};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Configuration surface consumed by the core; owned by the CLI (or any
/// other front end).
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Code length L, in 1..=20.
    pub length: usize,
    /// Number of contiguous ranges to split the index space into.
    pub partitions: u64,
    /// Number of OS worker threads.
    pub workers: usize,
    /// Also test (and only persist) maximal circular codes.
    pub count_maximal: bool,
    /// Final output file; `None` means count only, write nothing.
    pub output: Option<PathBuf>,
    /// Progress polling interval of the supervising thread.
    pub poll_interval: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            length: 2,
            partitions: 1,
            workers: 1,
            count_maximal: false,
            output: None,
            poll_interval: Duration::from_millis(1000),
        }
    }
}

/// One assigned partition: an inclusive rank range and where to write
/// accepted codes.
#[derive(Debug)]
pub struct Job {
    pub start: u64,
    pub end: u64,
    pub sink: OutputSink,
}

/// Cursor state guarded by the dispatch mutex.
#[derive(Debug)]
struct Cursor {
    /// First rank of the next unassigned range.
    next_rank: u64,
    /// Ordinal of the next job, used to name its temp file.
    sequence: u64,
    /// Temp files created so far, in assignment order.
    temp_files: Vec<PathBuf>,
}

pub struct Dispatcher {
    config: SearchConfig,
    /// Size of the whole index space.
    total: u64,
    /// Ranks per partition (the final partition also absorbs `remainder`).
    per_partition: u64,
    remainder: u64,
    /// Rank at which the final partition begins.
    last_start: u64,
    cursor: Mutex<Cursor>,
    killed: AtomicBool,
    /// One counter block per worker, shared with the worker threads.
    worker_stats: Vec<Arc<SearchStats>>,
    progress: ProgressFn,
}

impl Dispatcher {
    /// Validate the configuration and compute the partition arithmetic.
    pub fn new(config: SearchConfig, progress: ProgressFn) -> Result<Self, SearchError> {
        if !(1..=20).contains(&config.length) {
            return Err(SearchError::InvalidLength(config.length));
        }
        if config.partitions == 0 {
            return Err(SearchError::NoPartitions);
        }
        if config.workers == 0 {
            return Err(SearchError::NoWorkers);
        }

        let total = total_codes(config.length);
        let per_partition = total / config.partitions;
        let remainder = total % config.partitions;
        let last_start = total - remainder - per_partition;
        let worker_stats = (0..config.workers)
            .map(|_| Arc::new(SearchStats::new()))
            .collect();

        Ok(Self {
            config,
            total,
            per_partition,
            remainder,
            last_start,
            cursor: Mutex::new(Cursor {
                next_rank: 0,
                sequence: 0,
                temp_files: Vec::new(),
            }),
            killed: AtomicBool::new(false),
            worker_stats,
            progress,
        })
    }

    /// Create a dispatcher that reports progress nowhere.
    pub fn without_progress(config: SearchConfig) -> Result<Self, SearchError> {
        Self::new(config, null_progress())
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn length(&self) -> usize {
        self.config.length
    }

    pub fn counting_maximal(&self) -> bool {
        self.config.count_maximal
    }

    /// Hand out the next unassigned range, or `None` when the space is
    /// exhausted or the run was cancelled. The final range absorbs
    /// `total % partitions`.
    pub fn next_job(&self) -> Option<Job> {
        if self.killed.load(Ordering::Relaxed) {
            return None;
        }
        let mut cursor = self.cursor.lock().expect("dispatch cursor poisoned");
        if cursor.next_rank > self.last_start {
            return None;
        }

        let start = cursor.next_rank;
        let mut end = start + self.per_partition;
        if start == self.last_start {
            end += self.remainder;
        }
        cursor.next_rank = end;

        let sequence = cursor.sequence;
        cursor.sequence += 1;
        let sink = self.make_sink(&mut cursor, sequence);

        Some(Job {
            start,
            end: end - 1,
            sink,
        })
    }

    /// Allocate a temp-file sink next to the configured output, or the null
    /// sink when no output is configured. A temp file that cannot be created
    /// degrades that partition to counting only.
    fn make_sink(&self, cursor: &mut Cursor, sequence: u64) -> OutputSink {
        let Some(output) = &self.config.output else {
            return OutputSink::Null;
        };
        let name = output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "codes".to_owned());
        let path = output.with_file_name(format!("{}.{}.{:04}.part", name, std::process::id(), sequence));
        match OutputSink::create(path.clone(), Arc::clone(&self.progress)) {
            Ok(sink) => {
                cursor.temp_files.push(path);
                sink
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "temp file creation failed; partition will only be counted");
                OutputSink::Null
            }
        }
    }

    /// Request cancellation. Cooperative: already-assigned ranges run to
    /// completion and write what they produced; no further ranges are
    /// assigned once the flag is observed.
    pub fn kill(&self) {
        self.killed.store(true, Ordering::Relaxed);
    }

    pub fn is_killed(&self) -> bool {
        self.killed.load(Ordering::Relaxed)
    }

    /// Sum one counter across all workers. A point-in-time snapshot, only
    /// authoritative after the workers have been joined.
    fn sum(&self, counter: Counters) -> u64 {
        stats::sum(self.worker_stats.iter().map(Arc::as_ref), counter)
    }

    pub fn generated_total(&self) -> u64 {
        self.sum(Counters::Generated)
    }

    pub fn circular_total(&self) -> u64 {
        self.sum(Counters::Circular)
    }

    pub fn maximal_total(&self) -> u64 {
        self.sum(Counters::Maximal)
    }

    pub fn processed_total(&self) -> u64 {
        self.sum(Counters::Processed)
    }

    /// Run the whole search on the calling thread: spawn the workers, poll
    /// progress until the space is consumed or the run is cancelled, join,
    /// merge the per-range files, and return the final snapshot.
    pub fn launch(&self) -> RunSummary {
        let started = Instant::now();
        info!(
            length = self.config.length,
            partitions = self.config.partitions,
            workers = self.config.workers,
            total = self.total,
            "starting search"
        );

        std::thread::scope(|scope| {
            for stats in &self.worker_stats {
                let stats = Arc::clone(stats);
                scope.spawn(move || worker::run(self, &stats));
            }

            // Supervise: poll until every rank is accounted for or the run
            // is cancelled. Workers finish their in-flight ranges on their
            // own; the scope joins them.
            while !self.is_killed() && self.processed_total() != self.total {
                let fraction = self.processed_total() as f32 / self.total as f32;
                (self.progress)("Computing...", fraction);
                std::thread::sleep(self.config.poll_interval);
            }
        });

        // All workers joined: every temp file is flushed, sorted and closed.
        self.merge_files();

        if !self.is_killed() {
            (self.progress)("Done", 1.0);
        }

        let summary = RunSummary {
            generated: self.generated_total(),
            circular: self.circular_total(),
            maximal: self.maximal_total(),
            processed: self.processed_total(),
            elapsed: started.elapsed(),
            cancelled: self.is_killed(),
        };
        info!(
            generated = summary.generated,
            circular = summary.circular,
            maximal = summary.maximal,
            cancelled = summary.cancelled,
            "search finished"
        );
        summary
    }

    /// Run [`Dispatcher::launch`] on a supervisor thread and hand the
    /// summary to `finish`.
    pub fn launch_detached<F>(self: Arc<Self>, finish: F) -> std::thread::JoinHandle<()>
    where
        F: FnOnce(RunSummary) + Send + 'static,
    {
        std::thread::spawn(move || {
            let summary = self.launch();
            finish(summary);
        })
    }

    /// Merge the per-range temp files (each already sorted by its sink's
    /// close) into the final output.
    fn merge_files(&self) {
        let Some(output) = &self.config.output else {
            return;
        };
        let temp_files = {
            let mut cursor = self.cursor.lock().expect("dispatch cursor poisoned");
            std::mem::take(&mut cursor.temp_files)
        };
        let expected = self.circular_total();
        if let Err(err) =
            external_sort::merge_sorted_files(temp_files, output, &self.progress, expected)
        {
            warn!(output = %output.display(), %err, "merge failed; temp files kept");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(length: usize, partitions: u64) -> SearchConfig {
        SearchConfig {
            length,
            partitions,
            ..SearchConfig::default()
        }
    }

    fn ranges(dispatcher: &Dispatcher) -> Vec<(u64, u64)> {
        let mut out = Vec::new();
        while let Some(job) = dispatcher.next_job() {
            out.push((job.start, job.end));
        }
        out
    }

    #[test]
    fn test_partitions_tile_the_space() {
        for partitions in [1, 2, 4, 7, 59, 60, 61] {
            let dispatcher = Dispatcher::without_progress(config(1, partitions)).unwrap();
            let total = dispatcher.total();
            let ranges = ranges(&dispatcher);

            let mut expected_start = 0;
            for (start, end) in &ranges {
                assert_eq!(*start, expected_start, "gap or overlap at {}", start);
                assert!(end >= start);
                expected_start = end + 1;
            }
            assert_eq!(expected_start, total, "ranges must cover [0, total)");
        }
    }

    #[test]
    fn test_last_partition_absorbs_remainder() {
        let dispatcher = Dispatcher::without_progress(config(3, 7)).unwrap();
        let total = dispatcher.total(); // 30 780
        let per = total / 7;
        let ranges = ranges(&dispatcher);
        assert_eq!(ranges.len(), 7);
        for (start, end) in &ranges[..6] {
            assert_eq!(end - start + 1, per);
        }
        let (start, end) = ranges[6];
        assert_eq!(end - start + 1, per + total % 7);
        assert_eq!(end, total - 1);
    }

    #[test]
    fn test_more_partitions_than_ranks() {
        // total(1) = 60; with per_partition = 0 the single job absorbs
        // everything.
        let dispatcher = Dispatcher::without_progress(config(1, 100)).unwrap();
        let ranges = ranges(&dispatcher);
        assert_eq!(*ranges.last().unwrap(), (ranges[0].0, 59));
        let covered: u64 = ranges.iter().map(|(s, e)| e - s + 1).sum();
        assert_eq!(covered, 60);
    }

    #[test]
    fn test_kill_stops_assignment() {
        let dispatcher = Dispatcher::without_progress(config(3, 10)).unwrap();
        assert!(dispatcher.next_job().is_some());
        dispatcher.kill();
        assert!(dispatcher.next_job().is_none());
    }

    #[test]
    fn test_config_validation() {
        assert!(matches!(
            Dispatcher::without_progress(config(0, 1)),
            Err(SearchError::InvalidLength(0))
        ));
        assert!(matches!(
            Dispatcher::without_progress(config(21, 1)),
            Err(SearchError::InvalidLength(21))
        ));
        assert!(matches!(
            Dispatcher::without_progress(config(2, 0)),
            Err(SearchError::NoPartitions)
        ));
        let mut bad_workers = config(2, 1);
        bad_workers.workers = 0;
        assert!(matches!(
            Dispatcher::without_progress(bad_workers),
            Err(SearchError::NoWorkers)
        ));
    }
}
