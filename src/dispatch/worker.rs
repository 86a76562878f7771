// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The worker task.
//!
//! A worker is a plain function run on one OS thread. It owns one
//! [`Counter`] (and through it the two reusable [`CodeState`]s) and pulls
//! ranges from the dispatcher until none remain. Nothing but the job cursor
//! and the worker's own counter block is shared.
//!
//! [`CodeState`]: crate::code::CodeState

use super::Dispatcher;
use crate::counter::Counter;
use crate::stats::{Counters, SearchStats};
use tracing::debug;

/// Pull ranges and enumerate them until the dispatcher runs dry.
pub(super) fn run(dispatcher: &Dispatcher, stats: &SearchStats) {
    let mut counter = Counter::new(dispatcher.length());
    while let Some(job) = dispatcher.next_job() {
        let size = job.end - job.start + 1;
        debug!(start = job.start, end = job.end, "range assigned");
        let outcome = counter.count(
            job.start,
            job.end,
            job.sink,
            dispatcher.counting_maximal(),
            stats,
        );
        // Mid-range the processed counter advanced once per visited leaf;
        // pruned leaves never tick, so settle the difference now that the
        // whole range is consumed.
        stats.add(Counters::Processed, size - outcome.generated);
    }
}
