// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Per-worker search statistics.
//!
//! Each worker owns one [`SearchStats`] block and ticks it as it enumerates;
//! the dispatcher polls and sums the blocks for progress reporting. Slots are
//! relaxed atomics: polled values are eventually-consistent snapshots, and
//! only authoritative after the workers have been joined.

use std::sync::atomic::{AtomicU64, Ordering};
use strum::EnumCount;
use strum_macros::EnumCount as EnumCountMacro;

/// The counters a worker maintains.
#[derive(EnumCountMacro, Copy, Clone, Debug)]
#[repr(usize)]
pub enum Counters {
    /// Full-length candidates visited.
    Generated,
    /// Candidates that passed the circularity test.
    Circular,
    /// Candidates that additionally passed the maximality test.
    Maximal,
    /// Enumeration indexes consumed (drives the progress fraction).
    /// Approximated by the generated count mid-range; topped up to the exact
    /// range size when a range completes, since pruning skips some indexes.
    Processed,
}

/// One block of atomic counters.
#[derive(Debug, Default)]
pub struct SearchStats {
    slots: [AtomicU64; Counters::COUNT],
}

impl SearchStats {
    pub fn new() -> Self {
        SearchStats::default()
    }

    /// Increment a counter by 1.
    pub fn tick(&self, counter: Counters) {
        self.slots[counter as usize].fetch_add(1, Ordering::Relaxed);
    }

    /// Increment a counter by `n`.
    pub fn add(&self, counter: Counters, n: u64) {
        self.slots[counter as usize].fetch_add(n, Ordering::Relaxed);
    }

    /// Current value of a counter.
    pub fn get(&self, counter: Counters) -> u64 {
        self.slots[counter as usize].load(Ordering::Relaxed)
    }
}

/// Sum one counter across a set of worker blocks.
pub fn sum<'a, I>(blocks: I, counter: Counters) -> u64
where
    I: IntoIterator<Item = &'a SearchStats>,
{
    blocks.into_iter().map(|b| b.get(counter)).sum()
}
