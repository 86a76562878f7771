// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error taxonomy.
//!
//! Only two conditions surface as errors: a rejected configuration and I/O
//! failures in the sort/merge machinery. A pop on an empty code stack is a
//! programming error and panics; cancellation is a summary flag, not an
//! error. Per-partition write failures do not surface at all — the affected
//! sink logs once and degrades to discarding, keeping partial results useful.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("code length {0} out of range 1..=20")]
    InvalidLength(usize),

    #[error("partition count must be at least 1")]
    NoPartitions,

    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}
