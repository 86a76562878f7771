// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Progress and completion reporting.
//!
//! The core is agnostic to what receives its reports: a terminal, a test
//! harness, or nothing. Callers inject plain function values at dispatcher
//! construction; reports must not block meaningfully.

use std::sync::Arc;
use std::time::Duration;

/// Progress callback: `(subject, fraction in 0.0..=1.0)`.
///
/// Subjects emitted by the core: `"Computing..."` during enumeration,
/// `"Sorting files..."` / `"Merging files..."` / `"Closing files..."` during
/// the sort and merge phases, `"Done"` on completion.
pub type ProgressFn = Arc<dyn Fn(&str, f32) + Send + Sync>;

/// A progress callback that discards every report.
pub fn null_progress() -> ProgressFn {
    Arc::new(|_, _| {})
}

/// Final snapshot handed to the completion callback after all workers have
/// been joined and the merge has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Full-length candidates visited.
    pub generated: u64,
    /// Circular codes found.
    pub circular: u64,
    /// Maximal circular codes found (0 unless maximality was requested).
    pub maximal: u64,
    /// Enumeration indexes consumed.
    pub processed: u64,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
    /// True when the run was cancelled before consuming the whole space.
    pub cancelled: bool,
}
