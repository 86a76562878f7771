// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Parallel search for circular trinucleotide codes.
//!
//! A *circular code* is a set of trinucleotides over {A, C, G, T} whose
//! concatenations decompose unambiguously on a circle: no cyclic
//! arrangement of 3, 4 or 5 of its words reads as a different sequence of
//! table words when shifted by one or two letters. This crate enumerates all
//! codes of a fixed length L built from the classical 20-class table (20
//! equivalence classes of 3 cyclic permutations each), counts the circular
//! and optionally the maximal circular ones, and can persist them sorted to
//! a file.
//!
//! # Architecture
//!
//! The search space has `C(20, L) * 3^L` candidates, enumerated with
//! strictly increasing classes. Three mechanisms keep this tractable:
//!
//! - **Unranking** ([`code::unrank`]): any candidate is built directly from
//!   its enumeration index, so a worker starts mid-space without generating
//!   predecessors.
//! - **Incremental pruning** ([`code::circularity`]): a per-push 3-necklace
//!   test over an incrementally built overlap matrix rejects dead prefixes
//!   before their subtrees are expanded.
//! - **Pull dispatching** ([`dispatch`]): the index space is split into N
//!   contiguous ranges handed out on demand to a fixed pool of worker
//!   threads, each owning its own [`code::CodeState`]/[`counter::Counter`]
//!   pair. Per-range results are buffered to temp files, sorted on close,
//!   and k-way merged ([`output::external_sort`]) into one globally sorted
//!   output without holding the result set in memory.
//!
//! # Example
//!
//! ```
//! use circular_codes::dispatch::{Dispatcher, SearchConfig};
//! use std::time::Duration;
//!
//! let config = SearchConfig {
//!     length: 2,
//!     partitions: 4,
//!     workers: 2,
//!     poll_interval: Duration::from_millis(10),
//!     ..SearchConfig::default()
//! };
//! let dispatcher = Dispatcher::without_progress(config).unwrap();
//! let summary = dispatcher.launch();
//! assert_eq!(summary.generated, 1710);
//! assert_eq!(summary.circular, 1704);
//! ```

pub mod alphabet;
pub mod code;
pub mod counter;
pub mod dispatch;
pub mod error;
pub mod output;
pub mod report;
pub mod stats;

// Re-export commonly used types
pub use alphabet::Symbol;
pub use code::CodeState;
pub use dispatch::{Dispatcher, SearchConfig};
pub use error::SearchError;
pub use report::{ProgressFn, RunSummary};
