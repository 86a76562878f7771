// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Range enumeration and classification.
//!
//! A [`Counter`] owns two [`CodeState`]s — the moving candidate and the
//! range's upper bound — and drives backtracking enumeration over one
//! inclusive rank range. Every full-length candidate is classified
//! (generated / circular / maximal) and accepted codes are forwarded to the
//! range's sink. The counter is single-threaded; each worker owns one and
//! reuses it across ranges.

use crate::code::CodeState;
use crate::output::OutputSink;
use crate::stats::{Counters, SearchStats};

/// Range-local classification counts returned by one `count` call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CountOutcome {
    pub generated: u64,
    pub circular: u64,
    pub maximal: u64,
}

pub struct Counter {
    /// The moving candidate, rebuilt at the range start by unranking.
    code: CodeState,
    /// The code at the range's inclusive end.
    upper: CodeState,
    /// Target code length L.
    length: usize,
    /// `21 - L`: a symbol of class `c` can still grow into a full-length
    /// code exactly when `c < 21 - L + current_length`, because the classes
    /// above it must accommodate the remaining positions.
    base_class: usize,
}

impl Counter {
    pub fn new(length: usize) -> Self {
        Self {
            code: CodeState::new(length),
            upper: CodeState::new(length),
            length,
            base_class: 21 - length,
        }
    }

    /// Enumerate ranks `start..=end`, classify each full-length candidate,
    /// write accepted codes to `sink`, and close the sink (triggering its
    /// in-place sort).
    ///
    /// The returned counts cover this call only. `live` is ticked as the
    /// enumeration proceeds so the dispatcher can poll progress mid-range.
    pub fn count(
        &mut self,
        start: u64,
        end: u64,
        mut sink: OutputSink,
        count_maximal: bool,
        live: &SearchStats,
    ) -> CountOutcome {
        self.upper.make_at(end);
        self.code.make_at(start);

        let mut outcome = CountOutcome::default();

        loop {
            // Classify the current candidate if it reached full length;
            // pruned prefixes fall through to the advance step.
            if self.code.len() == self.length {
                outcome.generated += 1;
                live.tick(Counters::Generated);
                live.tick(Counters::Processed);
                if self.code.is_circular() {
                    outcome.circular += 1;
                    live.tick(Counters::Circular);
                    if !count_maximal {
                        sink.write_code(&self.code);
                    } else if self.code.is_maximal() {
                        outcome.maximal += 1;
                        live.tick(Counters::Maximal);
                        sink.write_code(&self.code);
                    }
                }
            }

            // Advance to the next reachable leaf: retreat past the exhausted
            // subtree, step to the table successor, then extend greedily
            // while the incremental necklace test allows.
            let last = self.code.full_pop();
            if let Some(mut next) = last.next() {
                if (next.class() as usize) < self.base_class + self.code.len() {
                    loop {
                        self.code.push(next);
                        if self.code.len() == self.length || !self.code.check_and_build_matrix() {
                            break;
                        }
                        match next.next_class() {
                            Some(symbol) => next = symbol,
                            None => break,
                        }
                    }
                }
            }

            if self.code.is_empty() || !self.code.lower_equal(&self.upper) {
                break;
            }
        }

        sink.close();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::total_codes;

    fn run(length: usize, start: u64, end: u64, count_maximal: bool) -> CountOutcome {
        let stats = SearchStats::new();
        Counter::new(length).count(start, end, OutputSink::Null, count_maximal, &stats)
    }

    #[test]
    fn test_length_one_all_circular() {
        let outcome = run(1, 0, total_codes(1) - 1, false);
        assert_eq!(outcome.generated, 60);
        assert_eq!(outcome.circular, 60);
        assert_eq!(outcome.maximal, 0);
    }

    #[test]
    fn test_pruning_skips_dead_leaves() {
        // The 4 000 ranks in this range contain 48 leaves under pruned
        // prefixes; the incremental necklace test skips them without
        // visiting. Values from the reference implementation.
        let outcome = run(3, 100, 4_099, false);
        assert_eq!(outcome.generated, 3_952);
        assert_eq!(outcome.circular, 3_933);
    }

    #[test]
    fn test_length_three_full_run() {
        // total(3) = 30 780 ranks; pruning skips 129 of them.
        let outcome = run(3, 0, total_codes(3) - 1, false);
        assert_eq!(outcome.generated, 30_651);
        assert_eq!(outcome.circular, 30_432);
    }

    #[test]
    fn test_split_ranges_sum_to_whole() {
        let total = total_codes(2);
        let whole = run(2, 0, total - 1, false);
        let first = run(2, 0, total / 2, false);
        let second = run(2, total / 2 + 1, total - 1, false);
        assert_eq!(whole.generated, total);
        assert_eq!(first.generated + second.generated, whole.generated);
        assert_eq!(first.circular + second.circular, whole.circular);
    }

    #[test]
    fn test_counts_are_range_local() {
        let stats = SearchStats::new();
        let mut counter = Counter::new(2);
        let a = counter.count(0, 499, OutputSink::Null, false, &stats);
        let b = counter.count(0, 499, OutputSink::Null, false, &stats);
        assert_eq!(a, b);
        // The live block accumulates across calls.
        assert_eq!(stats.get(Counters::Generated), a.generated * 2);
    }

    #[test]
    fn test_maximal_no_larger_than_circular() {
        let total = total_codes(2);
        let plain = run(2, 0, total - 1, false);
        let with_max = run(2, 0, total - 1, true);
        assert_eq!(with_max.generated, plain.generated);
        assert_eq!(with_max.circular, plain.circular);
        assert!(with_max.maximal <= with_max.circular);
    }
}
