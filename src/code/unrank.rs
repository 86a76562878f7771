// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Unranking: building the code at a given enumeration index directly.
//!
//! Codes of length L are enumerated with strictly increasing classes and one
//! of 3 permutations per position, so the search space has
//! `C(20, L) * 3^L` entries. [`CodeState::make_at`] inverts that order: it
//! resolves the class of each position by subtracting block sizes
//! `C(19 - class, remaining) * 3^(remaining + 1)` and the permutation by
//! dividing out the per-permutation quantity. This is what lets a worker
//! start at an arbitrary rank without generating any predecessor.
//!
//! All quantities fit u64 exactly: for L ≤ 20 the largest total is
//! `C(20, 15) * 3^15 ≈ 2.2e11`, far below 2^64.

use super::CodeState;
use crate::alphabet::{Symbol, NCLASSES};

/// Binomial coefficient C(n, k), computed with the exact
/// multiply-then-divide loop (each prefix product is divisible by `i + 1`).
pub fn binomial(k: u64, n: u64) -> u64 {
    let mut result: u64 = 1;
    let mut i = 0;
    while i < k {
        result = result * (n - i) / (i + 1);
        i += 1;
    }
    result
}

/// Size of the whole search space for codes of length `length`:
/// `C(20, length) * 3^length`.
///
/// # Panics
///
/// Panics if `length` is not in `1..=20`.
pub fn total_codes(length: usize) -> u64 {
    assert!(
        (1..=NCLASSES as usize).contains(&length),
        "code length out of range: {}",
        length
    );
    binomial(length as u64, NCLASSES as u64) * 3u64.pow(length as u32)
}

impl CodeState {
    /// Rebuild this state as the code at position `rank` of the canonical
    /// enumeration order, clearing any previous content. The overlap matrix
    /// is built alongside, so the state is immediately ready for the
    /// necklace tests.
    ///
    /// # Panics
    ///
    /// Panics (in debug builds) if `rank >= total_codes(target)`; callers
    /// derive ranks from partition arithmetic over the same total.
    pub fn make_at(&mut self, rank: u64) {
        debug_assert!(rank < total_codes(self.target()), "rank out of range");

        self.clear();

        let length = self.target() as u64;
        let mut rank = rank;
        let mut class: u64 = 0;
        // 3^(remaining symbols incl. the one being placed).
        let mut coefficient = 3u64.pow(length as u32);

        for step in 1..=length {
            // Walk classes upward until the remaining block contains `rank`.
            // With `class` at the current position, the block holds
            // C(19 - class, length - step) completions times `coefficient`
            // permutation choices.
            let mut cases = binomial(length - step, 19 - class) * coefficient;
            while cases <= rank {
                class += 1;
                rank -= cases;
                cases = binomial(length - step, 19 - class) * coefficient;
            }

            // Within the class, the 3 permutations split the block evenly.
            cases /= 3;
            let permutation = rank / cases;
            self.push(Symbol::at(class as u8, permutation as u8));
            self.build_matrix();

            rank -= permutation * cases;
            class += 1;
            coefficient /= 3;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(0, 20), 1);
        assert_eq!(binomial(1, 20), 20);
        assert_eq!(binomial(3, 20), 1140);
        assert_eq!(binomial(20, 20), 1);
        assert_eq!(binomial(10, 19), 92378);
    }

    #[test]
    fn test_total_codes() {
        assert_eq!(total_codes(1), 60);
        assert_eq!(total_codes(3), 1140 * 27);
        assert_eq!(total_codes(20), 3u64.pow(20));
    }

    #[test]
    fn test_make_at_first_and_last() {
        let mut code = CodeState::new(3);
        code.make_at(0);
        assert_eq!(code.item(0), Symbol::at(0, 0));
        assert_eq!(code.item(1), Symbol::at(1, 0));
        assert_eq!(code.item(2), Symbol::at(2, 0));

        code.make_at(total_codes(3) - 1);
        assert_eq!(code.item(0), Symbol::at(17, 2));
        assert_eq!(code.item(1), Symbol::at(18, 2));
        assert_eq!(code.item(2), Symbol::at(19, 2));
    }

    #[test]
    fn test_make_at_length_one_walks_table() {
        let mut code = CodeState::new(1);
        for rank in 0..60u64 {
            code.make_at(rank);
            let s = code.item(0);
            assert_eq!(s.class() as u64, rank / 3);
            assert_eq!(s.permutation() as u64, rank % 3);
        }
    }

    /// All codes of the given length in canonical order, by plain recursion.
    fn sequential(length: usize) -> Vec<Vec<Symbol>> {
        fn recurse(
            prefix: &mut Vec<Symbol>,
            length: usize,
            first_class: u8,
            all: &mut Vec<Vec<Symbol>>,
        ) {
            if prefix.len() == length {
                all.push(prefix.clone());
                return;
            }
            let remaining = (length - prefix.len() - 1) as u8;
            for class in first_class..=(19 - remaining) {
                for permutation in 0..3 {
                    prefix.push(Symbol::at(class, permutation));
                    recurse(prefix, length, class + 1, all);
                    prefix.pop();
                }
            }
        }
        let mut all = Vec::new();
        recurse(&mut Vec::new(), length, 0, &mut all);
        all
    }

    #[test]
    fn test_make_at_matches_sequential_enumeration() {
        for length in [2usize, 3] {
            let all = sequential(length);
            assert_eq!(all.len() as u64, total_codes(length));

            let mut code = CodeState::new(length);
            for (rank, expected) in all.iter().enumerate() {
                code.make_at(rank as u64);
                let actual: Vec<Symbol> = (0..code.len()).map(|i| code.item(i)).collect();
                assert_eq!(&actual, expected, "disagreement at rank {}", rank);
            }
        }
    }

    #[test]
    fn test_make_at_classes_strictly_increase() {
        let mut code = CodeState::new(5);
        for rank in [0, 1, 977, 40_000, total_codes(5) - 1] {
            code.make_at(rank);
            for i in 1..code.len() {
                assert!(code.item(i - 1).class() < code.item(i).class());
            }
        }
    }
}
