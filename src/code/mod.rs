// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Candidate-code state.
//!
//! A [`CodeState`] is a stack of symbols representing one candidate code,
//! kept in lock-step with two multisets used for O(1) membership tests:
//!
//! - `items`: how many stacked symbols carry each 6-bit word,
//! - `prefixes`: how many stacked symbols carry each two-letter prefix,
//!
//! plus the virtual-overlap matrix used by the necklace tests (see
//! [`circularity`]). The stack holds one slot more than the target length so
//! the maximality test can tentatively push a 21st-class candidate.
//!
//! The enumeration order guarantees strictly increasing classes from bottom
//! to top of the stack; `CodeState` relies on this but does not enforce it.
//!
//! One `CodeState` is owned per worker and reused across ranges; it is never
//! shared between threads.

pub mod circularity;
pub mod unrank;

pub use unrank::{binomial, total_codes};

use crate::alphabet::{Symbol, Word, NCLASSES, NWORDS, PREFIX_SLOTS};

/// Mutable stack of symbols with incremental membership structures.
#[derive(Debug)]
pub struct CodeState {
    /// Stacked symbols, bottom first. Capacity `target + 1`.
    stack: Vec<Symbol>,
    /// Count of stacked symbols per 6-bit word.
    items: [u8; NWORDS],
    /// Count of stacked symbols per two-letter prefix.
    prefixes: [u8; PREFIX_SLOTS],
    /// Virtual-overlap words, row-major `(target + 1)` square:
    /// `matrix[i][j] = suffix(stack[i]) ++ first_letter(stack[j])`.
    matrix: Vec<Word>,
    /// Target code length L.
    target: usize,
}

impl CodeState {
    /// Create an empty state for codes of length `target`.
    ///
    /// # Panics
    ///
    /// Panics if `target` is not in `1..=NCLASSES`.
    pub fn new(target: usize) -> Self {
        assert!(
            (1..=NCLASSES as usize).contains(&target),
            "code length out of range: {}",
            target
        );
        let stride = target + 1;
        Self {
            stack: Vec::with_capacity(stride),
            items: [0; NWORDS],
            prefixes: [0; PREFIX_SLOTS],
            matrix: vec![0; stride * stride],
            target,
        }
    }

    /// Number of symbols currently stacked.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Target code length L.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Symbol at stack position `idx` (0 = bottom).
    pub fn item(&self, idx: usize) -> Symbol {
        self.stack[idx]
    }

    /// Topmost symbol.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    pub fn top(&self) -> Symbol {
        *self.stack.last().expect("top of empty code stack")
    }

    /// Push a symbol, updating both multisets.
    pub fn push(&mut self, symbol: Symbol) {
        debug_assert!(self.stack.len() <= self.target, "code stack overfull");
        self.stack.push(symbol);
        self.items[symbol.word() as usize] += 1;
        self.prefixes[symbol.prefix() as usize] += 1;
    }

    /// Pop the top symbol, updating both multisets.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty; popping an empty state is a programming
    /// error in the enumeration logic.
    pub fn pop(&mut self) -> Symbol {
        let symbol = self.stack.pop().expect("pop on empty code stack");
        self.items[symbol.word() as usize] -= 1;
        self.prefixes[symbol.prefix() as usize] -= 1;
        symbol
    }

    /// Pop the top symbol, then keep popping while the popped symbol was the
    /// last permutation of the last class still reachable at its depth and
    /// the stack is non-empty. Returns the last symbol popped.
    ///
    /// This advances the backtracking cursor past an exhausted subtree in one
    /// call.
    pub fn full_pop(&mut self) -> Symbol {
        let mut end_class = NCLASSES;
        loop {
            let last = self.pop();
            end_class -= 1;
            if !(last.class() == end_class && last.permutation() == 2 && !self.is_empty()) {
                return last;
            }
        }
    }

    /// Empty the stack and reset both multisets. The matrix needs no reset:
    /// rows are rebuilt on push before they are ever read.
    pub fn clear(&mut self) {
        self.stack.clear();
        self.items = [0; NWORDS];
        self.prefixes = [0; PREFIX_SLOTS];
    }

    /// Is any stacked symbol's word equal to `word`?
    pub fn has(&self, word: Word) -> bool {
        self.items[word as usize] != 0
    }

    /// Does any stacked symbol start with the two-letter prefix `prefix`?
    pub fn has_prefix(&self, prefix: u8) -> bool {
        self.prefixes[prefix as usize] != 0
    }

    /// Is `class` already used by a stacked symbol?
    pub fn has_class(&self, class: u8) -> bool {
        self.stack.iter().any(|s| s.class() == class)
    }

    /// Positionwise (class, permutation) comparison against `other`, up to
    /// the shorter of the two lengths. Ties compare as lower-or-equal.
    ///
    /// Used as the inclusive "still within the upper bound" test during
    /// range enumeration.
    pub fn lower_equal(&self, other: &CodeState) -> bool {
        for (a, b) in self.stack.iter().zip(other.stack.iter()) {
            if a < b {
                return true;
            }
            if b < a {
                return false;
            }
        }
        true
    }

    /// Matrix cell `(row, col)`.
    pub(crate) fn overlap(&self, row: usize, col: usize) -> Word {
        self.matrix[row * (self.target + 1) + col]
    }

    pub(crate) fn set_overlap(&mut self, row: usize, col: usize, word: Word) {
        self.matrix[row * (self.target + 1) + col] = word;
    }

    /// Serialize the code: symbols sorted ascending by raw word, printed as
    /// space-separated 3-letter tokens. This is the output line format, and
    /// the order the merged output file is globally sorted by.
    pub fn to_line(&self) -> String {
        let mut words: Vec<Word> = self.stack.iter().map(|s| s.word()).collect();
        words.sort_unstable();
        let mut line = String::with_capacity(words.len() * 4);
        for (i, word) in words.iter().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            for b in crate::alphabet::word_letters(*word) {
                line.push(b as char);
            }
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_multisets() {
        let mut code = CodeState::new(4);
        let s = Symbol::at(4, 0); // ACG
        code.push(s);
        assert!(code.has(s.word()));
        assert!(code.has_prefix(s.prefix()));
        assert!(code.has_class(4));
        assert_eq!(code.pop(), s);
        assert!(!code.has(s.word()));
        assert!(!code.has_prefix(s.prefix()));
        assert!(code.is_empty());
    }

    #[test]
    #[should_panic(expected = "pop on empty code stack")]
    fn test_pop_underflow() {
        let mut code = CodeState::new(2);
        code.pop();
    }

    #[test]
    fn test_full_pop_single() {
        // Top symbol not at the terminal (class, permutation): one pop only.
        let mut code = CodeState::new(3);
        code.push(Symbol::at(3, 1));
        code.push(Symbol::at(7, 0));
        assert_eq!(code.full_pop(), Symbol::at(7, 0));
        assert_eq!(code.len(), 1);
    }

    #[test]
    fn test_full_pop_cascade() {
        // A run of last-class/last-permutation symbols pops in one call.
        let mut code = CodeState::new(4);
        code.push(Symbol::at(2, 0));
        code.push(Symbol::at(17, 1));
        code.push(Symbol::at(18, 2));
        code.push(Symbol::at(19, 2));
        // 19/2 and 18/2 are both terminal for their depth; 17/1 is not, so
        // the cascade stops there.
        assert_eq!(code.full_pop(), Symbol::at(17, 1));
        assert_eq!(code.len(), 1);
    }

    #[test]
    fn test_lower_equal() {
        let mut a = CodeState::new(3);
        let mut b = CodeState::new(3);
        a.push(Symbol::at(0, 0));
        b.push(Symbol::at(0, 1));
        assert!(a.lower_equal(&b));
        assert!(!b.lower_equal(&a));

        // Equal prefixes of different length tie as lower-or-equal.
        a.push(Symbol::at(5, 2));
        let mut c = CodeState::new(3);
        c.push(Symbol::at(0, 0));
        assert!(a.lower_equal(&c));
        assert!(c.lower_equal(&a));
    }

    #[test]
    fn test_to_line_sorts_by_raw_word() {
        let mut code = CodeState::new(2);
        // GAC sits in a lower class than CCG but sorts after it by raw word.
        code.push(Symbol::at(4, 2)); // GAC
        code.push(Symbol::at(12, 0)); // CCG
        assert_eq!(code.to_line(), "CCG GAC");
    }
}
