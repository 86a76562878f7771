// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Necklace tests over the virtual-overlap matrix.
//!
//! A code fails circularity when some cyclic arrangement of 3, 4 or 5 of its
//! symbols' letters admits a second decomposition into code symbols — a
//! *necklace*. The tests work on virtual overlap words: `matrix[i][j]` is the
//! trinucleotide formed by the suffix of `stack[i]` followed by the first
//! letter of `stack[j]`. A k-necklace exists exactly when a cycle
//! `i1 → i2 → … → ik → i1` has every overlap word present in the code.
//!
//! During generation only the 3-necklace test runs per push (the incremental
//! prune); the full 3/4/5 test runs once per completed candidate.

use super::CodeState;
use crate::alphabet::Symbol;

impl CodeState {
    /// Fill row and column of the top symbol with its virtual overlap words.
    ///
    /// Must be called once per push before any necklace test; rows below the
    /// top were filled when their symbols were pushed and stay valid because
    /// the stack below the top never changes.
    pub fn build_matrix(&mut self) {
        let index = self.len() - 1;
        let top = self.top();
        // New column: suffix of each earlier symbol, first letter of top.
        let top_first = top.first_letter();
        // New row: suffix of top, first letter of each earlier symbol.
        let top_suffix = top.suffix();
        for idx in 0..index {
            let earlier = self.item(idx);
            self.set_overlap(idx, index, (earlier.suffix() << 2) | top_first);
            self.set_overlap(index, idx, (top_suffix << 2) | earlier.first_letter());
        }
    }

    /// Build the top row/column, then run the incremental 3-necklace test.
    ///
    /// Returns false when a 3-necklace exists among the stacked symbols; the
    /// enumeration prunes the whole subtree under the current prefix.
    pub fn check_and_build_matrix(&mut self) -> bool {
        self.build_matrix();

        let index = self.len() - 1;
        for i1 in 0..index {
            if !self.has_prefix(self.item(i1).suffix()) {
                continue;
            }
            for i2 in (i1 + 1)..=index {
                if self.has(self.overlap(i1, i2)) && self.has(self.overlap(i2, i1)) {
                    return false;
                }
            }
        }
        true
    }

    /// Authoritative circularity test: no 3-, 4- or 5-necklace across the
    /// whole code. Rebuilds the top row first, so it is safe to call on a
    /// just-completed candidate whose last push skipped the incremental test.
    ///
    /// Diagonal cells are never written, but a zero word (AAA) is not in the
    /// table, so `has` rejects them without a special case.
    pub fn is_circular(&mut self) -> bool {
        self.build_matrix();

        let index = self.len() - 1;
        // The outermost symbol can be skipped: any necklace through it is
        // found from a lower anchor first.
        for i1 in 0..index {
            if !self.has_prefix(self.item(i1).suffix()) {
                continue;
            }
            for i2 in (i1 + 1)..=index {
                if !(self.has(self.overlap(i1, i2)) && self.has_prefix(self.item(i2).suffix())) {
                    continue;
                }
                if self.has(self.overlap(i2, i1)) {
                    return false; // 3-necklace
                }
                for i3 in (i1 + 1)..=index {
                    if !(self.has(self.overlap(i2, i3)) && self.has_prefix(self.item(i3).suffix()))
                    {
                        continue;
                    }
                    if self.has(self.overlap(i3, i1)) {
                        return false; // 4-necklace
                    }
                    for i4 in (i1 + 1)..=index {
                        if self.has(self.overlap(i3, i4)) && self.has(self.overlap(i4, i1)) {
                            return false; // 5-necklace
                        }
                    }
                }
            }
        }
        true
    }

    /// Maximality: a circular code is maximal when no symbol from an unused
    /// class keeps it circular. Only meaningful on a code that already passed
    /// [`CodeState::is_circular`].
    ///
    /// Tentatively pushes each candidate into the spare stack slot and
    /// restores the state on every path.
    pub fn is_maximal(&mut self) -> bool {
        for class in 0..crate::alphabet::NCLASSES {
            if self.has_class(class) {
                continue;
            }
            for permutation in 0..crate::alphabet::NPERMUTATIONS {
                self.push(Symbol::at(class, permutation));
                let extends = self.check_and_build_matrix() && self.is_circular();
                self.pop();
                if extends {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Symbol;

    fn push_checked(code: &mut CodeState, class: u8, perm: u8) -> bool {
        code.push(Symbol::at(class, perm));
        code.check_and_build_matrix()
    }

    #[test]
    fn test_overlap_words() {
        let mut code = CodeState::new(3);
        code.push(Symbol::at(4, 0)); // ACG
        code.build_matrix();
        code.push(Symbol::at(9, 0)); // ATC
        code.build_matrix();
        // matrix[0][1] = suffix(ACG) ++ first(ATC) = CGA
        assert_eq!(
            crate::alphabet::word_letters(code.overlap(0, 1)),
            *b"CGA"
        );
        // matrix[1][0] = suffix(ATC) ++ first(ACG) = TCA
        assert_eq!(
            crate::alphabet::word_letters(code.overlap(1, 0)),
            *b"TCA"
        );
    }

    #[test]
    fn test_three_necklace_detected_incrementally() {
        // {ACA, CAC}: ACACAC read with an offset of one letter decomposes as
        // CAC ACA, so the pair is a necklace, caught on the second push.
        let mut code = CodeState::new(2);
        assert!(push_checked(&mut code, 0, 1)); // ACA
        assert!(!push_checked(&mut code, 3, 2)); // CAC
    }

    #[test]
    fn test_single_symbol_is_circular() {
        let mut code = CodeState::new(1);
        code.push(Symbol::at(0, 0));
        assert!(code.is_circular());
    }

    #[test]
    fn test_circular_pair() {
        // AAC and ACC share no necklace.
        let mut code = CodeState::new(2);
        assert!(push_checked(&mut code, 0, 0));
        assert!(push_checked(&mut code, 3, 0));
        assert!(code.is_circular());
    }

    #[test]
    fn test_maximality_restores_state() {
        let mut code = CodeState::new(1);
        code.push(Symbol::at(0, 0));
        code.build_matrix();
        assert!(code.is_circular());
        let line_before = code.to_line();
        // A length-1 code always extends (e.g. by a symbol of another
        // class), so it is never maximal.
        assert!(!code.is_maximal());
        assert_eq!(code.len(), 1);
        assert_eq!(code.to_line(), line_before);
    }
}
