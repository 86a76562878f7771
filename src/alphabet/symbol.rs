// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Bit-packed trinucleotide symbols.
//!
//! A [`Symbol`] packs into 13 bits:
//!
//! ```text
//! bits 8..13   class id      (0..20)
//! bits 6..8    permutation   (0..3)
//! bits 0..6    word          (3 letters, 2 bits each, letter 1 highest)
//! ```
//!
//! Letters are A=0, C=1, G=2, T=3. The two-letter *prefix* is letters 1-2
//! (bits 2..6), the *suffix* is letters 2-3 (bits 0..4). Because the class
//! occupies the highest bits, the derived ordering on the packed value is the
//! canonical (class, permutation) enumeration order.

use std::fmt;

/// Number of equivalence classes in the table.
pub const NCLASSES: u8 = 20;

/// Number of cyclic permutations per class.
pub const NPERMUTATIONS: u8 = 3;

/// Size of the raw word space (3 letters of 2 bits each).
pub const NWORDS: usize = 64;

/// Size of the two-letter prefix space.
pub const PREFIX_SLOTS: usize = 16;

const MASK_WORD: u16 = 0x3F;
const MASK_LETTER1: u16 = 0x30;
const MASK_LETTER3: u16 = 0x03;
const MASK_PREFIX: u16 = 0x3C; // letters 1-2
const MASK_SUFFIX: u16 = 0x0F; // letters 2-3
const MASK_PERMUTATION: u16 = 0xC0;
const MASK_CLASS: u16 = 0x1F00;

const LETTERS: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// A raw 6-bit trinucleotide word (letters only, no class/permutation tag).
///
/// Used for the membership multiset and the virtual-overlap matrix, where
/// only the letters matter.
pub type Word = u8;

/// One of the 60 compound alphabet symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u16);

impl Symbol {
    /// Assemble a symbol from its raw word, class and permutation.
    pub(crate) const fn from_parts(word: u16, class: u16, permutation: u16) -> Self {
        Symbol((class << 8) | (permutation << 6) | (word & MASK_WORD))
    }

    /// The 6-bit letters-only word.
    pub fn word(self) -> Word {
        (self.0 & MASK_WORD) as Word
    }

    /// The equivalence class id, in `0..NCLASSES`.
    pub fn class(self) -> u8 {
        ((self.0 & MASK_CLASS) >> 8) as u8
    }

    /// The cyclic permutation id, in `0..NPERMUTATIONS`.
    pub fn permutation(self) -> u8 {
        ((self.0 & MASK_PERMUTATION) >> 6) as u8
    }

    /// First letter (2 bits).
    pub fn first_letter(self) -> u8 {
        ((self.0 & MASK_LETTER1) >> 4) as u8
    }

    /// Two-letter prefix (letters 1-2, 4 bits).
    pub fn prefix(self) -> u8 {
        ((self.0 & MASK_PREFIX) >> 2) as u8
    }

    /// Two-letter suffix (letters 2-3, 4 bits).
    pub fn suffix(self) -> u8 {
        (self.0 & MASK_SUFFIX) as u8
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters = word_letters(self.word());
        for b in letters {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

/// Rotate a base word L1L2L3 to L2L3L1 (permutation 1).
pub(crate) const fn rotate_once(word: u16) -> u16 {
    ((word & MASK_SUFFIX) << 2) | ((word & MASK_LETTER1) >> 4)
}

/// Rotate a base word L1L2L3 to L3L1L2 (permutation 2).
pub(crate) const fn rotate_twice(word: u16) -> u16 {
    ((word & MASK_PREFIX) >> 2) | ((word & MASK_LETTER3) << 4)
}

/// Pack 3 ASCII letters into a 6-bit word.
pub(crate) const fn pack_word(letters: &[u8; 3]) -> u16 {
    let mut word = 0u16;
    let mut i = 0;
    while i < 3 {
        let bits = match letters[i] {
            b'A' => 0,
            b'C' => 1,
            b'G' => 2,
            b'T' => 3,
            _ => panic!("letter must be one of A, C, G, T"),
        };
        word = (word << 2) | bits;
        i += 1;
    }
    word
}

/// Decode a 6-bit word into its 3 ASCII letters.
pub fn word_letters(word: Word) -> [u8; 3] {
    [
        LETTERS[((word >> 4) & 3) as usize],
        LETTERS[((word >> 2) & 3) as usize],
        LETTERS[(word & 3) as usize],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_and_decode() {
        let w = pack_word(b"ACG");
        assert_eq!(w, 0b00_01_10);
        assert_eq!(word_letters(w as Word), *b"ACG");
    }

    #[test]
    fn test_field_extraction() {
        // CGT = 01 10 11, class 7, permutation 2
        let s = Symbol::from_parts(pack_word(b"CGT"), 7, 2);
        assert_eq!(s.word(), 0b01_10_11);
        assert_eq!(s.class(), 7);
        assert_eq!(s.permutation(), 2);
        assert_eq!(s.first_letter(), 0b01);
        assert_eq!(s.prefix(), 0b01_10);
        assert_eq!(s.suffix(), 0b10_11);
        assert_eq!(s.to_string(), "CGT");
    }

    #[test]
    fn test_rotations() {
        let w = pack_word(b"ACG");
        assert_eq!(word_letters(rotate_once(w) as Word), *b"CGA");
        assert_eq!(word_letters(rotate_twice(w) as Word), *b"GAC");
    }

    #[test]
    fn test_ordering_is_class_then_permutation() {
        let a = Symbol::from_parts(pack_word(b"GTT"), 3, 2);
        let b = Symbol::from_parts(pack_word(b"AAC"), 4, 0);
        let c = Symbol::from_parts(pack_word(b"AAC"), 4, 1);
        assert!(a < b);
        assert!(b < c);
    }
}
