// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The fixed 20×3 symbol table.
//!
//! Each of the 20 classes is specified by one base triplet (permutation 0);
//! permutations 1 and 2 are its cyclic letter rotations with the same class
//! id. The table is built at compile time and is the only source of
//! [`Symbol`] values.

use super::symbol::{pack_word, rotate_once, rotate_twice, Symbol, NCLASSES, NPERMUTATIONS};

/// Base triplets, one per class, in class order.
const BASES: [&[u8; 3]; NCLASSES as usize] = [
    b"AAC", b"AAG", b"AAT", b"ACC", b"ACG", b"ACT", b"AGC", b"AGG", b"AGT", b"ATC", b"ATG",
    b"ATT", b"CCG", b"CCT", b"CGG", b"CGT", b"CTG", b"CTT", b"GGT", b"GTT",
];

/// The 60-entry table: `TABLE[class][permutation]`.
pub const TABLE: [[Symbol; NPERMUTATIONS as usize]; NCLASSES as usize] = build_table();

const fn build_table() -> [[Symbol; NPERMUTATIONS as usize]; NCLASSES as usize] {
    let mut table = [[Symbol::from_parts(0, 0, 0); NPERMUTATIONS as usize]; NCLASSES as usize];
    let mut class = 0;
    while class < NCLASSES as usize {
        let base = pack_word(BASES[class]);
        table[class][0] = Symbol::from_parts(base, class as u16, 0);
        table[class][1] = Symbol::from_parts(rotate_once(base), class as u16, 1);
        table[class][2] = Symbol::from_parts(rotate_twice(base), class as u16, 2);
        class += 1;
    }
    table
}

impl Symbol {
    /// Look up the table entry for `(class, permutation)`.
    ///
    /// # Panics
    ///
    /// Panics if `class >= NCLASSES` or `permutation >= NPERMUTATIONS`.
    pub fn at(class: u8, permutation: u8) -> Symbol {
        TABLE[class as usize][permutation as usize]
    }

    /// The table successor: next permutation, wrapping to the following
    /// class's permutation 0. `None` past the last entry.
    pub fn next(self) -> Option<Symbol> {
        if self.permutation() == NPERMUTATIONS - 1 {
            self.next_class()
        } else {
            Some(TABLE[self.class() as usize][self.permutation() as usize + 1])
        }
    }

    /// Permutation 0 of the class after this symbol's. `None` if this symbol
    /// is in the last class.
    pub fn next_class(self) -> Option<Symbol> {
        let class = self.class() + 1;
        if class < NCLASSES {
            Some(TABLE[class as usize][0])
        } else {
            None
        }
    }
}
