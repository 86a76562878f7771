// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The trinucleotide alphabet.
//!
//! The search operates over 60 compound symbols: 20 equivalence classes of
//! trinucleotides over {A, C, G, T}, each class carrying its 3 cyclic
//! permutations. A symbol packs its 3 two-bit letters, a permutation id and a
//! class id into a single integer, so membership tests and overlap
//! construction reduce to bit operations.

pub mod symbol;
pub mod table;

pub use symbol::{word_letters, Symbol, Word, NCLASSES, NPERMUTATIONS, NWORDS, PREFIX_SLOTS};
