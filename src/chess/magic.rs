//! Builds the magic-bitboard tables for sliding pieces
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
//! # Magic bitboards
//! The squares a rook or bishop can reach depend only on which of a handful of squares around it
//! are occupied: its *blocker mask*. Each subset of the mask is hashed by multiplying it with a
//! 64-bit *magic* number and keeping the top `n` bits, where `n` is the number of squares in the
//! mask. The builder searches for a magic that sends every subset to its own slot, then stores
//! each subset's moves in that slot. At run time a lookup is a mask, a multiply, a shift and an
//! index.
//!
//! ```rust
//! use bitmove::chess::Square;
//! use bitmove::chess::bitboard::Bitboard;
//! use bitmove::chess::magic::{MagicBuilder, Slider};
//!
//! let mut builder = MagicBuilder::seeded(7);
//! let entry = builder.build_entry(Slider::Rook, Square::A1).unwrap();
//! let moves = entry.moves(Bitboard::from(Square::D1));
//! assert!(moves.contains(Square::D1));
//! assert!(!moves.contains(Square::E1));
//! ```
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use log::{debug, info, trace};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use super::{Square, bitboard::Bitboard, bitboard::rays};
use super::error::MagicError;

/// The largest blocker bit count a table entry may declare
pub const MAX_BLOCKER_BITS: u64 = 13;

/// Default number of candidate magics tried per square before giving up
pub const DEFAULT_MAX_TRIES: u64 = 100_000_000;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A sliding piece with its own magic table
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Slider {
    Rook,
    Bishop,
}

impl Slider {
    /// Both sliders, in the order their tables appear in a serialized blob
    pub const ALL: [Slider; 2] = [Slider::Rook, Slider::Bishop];

    /// Returns the blocker mask of this slider on `sq`
    pub fn blocker_mask(self, sq: Square) -> Bitboard {
        match self {
            Slider::Rook => rays::rook_blocker_mask(sq),
            Slider::Bishop => rays::bishop_blocker_mask(sq),
        }
    }

    /// Computes this slider's moves from `sq` by ray casting
    pub fn moves(self, sq: Square, occ: Bitboard) -> Bitboard {
        match self {
            Slider::Rook => rays::rook_moves(sq, occ),
            Slider::Bishop => rays::bishop_moves(sq, occ),
        }
    }
}

impl fmt::Display for Slider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slider::Rook => "rook",
            Slider::Bishop => "bishop",
        }.fmt(f)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Hashes a set of blockers into a table index
///
/// `(blockers * magic) >> (64 - bit_count)`, with a wrapping multiply. A bit count of zero
/// always hashes to zero.
#[inline]
pub fn hash(blockers: Bitboard, magic: u64, bit_count: u64) -> usize {
    blockers.bits()
        .wrapping_mul(magic)
        .checked_shr((64 - bit_count) as u32)
        .unwrap_or(0) as usize
}

/// Returns the subset of `mask` selected by `index`
///
/// Bit `b` of `index` selects the `b`-th lowest square of `mask`, so the indices
/// `0 .. 2^mask.bit_count()` enumerate every subset exactly once.
pub fn blocker_subset(mut mask: Bitboard, index: usize) -> Bitboard {
    let mut subset = Bitboard::new();
    let mut bit = 0;

    while !mask.is_empty() {
        let lowest = mask.lowest_bit();
        mask ^= lowest;
        if index & (1 << bit) != 0 {
            subset |= lowest;
        }
        bit += 1;
    }

    subset
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The magic lookup for one slider on one square
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicEntry {
    blocker_mask: Bitboard,
    bit_count: u64,
    magic: u64,
    moves: Vec<Bitboard>,
}

impl MagicEntry {
    /// Creates an entry from its parts
    ///
    /// # Panics
    ///
    /// Panics if `bit_count` exceeds `MAX_BLOCKER_BITS` or `moves` doesn't hold exactly
    /// `2^bit_count` entries.
    pub fn new(blocker_mask: Bitboard, bit_count: u64, magic: u64, moves: Vec<Bitboard>) -> Self {
        assert!(bit_count <= MAX_BLOCKER_BITS, "blocker bit count out of range");
        assert_eq!(moves.len(), 1 << bit_count, "move table size doesn't match bit count");

        MagicEntry { blocker_mask, bit_count, magic, moves }
    }

    /// Squares whose occupancy affects this slider's moves
    pub fn blocker_mask(&self) -> Bitboard {
        self.blocker_mask
    }

    /// Number of squares in the blocker mask, and the number of bits in a table index
    pub fn bit_count(&self) -> u64 {
        self.bit_count
    }

    /// The magic multiplier
    pub fn magic(&self) -> u64 {
        self.magic
    }

    /// The move table, indexed by hashed blockers
    pub fn move_table(&self) -> &[Bitboard] {
        &self.moves
    }

    /// Returns the table index for the occupied squares `occ`
    #[inline]
    pub fn index(&self, occ: Bitboard) -> usize {
        hash(occ & self.blocker_mask, self.magic, self.bit_count)
    }

    /// Returns the squares reachable with the occupied squares `occ`, including occupied squares
    /// at the end of each ray
    #[inline]
    pub fn moves(&self, occ: Bitboard) -> Bitboard {
        self.moves[self.index(occ)]
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Magic entries for one slider on all 64 squares
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicTable {
    slider: Slider,
    entries: Vec<MagicEntry>,
}

impl MagicTable {
    /// Creates a table from one entry per square, in square order
    ///
    /// # Panics
    ///
    /// Panics unless there are exactly 64 entries.
    pub fn new(slider: Slider, entries: Vec<MagicEntry>) -> Self {
        assert_eq!(entries.len(), Square::COUNT, "a magic table needs one entry per square");
        MagicTable { slider, entries }
    }

    /// The slider this table is for
    pub fn slider(&self) -> Slider {
        self.slider
    }

    /// The entry for `sq`
    #[inline]
    pub fn entry(&self, sq: Square) -> &MagicEntry {
        &self.entries[sq as usize]
    }

    /// All entries, in square order
    pub fn entries(&self) -> &[MagicEntry] {
        &self.entries
    }

    /// Slider moves from `sq` with the occupied squares `occ`
    #[inline]
    pub fn moves(&self, sq: Square, occ: Bitboard) -> Bitboard {
        self.entry(sq).moves(occ)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Searches for magic multipliers and builds magic tables
///
/// The search is randomized: candidates are drawn until one hashes every blocker subset of a
/// square to a distinct slot. It gives up with `MagicError::Exhausted` after `max_tries`
/// candidates for a single square.
#[derive(Debug)]
pub struct MagicBuilder {
    rng: StdRng,
    max_tries: u64,
}

impl MagicBuilder {
    /// Creates a builder whose random numbers are seeded from `seed`, so the same seed always
    /// builds the same tables
    pub fn seeded(seed: u64) -> Self {
        MagicBuilder {
            rng: StdRng::seed_from_u64(seed),
            max_tries: DEFAULT_MAX_TRIES,
        }
    }

    /// Creates a builder seeded from system entropy
    pub fn from_entropy() -> Self {
        MagicBuilder {
            rng: StdRng::from_entropy(),
            max_tries: DEFAULT_MAX_TRIES,
        }
    }

    /// Sets the number of candidates tried per square before giving up
    pub fn max_tries(mut self, max_tries: u64) -> Self {
        self.max_tries = max_tries;
        self
    }

    /// Draws a candidate with roughly an eighth of its bits set
    fn sparse_random(&mut self) -> u64 {
        self.rng.gen::<u64>() & self.rng.gen::<u64>() & self.rng.gen::<u64>()
    }

    /// Finds a magic for `slider` on `sq` and fills in its move table
    pub fn build_entry(&mut self, slider: Slider, sq: Square) -> Result<MagicEntry, MagicError> {
        let blocker_mask = slider.blocker_mask(sq);
        let bit_count = blocker_mask.bit_count() as u64;
        let subset_count = 1usize << bit_count;

        let blockers: Vec<Bitboard> = (0..subset_count)
            .map(|i| blocker_subset(blocker_mask, i))
            .collect();
        let moves: Vec<Bitboard> = blockers.iter()
            .map(|&occ| slider.moves(sq, occ))
            .collect();

        // slot `i` is taken in this attempt iff `used[i] == attempt`
        let mut used = vec![0u64; subset_count];

        for attempt in 1..=self.max_tries {
            let magic = self.sparse_random();

            let collision = blockers.iter().any(|&occ| {
                let slot = &mut used[hash(occ, magic, bit_count)];
                let taken = *slot == attempt;
                *slot = attempt;
                taken
            });

            if !collision {
                let mut table = vec![Bitboard::new(); subset_count];
                for (&occ, &mv) in blockers.iter().zip(moves.iter()) {
                    table[hash(occ, magic, bit_count)] = mv;
                }
                debug!("{} magic for {}: {:#018x} ({} bits, {} candidates)",
                    slider, sq, magic, bit_count, attempt);
                trace!("{} blocker mask for {}:\n{}", slider, sq, blocker_mask.to_diagram());

                return Ok(MagicEntry::new(blocker_mask, bit_count, magic, table));
            }
        }

        Err(MagicError::Exhausted { slider, square: sq, tries: self.max_tries })
    }

    /// Builds the entries for `slider` on every square
    pub fn build_table(&mut self, slider: Slider) -> Result<MagicTable, MagicError> {
        let entries = Square::all()
            .map(|sq| self.build_entry(slider, sq))
            .collect::<Result<Vec<_>, _>>()?;

        info!("built {} magic table ({} moves)", slider,
            entries.iter().map(|e| e.move_table().len()).sum::<usize>());

        Ok(MagicTable::new(slider, entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_of_zero_bits_is_zero() {
        assert_eq!(hash(Bitboard::from(0xffff_u64), 0x1234_5678, 0), 0);
    }

    #[test]
    fn hash_keeps_the_top_bits() {
        assert_eq!(hash(Bitboard::from(1u64), 0xf000_0000_0000_0000, 4), 0xf);
        assert_eq!(hash(Bitboard::from(2u64), 0x8000_0000_0000_0000, 1), 0);
    }

    #[test]
    fn blocker_subsets_enumerate_every_subset_once() {
        let mask = rays::rook_blocker_mask(Square::D4);
        let count = 1 << mask.bit_count();
        let mut seen = std::collections::HashSet::new();

        for i in 0..count {
            let subset = blocker_subset(mask, i);
            assert_eq!(subset & !mask, Bitboard::new());
            assert!(seen.insert(subset));
        }
        assert_eq!(blocker_subset(mask, 0), Bitboard::new());
        assert_eq!(blocker_subset(mask, count - 1), mask);
    }

    #[test]
    fn blocker_subset_follows_ascending_bit_order() {
        let mask = Bitboard::from(Square::B1) | Square::C1.into() | Square::B2.into();
        assert_eq!(blocker_subset(mask, 0b001), Bitboard::from(Square::B1));
        assert_eq!(blocker_subset(mask, 0b010), Bitboard::from(Square::C1));
        assert_eq!(blocker_subset(mask, 0b100), Bitboard::from(Square::B2));
    }

    #[test]
    fn entries_hash_injectively_and_match_ray_casting() {
        let mut builder = MagicBuilder::seeded(1);

        for &slider in Slider::ALL.iter() {
            for &sq in [Square::A1, Square::D4, Square::H8, Square::B7].iter() {
                let entry = builder.build_entry(slider, sq).unwrap();
                let mask = entry.blocker_mask();
                let mut seen = std::collections::HashSet::new();

                for i in 0..1 << entry.bit_count() {
                    let occ = blocker_subset(mask, i);
                    assert!(seen.insert(entry.index(occ)));
                    assert_eq!(entry.moves(occ), slider.moves(sq, occ));
                }
            }
        }
    }

    #[test]
    fn same_seed_builds_same_entry() {
        let a = MagicBuilder::seeded(42).build_entry(Slider::Bishop, Square::C1).unwrap();
        let b = MagicBuilder::seeded(42).build_entry(Slider::Bishop, Square::C1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn exhausted_search_is_an_error() {
        let mut builder = MagicBuilder::seeded(3).max_tries(0);
        assert_eq!(
            builder.build_entry(Slider::Rook, Square::A1),
            Err(MagicError::Exhausted { slider: Slider::Rook, square: Square::A1, tries: 0 })
        );
    }
}
