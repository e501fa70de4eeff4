//! Provides a set-of-squares representation of the board
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
//! # Bitboards
//! A [`Bitboard`](struct.Bitboard.html) is a set of squares packed into a 64-bit word, bit
//! `row * 8 + column` standing for the square at that row and column. Occupancy, attacks and the
//! blocker masks used by the magic tables are all bitboards.
//!
//! ```rust
//! use bitmove::chess::Square;
//! use bitmove::chess::bitboard::Bitboard;
//!
//! let mut squares = Bitboard::from(Square::C1) | Square::A2.into();
//! assert_eq!(squares.bit_count(), 2);
//! assert_eq!(squares.first_set(), Some(Square::C1));
//! assert_eq!(squares.pop(), Some(Square::C1));
//! assert_eq!(squares.pop(), Some(Square::A2));
//! assert_eq!(squares.pop(), None);
//! ```
//!
//! ## Ray casting
//! The [`rays`](rays/index.html) functions compute moves the slow way, one square at a time.
//! They're what the magic table builder uses to fill its tables, and what the tests use to check
//! the tables afterward. Runtime queries go through
//! [`AttackTables`](../tables/struct.AttackTables.html) instead.
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryInto;
use std::iter::FusedIterator;
use std::iter::{FromIterator, Extend};
use std::ops;
use std::fmt;
use super::*;

pub mod rays;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A set of squares with each bit representing one square
///
/// The diagram below shows the layout of the bits.
///
/// ```text
///     a    b    c    d    e    f    g    h
///    ---------------------------------------
/// 8 | 56 | 57 | 58 | 59 | 60 | 61 | 62 | 63 | 8
///    ---------------------------------------
/// 7 | 48 | 49 | 50 | 51 | 52 | 53 | 54 | 55 | 7
///    ---------------------------------------
/// 6 | 40 | 41 | 42 | 43 | 44 | 45 | 46 | 47 | 6
///    ---------------------------------------
/// 5 | 32 | 33 | 34 | 35 | 36 | 37 | 38 | 39 | 5
///    ---------------------------------------
/// 4 | 24 | 25 | 26 | 27 | 28 | 29 | 30 | 31 | 4
///    ---------------------------------------
/// 3 | 16 | 17 | 18 | 19 | 20 | 21 | 22 | 23 | 3
///    ---------------------------------------
/// 2 | 08 | 09 | 10 | 11 | 12 | 13 | 14 | 15 | 2
///    ---------------------------------------
/// 1 | 00 | 01 | 02 | 03 | 04 | 05 | 06 | 07 | 1
///    ---------------------------------------
///     a    b    c    d    e    f    g    h
/// ```
///
/// `Bitboard` implements all the bit-wise logic operators: `|`, `&`, `^`, `!`, `|=`, `&=`, and
/// `^=`. It also has methods that are typical for sets and collections, such as `insert`,
/// `remove`, `bit_count`, and `contains`. It implements `IntoIterator`, yielding squares in
/// ascending order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Hash)]
pub struct Bitboard(u64);

impl Bitboard {
    /// The empty set
    pub const EMPTY: Bitboard = Bitboard(0);

    /// Creates a new, empty bitboard
    pub fn new() -> Bitboard {
        Default::default()
    }

    /// Returns the raw 64-bit word
    pub fn bits(self) -> u64 {
        self.0
    }

    /// Returns the bitboard containing only `sq`
    pub fn bit_square(sq: Square) -> Bitboard {
        Bitboard(1 << sq as u64)
    }

    /// Returns the number of squares in the bitboard
    pub fn bit_count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` if the bitboard is empty
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the bitboard contains `sq`
    pub fn contains(self, sq: Square) -> bool {
        !(self & sq.into()).is_empty()
    }

    /// Returns `true` if `self` intersects `other`
    pub fn intersects(self, other: Bitboard) -> bool {
        !(self & other).is_empty()
    }

    /// Returns `true` if `self` does not intersect `other`
    pub fn is_disjoint(self, other: Bitboard) -> bool {
        (self & other).is_empty()
    }

    /// Adds a square to the bitboard if it is not already present
    pub fn insert(&mut self, sq: Square) {
        *self |= sq.into();
    }

    /// Removes a square from the bitboard if it is present
    pub fn remove(&mut self, sq: Square) {
        *self &= !Bitboard::from(sq);
    }

    /// Toggles a square in the bitboard
    pub fn toggle(&mut self, sq: Square) {
        *self ^= sq.into();
    }

    /// Returns the bitboard holding only the lowest square of `self`
    ///
    /// This is `x & -x` in two's complement, so the negation wraps.
    pub fn lowest_bit(self) -> Bitboard {
        Bitboard(self.0 & self.0.wrapping_neg())
    }

    /// Returns the lowest square in the bitboard, if any
    pub fn first_set(self) -> Option<Square> {
        if self.0 > 0 {
            Some((self.0.trailing_zeros() as usize).try_into().expect("INFALLIBLE"))
        } else {
            None
        }
    }

    /// Returns the highest square in the bitboard, if any
    pub fn last_set(self) -> Option<Square> {
        if self.0 > 0 {
            Some((63 - self.0.leading_zeros() as usize).try_into().expect("INFALLIBLE"))
        } else {
            None
        }
    }

    /// Removes the lowest square from the bitboard and returns it
    pub fn pop(&mut self) -> Option<Square> {
        let sq = self.first_set()?;
        // clear the least significant bit
        self.0 &= self.0 - 1;
        Some(sq)
    }

    /// Renders the bitboard as eight lines of `0`s and `1`s, row 8 first
    pub fn to_diagram(self) -> String {
        let mut s = String::with_capacity(Square::COUNT + Row::COUNT);
        for row in (0..Row::COUNT).rev() {
            for column in 0..Column::COUNT {
                s.push(if self.0 & (1 << (row * 8 + column)) != 0 { '1' } else { '0' });
            }
            s.push('\n');
        }
        s
    }
}

impl ops::Not for Bitboard {
    type Output = Self;

    fn not(self) -> Self::Output {
        Bitboard(!self.0)
    }
}

impl ops::BitAnd for Bitboard {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 & rhs.0)
    }
}

impl ops::BitAndAssign for Bitboard {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0
    }
}

impl ops::BitOr for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 | rhs.0)
    }
}

impl ops::BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl ops::BitXor for Bitboard {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl ops::BitXorAssign for Bitboard {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0
    }
}

impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::LowerHex for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Binary for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for Bitboard {
    fn from(val: u64) -> Bitboard {
        Bitboard(val)
    }
}

impl From<Bitboard> for u64 {
    fn from(val: Bitboard) -> u64 {
        val.0
    }
}

impl From<Square> for Bitboard {
    fn from(sq: Square) -> Bitboard {
        Bitboard::bit_square(sq)
    }
}

impl From<Row> for Bitboard {
    fn from(r: Row) -> Bitboard {
        Bitboard(0x0000_0000_0000_00ff << (8 * r as u64))
    }
}

impl From<Column> for Bitboard {
    fn from(c: Column) -> Bitboard {
        Bitboard(0x0101_0101_0101_0101 << c as u64)
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self)
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item=Square>>(iter: I) -> Self {
        let mut bd = Bitboard::new();

        for sq in iter {
            bd.insert(sq);
        }

        bd
    }
}

impl Extend<Square> for Bitboard {
    fn extend<I: IntoIterator<Item=Square>>(&mut self, iter: I) {
        for sq in iter {
            self.insert(sq);
        }
    }
}

/// Iterator over the squares of a `Bitboard`, lowest first
#[derive(Debug, Copy, Clone)]
pub struct IntoIter(Bitboard);

impl Iterator for IntoIter {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.bit_count();
        (len, Some(len))
    }
}

impl ExactSizeIterator for IntoIter { }

impl FusedIterator for IntoIter { }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitboard() {
        // test new() method and Default trait
        assert_eq!(Bitboard::new(), Bitboard(0));
        assert_eq!(Bitboard::new(), Bitboard::EMPTY);

        // test bit_count() and is_empty() methods
        assert_eq!(Bitboard::new().bit_count(), 0);
        assert!(Bitboard::new().is_empty());
        assert_eq!(Bitboard(0xffffffffffffffff).bit_count(), 64);
        assert!(!Bitboard(0xffffffffffffffff).is_empty());

        // test contains() method
        assert!(Bitboard::from(Square::A1).contains(Square::A1));
        assert!(Bitboard::from(Square::H8).contains(Square::H8));
        assert!(!Bitboard::from(Square::A1).contains(Square::H8));
        assert!(!Bitboard::from(Square::H8).contains(Square::A1));

        // test formatting
        assert_eq!(format!("{}", Bitboard::from(0x0123456789abcdef)), "123456789abcdef");
        assert_eq!(format!("{:016x}", Bitboard::from(0x0123456789abcdef)), "0123456789abcdef");
        assert_eq!(format!("{:X}", Bitboard::from(0x0123456789ABCDEF)), "123456789ABCDEF");
    }

    #[test]
    fn insert_remove_and_toggle() {
        let mut bd = Bitboard::new();
        bd.insert(Square::D4);
        bd.insert(Square::D4);
        assert_eq!(bd.bit_count(), 1);
        bd.toggle(Square::E5);
        assert!(bd.contains(Square::E5));
        bd.toggle(Square::E5);
        assert!(!bd.contains(Square::E5));
        bd.remove(Square::D4);
        assert!(bd.is_empty());
    }

    #[test]
    fn lowest_bit_uses_wrapping_negation() {
        assert_eq!(Bitboard(0b1011_0000).lowest_bit(), Bitboard(0b1_0000));
        assert_eq!(Bitboard(1 << 63).lowest_bit(), Bitboard(1 << 63));
        assert_eq!(Bitboard(0).lowest_bit(), Bitboard(0));
    }

    #[test]
    fn first_and_last_set() {
        let bd = Bitboard::from(Square::C3) | Square::F7.into();
        assert_eq!(bd.first_set(), Some(Square::C3));
        assert_eq!(bd.last_set(), Some(Square::F7));
        assert_eq!(Bitboard::EMPTY.first_set(), None);
        assert_eq!(Bitboard::EMPTY.last_set(), None);
    }

    #[test]
    fn iteration_is_ascending() {
        let bd: Bitboard = vec![Square::H8, Square::A1, Square::E4].into_iter().collect();
        let squares: Vec<Square> = bd.into_iter().collect();
        assert_eq!(squares, vec![Square::A1, Square::E4, Square::H8]);
        assert_eq!(bd.into_iter().len(), 3);
    }

    #[test]
    fn row_and_column_masks() {
        assert_eq!(Bitboard::from(Row::R1).bits(), 0xff);
        assert_eq!(Bitboard::from(Row::R8).bits(), 0xff00_0000_0000_0000);
        assert_eq!(Bitboard::from(Column::A).bits(), 0x0101_0101_0101_0101);
        assert_eq!(Bitboard::from(Column::H).bits(), 0x8080_8080_8080_8080);
    }

    #[test]
    fn diagram_puts_row_8_first() {
        let diagram = Bitboard::from(Square::A1).to_diagram();
        let lines: Vec<&str> = diagram.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "00000000");
        assert_eq!(lines[7], "10000000");
    }
}
