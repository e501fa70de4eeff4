//! The attack tables used by every move query, and their serialized form
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
//! # Blob layout
//! Tables are written as a flat run of native-endian `u64` words:
//!
//! 1. for each square, the rook entry: blocker mask, blocker bit count, magic, then
//!    `2^bit_count` moves
//! 2. 64 knight moves
//! 3. for each square, the bishop entry, laid out like the rook entries
//! 4. 64 king moves
//! 5. for white, then black: 64 pairs of (pawn move, pawn capture)
//!
//! The entries have varying lengths, so a reader has to walk them in order.
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryFrom;
use std::fs;
use std::path::Path;
use log::{info, debug};
use super::{Side, Square, bitboard::Bitboard, bitboard::rays};
use super::magic::{MagicBuilder, MagicEntry, MagicTable, Slider, MAX_BLOCKER_BITS};
use super::error::{MagicError, TableError};

const WORD: usize = std::mem::size_of::<u64>();

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Precomputed moves for every piece on every square
///
/// Built once, by the offline builder or in-process, and then only read. Everything that needs
/// to look up moves borrows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackTables {
    rook: MagicTable,
    bishop: MagicTable,
    knight: [Bitboard; Square::COUNT],
    king: [Bitboard; Square::COUNT],
    pawn_move: [[Bitboard; Square::COUNT]; Side::COUNT],
    pawn_capture: [[Bitboard; Square::COUNT]; Side::COUNT],
}

impl AttackTables {
    /// Builds all tables, searching for magics with `builder`
    pub fn build(builder: &mut MagicBuilder) -> Result<AttackTables, MagicError> {
        let rook = builder.build_table(Slider::Rook)?;
        let bishop = builder.build_table(Slider::Bishop)?;
        Ok(AttackTables::with_sliders(rook, bishop))
    }

    /// Combines the given slider tables with the closed-form knight, king and pawn tables
    fn with_sliders(rook: MagicTable, bishop: MagicTable) -> AttackTables {
        let mut tables = AttackTables {
            rook,
            bishop,
            knight: [Bitboard::new(); Square::COUNT],
            king: [Bitboard::new(); Square::COUNT],
            pawn_move: [[Bitboard::new(); Square::COUNT]; Side::COUNT],
            pawn_capture: [[Bitboard::new(); Square::COUNT]; Side::COUNT],
        };

        for sq in Square::all() {
            tables.knight[sq as usize] = rays::knight_moves(sq);
            tables.king[sq as usize] = rays::king_moves(sq);
            for &side in Side::ALL.iter() {
                tables.pawn_move[side as usize][sq as usize] = rays::pawn_moves(side, sq);
                tables.pawn_capture[side as usize][sq as usize] = rays::pawn_captures(side, sq);
            }
        }

        tables
    }

    /// The rook magic table
    pub fn rook(&self) -> &MagicTable {
        &self.rook
    }

    /// The bishop magic table
    pub fn bishop(&self) -> &MagicTable {
        &self.bishop
    }

    /// Rook moves from `sq` with the occupied squares `occ`
    #[inline]
    pub fn rook_moves(&self, sq: Square, occ: Bitboard) -> Bitboard {
        self.rook.moves(sq, occ)
    }

    /// Bishop moves from `sq` with the occupied squares `occ`
    #[inline]
    pub fn bishop_moves(&self, sq: Square, occ: Bitboard) -> Bitboard {
        self.bishop.moves(sq, occ)
    }

    /// Queen moves from `sq`: the union of rook and bishop moves
    #[inline]
    pub fn queen_moves(&self, sq: Square, occ: Bitboard) -> Bitboard {
        self.rook_moves(sq, occ) | self.bishop_moves(sq, occ)
    }

    /// Knight moves from `sq`
    #[inline]
    pub fn knight_moves(&self, sq: Square) -> Bitboard {
        self.knight[sq as usize]
    }

    /// King moves from `sq`
    #[inline]
    pub fn king_moves(&self, sq: Square) -> Bitboard {
        self.king[sq as usize]
    }

    /// Forward pawn moves of `side` from `sq` on an empty board
    #[inline]
    pub fn pawn_moves(&self, side: Side, sq: Square) -> Bitboard {
        self.pawn_move[side as usize][sq as usize]
    }

    /// Diagonal pawn captures of `side` from `sq`
    #[inline]
    pub fn pawn_captures(&self, side: Side, sq: Square) -> Bitboard {
        self.pawn_capture[side as usize][sq as usize]
    }

    /// Serializes the tables into a blob
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut words: Vec<u64> = Vec::new();

        let push_slider = |words: &mut Vec<u64>, table: &MagicTable| {
            for entry in table.entries() {
                words.push(entry.blocker_mask().bits());
                words.push(entry.bit_count());
                words.push(entry.magic());
                words.extend(entry.move_table().iter().map(|mv| mv.bits()));
            }
        };

        push_slider(&mut words, &self.rook);
        words.extend(self.knight.iter().map(|mv| mv.bits()));
        push_slider(&mut words, &self.bishop);
        words.extend(self.king.iter().map(|mv| mv.bits()));
        for side in 0..Side::COUNT {
            for sq in 0..Square::COUNT {
                words.push(self.pawn_move[side][sq].bits());
                words.push(self.pawn_capture[side][sq].bits());
            }
        }

        words.iter().flat_map(|w| w.to_ne_bytes().to_vec()).collect()
    }

    /// Loads tables from a blob
    ///
    /// Every bit count is checked against `0..=13` and the blob's length against the length the
    /// bit counts imply before any move table is read.
    pub fn from_bytes(bytes: &[u8]) -> Result<AttackTables, TableError> {
        let expected = expected_len(bytes)?;
        if expected != bytes.len() {
            return Err(TableError::LengthMismatch { expected, actual: bytes.len() });
        }

        let mut reader = WordReader::new(bytes);

        let rook = reader.magic_table(Slider::Rook)?;
        let knight = reader.square_table()?;
        let bishop = reader.magic_table(Slider::Bishop)?;
        let king = reader.square_table()?;

        let mut pawn_move = [[Bitboard::new(); Square::COUNT]; Side::COUNT];
        let mut pawn_capture = [[Bitboard::new(); Square::COUNT]; Side::COUNT];
        for side in 0..Side::COUNT {
            for sq in 0..Square::COUNT {
                pawn_move[side][sq] = reader.word()?.into();
                pawn_capture[side][sq] = reader.word()?.into();
            }
        }

        Ok(AttackTables { rook, bishop, knight, king, pawn_move, pawn_capture })
    }

    /// Writes the serialized tables to `path`
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), TableError> {
        let bytes = self.to_bytes();
        fs::write(path.as_ref(), &bytes)
            .map_err(|err| TableError::Io(format!("{}: {}", path.as_ref().display(), err)))?;
        info!("wrote {} bytes of attack tables to {}", bytes.len(), path.as_ref().display());
        Ok(())
    }

    /// Reads serialized tables from `path`
    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<AttackTables, TableError> {
        let bytes = fs::read(path.as_ref())
            .map_err(|err| TableError::Io(format!("{}: {}", path.as_ref().display(), err)))?;
        debug!("read {} bytes of attack tables from {}", bytes.len(), path.as_ref().display());
        AttackTables::from_bytes(&bytes)
    }
}

/// Walks the headers of a blob to compute the length it should have
fn expected_len(bytes: &[u8]) -> Result<usize, TableError> {
    let mut reader = WordReader::new(bytes);
    let mut words = 0;

    for &slider in Slider::ALL.iter() {
        for sq in Square::all() {
            reader.word()?; // blocker mask
            let bits = reader.word()?;
            if bits > MAX_BLOCKER_BITS {
                return Err(TableError::InvalidBitCount { slider, square: sq, bits });
            }
            reader.word()?; // magic
            reader.skip(1 << bits)?;
            words += 3 + (1usize << bits);
        }
        // knight table follows the rook entries, king table follows the bishop entries
        reader.skip(Square::COUNT)?;
        words += Square::COUNT;
    }
    words += Side::COUNT * Square::COUNT * 2;

    Ok(words * WORD)
}

/// Reads native-endian words from a byte slice, never past its end
struct WordReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> WordReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        WordReader { bytes, pos: 0 }
    }

    fn word(&mut self) -> Result<u64, TableError> {
        let end = self.pos + WORD;
        let chunk = self.bytes.get(self.pos..end).ok_or(TableError::Truncated)?;
        self.pos = end;
        Ok(u64::from_ne_bytes(<[u8; WORD]>::try_from(chunk).map_err(|_| TableError::Truncated)?))
    }

    fn skip(&mut self, words: usize) -> Result<(), TableError> {
        let end = self.pos + words * WORD;
        if end > self.bytes.len() {
            return Err(TableError::Truncated);
        }
        self.pos = end;
        Ok(())
    }

    fn square_table(&mut self) -> Result<[Bitboard; Square::COUNT], TableError> {
        let mut table = [Bitboard::new(); Square::COUNT];
        for entry in table.iter_mut() {
            *entry = self.word()?.into();
        }
        Ok(table)
    }

    fn magic_table(&mut self, slider: Slider) -> Result<MagicTable, TableError> {
        let mut entries = Vec::with_capacity(Square::COUNT);

        for sq in Square::all() {
            let blocker_mask = Bitboard::from(self.word()?);
            let bits = self.word()?;
            if bits > MAX_BLOCKER_BITS {
                return Err(TableError::InvalidBitCount { slider, square: sq, bits });
            }
            let magic = self.word()?;
            let moves = (0..1usize << bits)
                .map(|_| self.word().map(Bitboard::from))
                .collect::<Result<Vec<_>, _>>()?;

            entries.push(MagicEntry::new(blocker_mask, bits, magic, moves));
        }

        Ok(MagicTable::new(slider, entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::magic::blocker_subset;
    use lazy_static::lazy_static;

    lazy_static! {
        static ref TABLES: AttackTables =
            AttackTables::build(&mut MagicBuilder::seeded(0x5eed)).expect("magic search failed");
    }

    #[test]
    fn every_magic_is_injective() {
        for table in [TABLES.rook(), TABLES.bishop()].iter() {
            for sq in Square::all() {
                let entry = table.entry(sq);
                let mut used = vec![false; entry.move_table().len()];
                for i in 0..1 << entry.bit_count() {
                    let index = entry.index(blocker_subset(entry.blocker_mask(), i));
                    assert!(!used[index], "{} collision on {}", table.slider(), sq);
                    used[index] = true;
                }
            }
        }
    }

    #[test]
    fn every_move_table_matches_ray_casting() {
        for table in [TABLES.rook(), TABLES.bishop()].iter() {
            let slider = table.slider();
            for sq in Square::all() {
                let entry = table.entry(sq);
                for i in 0..1 << entry.bit_count() {
                    let occ = blocker_subset(entry.blocker_mask(), i);
                    let stored = entry.move_table()[entry.index(occ)];
                    assert_eq!(stored, slider.moves(sq, occ), "{} on {}", slider, sq);
                }
            }
        }
    }

    #[test]
    fn lookups_ignore_squares_outside_the_mask() {
        // edge squares and squares off the rays don't change the answer
        let occ = Bitboard::from(Square::H1) | Square::A8.into() | Square::E5.into();
        assert_eq!(TABLES.rook_moves(Square::A1, occ), rays::rook_moves(Square::A1, occ));
        assert_eq!(TABLES.bishop_moves(Square::C1, occ), rays::bishop_moves(Square::C1, occ));
    }

    #[test]
    fn rook_from_corner_on_empty_board() {
        let expected = (Bitboard::from(crate::chess::Row::R1)
            | crate::chess::Column::A.into()) & !Bitboard::from(Square::A1);
        let moves = TABLES.rook_moves(Square::A1, Bitboard::new());
        assert_eq!(moves, expected);
        assert_eq!(moves.bit_count(), 14);
    }

    #[test]
    fn blocked_rook_stops_at_the_blocker() {
        let moves = TABLES.rook_moves(Square::A1, Square::D1.into());
        assert!(moves.contains(Square::D1));
        assert!(!moves.contains(Square::E1));
        assert!(!moves.contains(Square::H1));
        assert!(moves.contains(Square::A8));
    }

    #[test]
    fn queen_is_rook_plus_bishop() {
        let occ = Bitboard::from(Square::D6) | Square::F4.into();
        assert_eq!(
            TABLES.queen_moves(Square::D4, occ),
            rays::rook_moves(Square::D4, occ) | rays::bishop_moves(Square::D4, occ)
        );
    }

    #[test]
    fn simple_tables_are_per_square() {
        assert_eq!(TABLES.knight_moves(Square::A1), rays::knight_moves(Square::A1));
        assert_ne!(TABLES.knight_moves(Square::A1), TABLES.knight_moves(Square::D4));
        assert_eq!(TABLES.king_moves(Square::E1), rays::king_moves(Square::E1));
        assert_eq!(TABLES.pawn_moves(Side::Black, Square::E7), rays::pawn_moves(Side::Black, Square::E7));
    }

    #[test]
    fn blob_round_trip() {
        let bytes = TABLES.to_bytes();
        let loaded = AttackTables::from_bytes(&bytes).unwrap();
        assert_eq!(&loaded, &*TABLES);
    }

    #[test]
    fn blob_knight_section_is_written_per_square() {
        let bytes = TABLES.to_bytes();
        let rook_words: usize = TABLES.rook().entries().iter()
            .map(|e| 3 + e.move_table().len())
            .sum();
        let read = |word: usize| {
            let mut buf = [0u8; WORD];
            buf.copy_from_slice(&bytes[word * WORD..(word + 1) * WORD]);
            u64::from_ne_bytes(buf)
        };
        for sq in Square::all() {
            assert_eq!(read(rook_words + sq as usize), rays::knight_moves(sq).bits());
        }
    }

    #[test]
    fn truncated_blob_is_rejected() {
        let bytes = TABLES.to_bytes();
        assert!(AttackTables::from_bytes(&bytes[..bytes.len() - 1]).is_err());
        assert!(AttackTables::from_bytes(&bytes[..bytes.len() - WORD]).is_err());
        assert_eq!(AttackTables::from_bytes(&bytes[..100]), Err(TableError::Truncated));
        assert_eq!(AttackTables::from_bytes(&[]), Err(TableError::Truncated));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = TABLES.to_bytes();
        let actual = bytes.len() + WORD;
        bytes.extend_from_slice(&[0; WORD]);
        assert_eq!(
            AttackTables::from_bytes(&bytes),
            Err(TableError::LengthMismatch { expected: actual - WORD, actual })
        );
    }

    #[test]
    fn out_of_range_bit_count_is_rejected() {
        let mut bytes = TABLES.to_bytes();
        // bit count of the first rook entry
        bytes[WORD..2 * WORD].copy_from_slice(&14u64.to_ne_bytes());
        assert_eq!(
            AttackTables::from_bytes(&bytes),
            Err(TableError::InvalidBitCount { slider: Slider::Rook, square: Square::A1, bits: 14 })
        );
    }
}
