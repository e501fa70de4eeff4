//! The `chess` module holds the move-generation core: bitboards, magic attack tables, the game
//! state and the move generator.
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::ops;
use std::fmt;
use std::mem;
use std::str::FromStr;
use std::convert::TryFrom;
use error::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Which side a piece or player is on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Side {
    White = 0,
    Black = 1,
}

impl Side {
    /// The number of sides
    pub const COUNT: usize = 2;

    /// Both sides, in index order
    pub const ALL: [Side; Side::COUNT] = [Side::White, Side::Black];

    /// Returns the row on which this side's pawns start
    pub fn pawn_row(self) -> Row {
        match self {
            Side::White => Row::R2,
            Side::Black => Row::R7,
        }
    }

    /// Returns the row on which this side's pawns promote
    pub fn promotion_row(self) -> Row {
        match self {
            Side::White => Row::R8,
            Side::Black => Row::R1,
        }
    }

    /// Returns `1` for white and `-1` for black: the direction pawns move along the rows
    pub fn forward(self) -> i8 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }
}

impl ops::Not for Side {
    type Output = Side;

    /// Returns the opposite side
    ///
    /// # Example
    /// ```
    /// use bitmove::chess::Side;
    /// assert_eq!(!Side::White, Side::Black);
    /// assert_eq!(!Side::Black, Side::White);
    /// ```
    fn not(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => "white".fmt(f),
            Side::Black => "black".fmt(f),
        }
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "w" | "white" => Ok(Side::White),
            "b" | "black" => Ok(Side::Black),
            _ => Err(Error::ParseError),
        }
    }
}

impl Default for Side {
    fn default() -> Self {
        Side::White
    }
}

impl TryFrom<usize> for Side {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        match value {
            0 => Ok(Side::White),
            1 => Ok(Side::Black),
            _ => Err(Error::TryFromIntError),
        }
    }
}

impl From<Side> for usize {
    fn from(value: Side) -> Self {
        value as Self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The type of a chess piece
///
/// The discriminants are the values stored in the low bits of a packed
/// [`GamePiece`](struct.GamePiece.html).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum PieceType {
    Rook = 0,
    Knight = 1,
    Bishop = 2,
    Queen = 3,
    King = 4,
    Pawn = 5,
}

impl PieceType {
    /// The number of piece types
    pub const COUNT: usize = PieceType::Pawn as usize + 1;

    /// Every piece type, in discriminant order
    pub const ALL: [PieceType; PieceType::COUNT] = [
        PieceType::Rook,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Queen,
        PieceType::King,
        PieceType::Pawn,
    ];
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceType::Rook => "R",
            PieceType::Knight => "N",
            PieceType::Bishop => "B",
            PieceType::Queen => "Q",
            PieceType::King => "K",
            PieceType::Pawn => "P",
        }.fmt(f)
    }
}

impl FromStr for PieceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "R"|"r" => Ok(PieceType::Rook),
            "N"|"n" => Ok(PieceType::Knight),
            "B"|"b" => Ok(PieceType::Bishop),
            "Q"|"q" => Ok(PieceType::Queen),
            "K"|"k" => Ok(PieceType::King),
            "P"|"p" => Ok(PieceType::Pawn),
            _       => Err(Error::ParseError),
        }
    }
}

impl TryFrom<usize> for PieceType {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        PieceType::ALL.get(value).copied().ok_or(Error::TryFromIntError)
    }
}

impl From<PieceType> for usize {
    fn from(value: PieceType) -> Self {
        value as Self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Vertical column of the board, labeled from left to right from White's perspective as `A`
/// through `H`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Column {
    // discriminants are spelled out so nothing can go wrong when we use transmute later
    A = 0, B = 1, C = 2, D = 3, E = 4, F = 5, G = 6, H = 7,
}

impl Column {
    /// The number of columns
    pub const COUNT: usize = Column::H as usize + 1;
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = (b'a' + *self as u8) as char;
        c.fmt(f)
    }
}

impl FromStr for Column {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.as_bytes() {
            [c @ b'a'..=b'h'] => Column::try_from((c - b'a') as usize),
            [c @ b'A'..=b'H'] => Column::try_from((c - b'A') as usize),
            _ => Err(Error::ParseError),
        }
    }
}

impl TryFrom<usize> for Column {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        if value < Self::COUNT {
            unsafe { Ok(mem::transmute::<u8, Column>(value as u8)) }
        } else {
            Err(Error::TryFromIntError)
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Horizontal row of the board, labeled from nearest to farthest from White's perspective as
/// `R1` through `R8`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Row {
    // discriminants are spelled out so nothing can go wrong when we use transmute later
    R1 = 0, R2 = 1, R3 = 2, R4 = 3, R5 = 4, R6 = 5, R7 = 6, R8 = 7,
}

impl Row {
    /// The number of rows
    pub const COUNT: usize = Row::R8 as usize + 1;
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (*self as usize + 1).fmt(f)
    }
}

impl FromStr for Row {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.as_bytes() {
            [c @ b'1'..=b'8'] => Row::try_from((c - b'1') as usize),
            _ => Err(Error::ParseError),
        }
    }
}

impl TryFrom<usize> for Row {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        if value < Self::COUNT {
            unsafe { Ok(mem::transmute::<u8, Row>(value as u8)) }
        } else {
            Err(Error::TryFromIntError)
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A specific square on the board, numbered row-major: `row * 8 + column`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Square {
    // discriminants are spelled out so nothing can go wrong when we use transmute later
    A1 = 0o00, B1 = 0o01, C1 = 0o02, D1 = 0o03, E1 = 0o04, F1 = 0o05, G1 = 0o06, H1 = 0o07,
    A2 = 0o10, B2 = 0o11, C2 = 0o12, D2 = 0o13, E2 = 0o14, F2 = 0o15, G2 = 0o16, H2 = 0o17,
    A3 = 0o20, B3 = 0o21, C3 = 0o22, D3 = 0o23, E3 = 0o24, F3 = 0o25, G3 = 0o26, H3 = 0o27,
    A4 = 0o30, B4 = 0o31, C4 = 0o32, D4 = 0o33, E4 = 0o34, F4 = 0o35, G4 = 0o36, H4 = 0o37,
    A5 = 0o40, B5 = 0o41, C5 = 0o42, D5 = 0o43, E5 = 0o44, F5 = 0o45, G5 = 0o46, H5 = 0o47,
    A6 = 0o50, B6 = 0o51, C6 = 0o52, D6 = 0o53, E6 = 0o54, F6 = 0o55, G6 = 0o56, H6 = 0o57,
    A7 = 0o60, B7 = 0o61, C7 = 0o62, D7 = 0o63, E7 = 0o64, F7 = 0o65, G7 = 0o66, H7 = 0o67,
    A8 = 0o70, B8 = 0o71, C8 = 0o72, D8 = 0o73, E8 = 0o74, F8 = 0o75, G8 = 0o76, H8 = 0o77,
}

impl Square {
    /// The number of squares
    pub const COUNT: usize = Square::H8 as usize + 1;

    /// Returns a square from its row and column
    pub fn from_coord(row: Row, column: Column) -> Square {
        Square::try_from(((row as usize) << 3) + column as usize).expect("INFALLIBLE")
    }

    /// Returns the square at the given row and column offsets from this one, or `None` if that
    /// would leave the board
    pub fn offset(self, rows: i8, columns: i8) -> Option<Square> {
        let row = self.row() as i8 + rows;
        let column = self.column() as i8 + columns;

        if (0..8).contains(&row) && (0..8).contains(&column) {
            Some(Square::from_coord(
                Row::try_from(row as usize).ok()?,
                Column::try_from(column as usize).ok()?,
            ))
        } else {
            None
        }
    }

    /// Returns the square's row
    pub fn row(self) -> Row {
        Row::try_from((self as usize) >> 3).expect("INFALLIBLE")
    }

    /// Returns the square's column
    pub fn column(self) -> Column {
        Column::try_from((self as usize) & 7).expect("INFALLIBLE")
    }

    /// Returns an iterator over all 64 squares in ascending order
    pub fn all() -> impl Iterator<Item=Square> {
        (0..Square::COUNT).map(|i| Square::try_from(i).expect("INFALLIBLE"))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.column().to_string() + &self.row().to_string()).fmt(f)
    }
}

impl FromStr for Square {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() == 2 && s.is_char_boundary(1) {
            Ok(Square::from_coord(s[1..].parse()?, s[..1].parse()?))
        } else {
            Err(Error::ParseError)
        }
    }
}

impl Default for Square {
    fn default() -> Self {
        Square::A1
    }
}

impl TryFrom<usize> for Square {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        if value < Self::COUNT {
            unsafe { Ok(mem::transmute::<u8, Square>(value as u8)) }
        } else {
            Err(Error::TryFromIntError)
        }
    }
}

impl From<Square> for usize {
    fn from(value: Square) -> Self {
        value as Self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
pub mod bitboard;
pub mod magic;
pub mod tables;
mod position;
pub use position::{GamePiece, GamePosition, GameState, PieceList};
pub use position::moves::{GameMove, AppliedMove};
pub use tables::AttackTables;

pub mod variations;

pub mod error;


#[cfg(test)]
mod piece_type_tests {
    use std::convert::TryFrom;
    use super::PieceType;

    #[test]
    fn display_and_fromstr_agree() {
        for &piece in PieceType::ALL.iter() {
            assert_eq!(format!("{}", piece).parse::<PieceType>().unwrap(), piece);
            assert_eq!(format!("{}", piece).to_lowercase().parse::<PieceType>().unwrap(), piece);
        }
        assert!("X".parse::<PieceType>().is_err());
    }

    #[test]
    fn from_usize_is_correct() {
        assert_eq!(PieceType::try_from(0).unwrap(), PieceType::Rook);
        assert_eq!(PieceType::try_from(4).unwrap(), PieceType::King);
        assert_eq!(PieceType::try_from(5).unwrap(), PieceType::Pawn);
        assert!(PieceType::try_from(6).is_err());
    }
}

#[cfg(test)]
mod square_tests {
    use std::convert::TryFrom;
    use super::*;

    #[test]
    fn squares_are_row_major() {
        assert_eq!(Square::from_coord(Row::R1, Column::A) as usize, 0);
        assert_eq!(Square::from_coord(Row::R1, Column::H) as usize, 7);
        assert_eq!(Square::from_coord(Row::R2, Column::A) as usize, 8);
        assert_eq!(Square::from_coord(Row::R8, Column::E) as usize, 60);
        assert_eq!(Square::E8 as usize, 60);
    }

    #[test]
    fn row_and_column_methods_match_from_coord() {
        for sq in Square::all() {
            assert_eq!(Square::from_coord(sq.row(), sq.column()), sq);
            assert_eq!(sq as usize, sq.row() as usize * 8 + sq.column() as usize);
        }
    }

    #[test]
    fn display_and_fromstr_traits_agree() {
        assert_eq!(format!("{}", Square::A1), "a1");
        assert_eq!(format!("{}", Square::E8), "e8");
        for sq in Square::all() {
            assert_eq!(format!("{}", sq).parse::<Square>().unwrap(), sq);
        }
        assert!("a".parse::<Square>().is_err());
        assert!("x1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("a1x".parse::<Square>().is_err());
    }

    #[test]
    fn offset_stays_on_the_board() {
        assert_eq!(Square::A1.offset(1, 2), Some(Square::C2));
        assert_eq!(Square::A1.offset(-1, 0), None);
        assert_eq!(Square::H8.offset(0, 1), None);
        assert_eq!(Square::E4.offset(-2, -1), Some(Square::D2));
    }

    #[test]
    fn out_of_bound_usize_conversion_is_an_error() {
        assert!(Square::try_from(Square::COUNT).is_err());
    }
}
