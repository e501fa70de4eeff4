//! Contains structures related to the `GameState`
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;
use super::*;
use super::bitboard::Bitboard;

use PieceType::*;

pub mod moves;
mod query;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A piece of a given type and side, packed into a byte
///
/// The piece type is stored in the low three bits and the side in bit 3.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GamePiece(u8);

impl GamePiece {
    const SIDE_BIT: u8 = 0b1000;
    const TYPE_MASK: u8 = 0b0111;

    /// Creates a piece
    pub fn new(side: Side, piece_type: PieceType) -> GamePiece {
        GamePiece(((side as u8) << 3) | piece_type as u8)
    }

    /// Returns the side the piece belongs to
    pub fn side(self) -> Side {
        if self.0 & Self::SIDE_BIT == 0 { Side::White } else { Side::Black }
    }

    /// Returns the type of the piece
    pub fn piece_type(self) -> PieceType {
        PieceType::try_from((self.0 & Self::TYPE_MASK) as usize).expect("INFALLIBLE")
    }

    /// Returns the packed byte
    pub fn bits(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for GamePiece {
    type Error = Error;

    fn try_from(bits: u8) -> Result<Self> {
        if bits & !(Self::SIDE_BIT | Self::TYPE_MASK) == 0
            && ((bits & Self::TYPE_MASK) as usize) < PieceType::COUNT {
            Ok(GamePiece(bits))
        } else {
            Err(Error::TryFromIntError)
        }
    }
}

impl fmt::Display for GamePiece {
    /// Formats the piece as a letter, uppercase for white and lowercase for black
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = self.piece_type().to_string();
        match self.side() {
            Side::White => letter.fmt(f),
            Side::Black => letter.to_lowercase().fmt(f),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The squares of one side's pieces of one type, in a fixed-capacity buffer
///
/// The order of the squares is preserved by every operation, so undoing a move can put a
/// captured piece back exactly where it was.
#[derive(Debug, Copy, Clone)]
pub struct PieceList {
    squares: [Square; PieceList::CAPACITY],
    len: u8,
}

impl PieceList {
    /// Enough room for two original pieces plus eight promoted pawns
    pub const CAPACITY: usize = 10;

    fn new() -> PieceList {
        PieceList { squares: [Square::A1; PieceList::CAPACITY], len: 0 }
    }

    /// Number of pieces in the list
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Returns `true` if the list is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The squares, in list order
    pub fn as_slice(&self) -> &[Square] {
        &self.squares[..self.len()]
    }

    /// Iterates over the squares in list order
    pub fn iter(&self) -> impl Iterator<Item=Square> + '_ {
        self.as_slice().iter().copied()
    }

    /// Returns the index of `sq` in the list
    pub fn index_of(&self, sq: Square) -> Option<usize> {
        self.as_slice().iter().position(|&s| s == sq)
    }

    /// The squares as a bitboard
    pub fn bitboard(&self) -> Bitboard {
        self.iter().collect()
    }

    fn push(&mut self, sq: Square) {
        assert!(self.len() < Self::CAPACITY, "piece list is full");
        self.squares[self.len()] = sq;
        self.len += 1;
    }

    fn pop(&mut self) -> Option<Square> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            Some(self.squares[self.len()])
        }
    }

    fn set(&mut self, index: usize, sq: Square) {
        assert!(index < self.len(), "piece list index out of range");
        self.squares[index] = sq;
    }

    fn insert(&mut self, index: usize, sq: Square) {
        let len = self.len();
        assert!(index <= len && len < Self::CAPACITY, "piece list insert out of range");
        self.squares.copy_within(index..len, index + 1);
        self.squares[index] = sq;
        self.len += 1;
    }

    fn remove(&mut self, index: usize) -> Square {
        let len = self.len();
        assert!(index < len, "piece list index out of range");
        let sq = self.squares[index];
        self.squares.copy_within(index + 1..len, index);
        self.len -= 1;
        sq
    }
}

// slots past `len` are stale and don't take part in comparisons
impl PartialEq for PieceList {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for PieceList { }

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The arrangement of pieces on the board
///
/// The same information is kept three ways: which piece stands on each square (the mailbox),
/// which squares each side occupies, and where each side's pieces of each type are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamePosition {
    board: [Option<GamePiece>; Square::COUNT],
    pieces: [[PieceList; PieceType::COUNT]; Side::COUNT],
    side_occupancy: [Bitboard; Side::COUNT],
}

impl GamePosition {
    /// Returns a position with an empty board
    pub fn empty() -> GamePosition {
        GamePosition {
            board: [None; Square::COUNT],
            pieces: [[PieceList::new(); PieceType::COUNT]; Side::COUNT],
            side_occupancy: [Bitboard::new(); Side::COUNT],
        }
    }

    /// Returns the piece on `sq`, if any
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<GamePiece> {
        self.board[sq as usize]
    }

    /// Returns the squares occupied by `side`
    #[inline]
    pub fn side_occupancy(&self, side: Side) -> Bitboard {
        self.side_occupancy[side as usize]
    }

    /// Returns the squares occupied by either side
    #[inline]
    pub fn occupancy(&self) -> Bitboard {
        self.side_occupancy[0] | self.side_occupancy[1]
    }

    /// Returns the list of `side`'s pieces of the given type
    pub fn pieces(&self, side: Side, piece_type: PieceType) -> &PieceList {
        &self.pieces[side as usize][piece_type as usize]
    }

    /// Returns the squares of `side`'s pieces of the given type
    pub fn piece_occupancy(&self, side: Side, piece_type: PieceType) -> Bitboard {
        self.pieces(side, piece_type).bitboard()
    }

    /// Returns the square of `side`'s king, or `None` if it has none
    pub fn king_square(&self, side: Side) -> Option<Square> {
        self.pieces(side, King).iter().next()
    }

    /// Puts `piece` on the empty square `sq`
    ///
    /// # Panics
    ///
    /// Panics if `sq` is occupied or the piece list for that piece is full.
    pub fn put(&mut self, sq: Square, piece: GamePiece) {
        assert!(self.board[sq as usize].is_none(), "{} is already occupied", sq);

        let side = piece.side() as usize;
        self.board[sq as usize] = Some(piece);
        self.side_occupancy[side].insert(sq);
        self.pieces[side][piece.piece_type() as usize].push(sq);
    }

    /// Returns `true` if the mailbox, occupancy bitboards and piece lists all agree
    pub fn is_consistent(&self) -> bool {
        if self.side_occupancy[0].intersects(self.side_occupancy[1]) {
            return false;
        }

        for sq in Square::all() {
            let occupied = self.occupancy().contains(sq);
            match self.board[sq as usize] {
                Some(piece) => {
                    if !self.side_occupancy(piece.side()).contains(sq)
                        || !self.pieces(piece.side(), piece.piece_type()).as_slice().contains(&sq)
                    {
                        return false;
                    }
                },
                None => if occupied {
                    return false;
                },
            }
        }

        let listed: usize = self.pieces.iter().flatten().map(|list| list.len()).sum();
        listed == self.occupancy().bit_count()
    }
}

impl Default for GamePosition {
    fn default() -> Self {
        GamePosition::empty()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The position together with whose turn it is
///
/// A `GameState` is changed in place by `record_game_move` and restored by
/// `rollback_game_move`. See [`AppliedMove`](../struct.AppliedMove.html) for a guard that pairs
/// the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    position: GamePosition,
    current_side: Side,
    player_side: Side,
}

const BACK_ROW: [PieceType; Column::COUNT] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

impl GameState {
    /// Returns the standard starting state, with white to move
    pub fn new() -> GameState {
        let mut state = GameState::empty(Side::White);

        for &(side, back, pawns) in [(Side::White, Row::R1, Row::R2), (Side::Black, Row::R8, Row::R7)].iter() {
            for (c, &piece_type) in BACK_ROW.iter().enumerate() {
                let column = Column::try_from(c).expect("INFALLIBLE");
                state.position.put(Square::from_coord(back, column), GamePiece::new(side, piece_type));
            }
            for c in 0..Column::COUNT {
                let column = Column::try_from(c).expect("INFALLIBLE");
                state.position.put(Square::from_coord(pawns, column), GamePiece::new(side, Pawn));
            }
        }

        state
    }

    /// Returns a state with an empty board and `current_side` to move
    pub fn empty(current_side: Side) -> GameState {
        GameState {
            position: GamePosition::empty(),
            current_side,
            player_side: Side::White,
        }
    }

    /// The arrangement of the pieces
    pub fn position(&self) -> &GamePosition {
        &self.position
    }

    /// Puts `piece` on the empty square `sq`
    ///
    /// # Panics
    ///
    /// Panics if `sq` is occupied.
    pub fn put(&mut self, sq: Square, piece: GamePiece) {
        self.position.put(sq, piece);
    }

    /// The side whose turn it is
    pub fn current_side(&self) -> Side {
        self.current_side
    }

    /// The side played by the user
    pub fn player_side(&self) -> Side {
        self.player_side
    }

    /// Sets the side played by the user
    pub fn set_player_side(&mut self, side: Side) {
        self.player_side = side;
    }

    /// Returns the piece on `sq`, if any
    pub fn piece_at(&self, sq: Square) -> Option<GamePiece> {
        self.position.piece_at(sq)
    }

    /// Returns the squares occupied by `side`
    pub fn side_occupancy(&self, side: Side) -> Bitboard {
        self.position.side_occupancy(side)
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}

impl FromStr for GameState {
    type Err = Error;

    /// Parses the piece placement and side-to-move fields of a FEN string
    ///
    /// Any further fields are ignored: castling and en passant aren't part of the state.
    fn from_str(s: &str) -> Result<Self> {
        let mut fields = s.split_whitespace();
        let board = fields.next().ok_or(Error::ParseError)?;
        let side = match fields.next() {
            Some(side) => side.parse()?,
            None => Side::White,
        };

        let mut state = GameState::empty(side);
        let rows: Vec<&str> = board.split('/').collect();
        if rows.len() != Row::COUNT {
            return Err(Error::ParseError);
        }

        for (r, text) in rows.iter().enumerate() {
            let row = Row::try_from(Row::COUNT - 1 - r)?;
            let mut c = 0;
            for ch in text.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    c += skip as usize;
                } else {
                    let column = Column::try_from(c)?;
                    let side = if ch.is_uppercase() { Side::White } else { Side::Black };
                    let piece_type: PieceType = ch.to_string().parse()?;
                    let sq = Square::from_coord(row, column);
                    if state.position.pieces(side, piece_type).len() == PieceList::CAPACITY {
                        return Err(Error::ParseError);
                    }
                    state.position.put(sq, GamePiece::new(side, piece_type));
                    c += 1;
                }
                if c > Column::COUNT {
                    return Err(Error::ParseError);
                }
            }
            if c != Column::COUNT {
                return Err(Error::ParseError);
            }
        }

        Ok(state)
    }
}

impl fmt::Display for GameState {
    /// Formats the state as the first two fields of a FEN string
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board = String::new();

        for r in (0..Row::COUNT).rev() {
            let row = Row::try_from(r).expect("INFALLIBLE");
            let mut empty = 0;
            for c in 0..Column::COUNT {
                let column = Column::try_from(c).expect("INFALLIBLE");
                match self.position.piece_at(Square::from_coord(row, column)) {
                    Some(piece) => {
                        if empty > 0 {
                            board += &empty.to_string();
                            empty = 0;
                        }
                        board += &piece.to_string();
                    },
                    None => empty += 1,
                }
            }
            if empty > 0 {
                board += &empty.to_string();
            }
            if r > 0 {
                board.push('/');
            }
        }

        let side = match self.current_side {
            Side::White => "w",
            Side::Black => "b",
        };

        write!(f, "{} {}", board, side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w";

    #[test]
    fn game_piece_packs_type_and_side() {
        for &side in Side::ALL.iter() {
            for &piece_type in PieceType::ALL.iter() {
                let piece = GamePiece::new(side, piece_type);
                assert_eq!(piece.side(), side);
                assert_eq!(piece.piece_type(), piece_type);
                assert_eq!(GamePiece::try_from(piece.bits()).unwrap(), piece);
            }
        }
        assert_eq!(GamePiece::new(Side::Black, Rook).bits(), 0b1000);
        assert!(GamePiece::try_from(0b0110).is_err());
        assert!(GamePiece::try_from(0b1_0000).is_err());
    }

    #[test]
    fn piece_list_keeps_order() {
        let mut list = PieceList::new();
        list.push(Square::A1);
        list.push(Square::B1);
        list.push(Square::C1);
        assert_eq!(list.remove(1), Square::B1);
        assert_eq!(list.as_slice(), &[Square::A1, Square::C1]);
        list.insert(1, Square::B1);
        assert_eq!(list.as_slice(), &[Square::A1, Square::B1, Square::C1]);
        list.set(0, Square::H8);
        assert_eq!(list.index_of(Square::H8), Some(0));
        assert_eq!(list.pop(), Some(Square::C1));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn initial_state() {
        let state = GameState::new();
        let white = GamePiece::new(Side::White, Rook);

        assert_eq!(state.piece_at(Square::A1), Some(white));
        assert_eq!(state.piece_at(Square::H1), Some(white));
        for sq in 8..16usize {
            let sq = Square::try_from(sq).unwrap();
            assert_eq!(state.piece_at(sq), Some(GamePiece::new(Side::White, Pawn)));
        }
        assert_eq!(Square::E8 as usize, 60);
        assert_eq!(state.piece_at(Square::E8), Some(GamePiece::new(Side::Black, King)));

        let white_occ = state.side_occupancy(Side::White);
        let black_occ = state.side_occupancy(Side::Black);
        assert_eq!(white_occ.bit_count(), 16);
        assert_eq!(black_occ.bit_count(), 16);
        assert!(white_occ.is_disjoint(black_occ));

        assert_eq!(state.current_side(), Side::White);
        assert!(state.position().is_consistent());
        assert_eq!(state.position().pieces(Side::White, Rook).as_slice(), &[Square::A1, Square::H1]);
        assert_eq!(state.position().king_square(Side::Black), Some(Square::E8));
    }

    #[test]
    fn fen_round_trip() {
        let state: GameState = START.parse().unwrap();
        assert_eq!(state, GameState::new());
        assert_eq!(state.to_string(), START);

        let fen = "4k3/8/8/3q4/8/8/PPP5/4K3 b";
        assert_eq!(fen.parse::<GameState>().unwrap().to_string(), fen);
    }

    #[test]
    fn bad_fen_is_an_error() {
        assert!("".parse::<GameState>().is_err());
        assert!("8/8/8 w".parse::<GameState>().is_err());
        assert!("9/8/8/8/8/8/8/8 w".parse::<GameState>().is_err());
        assert!("7/8/8/8/8/8/8/8 w".parse::<GameState>().is_err());
        assert!("x7/8/8/8/8/8/8/8 w".parse::<GameState>().is_err());
        assert!("8/8/8/8/8/8/8/8 x".parse::<GameState>().is_err());
    }

    #[test]
    fn put_keeps_position_consistent() {
        let mut state = GameState::empty(Side::Black);
        state.put(Square::D4, GamePiece::new(Side::Black, Queen));
        assert!(state.position().is_consistent());
        assert_eq!(state.position().piece_occupancy(Side::Black, Queen), Bitboard::from(Square::D4));
    }

    #[test]
    #[should_panic]
    fn put_on_occupied_square_panics() {
        let mut state = GameState::new();
        state.put(Square::E2, GamePiece::new(Side::White, Queen));
    }
}
