//! Contains structures to represent, apply and undo moves
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::ops::{Deref, DerefMut};
use lazy_static::lazy_static;
use regex::Regex;
use super::*;
use super::super::tables::AttackTables;
use super::super::error::ParseMoveError;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A move from one square to another, with everything needed to undo it exactly
///
/// A `GameMove` is only meaningful for the state it was created from (see
/// [`GameState::get_game_move`](struct.GameState.html#method.get_game_move)). Pawns reaching
/// the last row are always promoted to queens.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GameMove {
    from: Square,
    to: Square,
    piece: GamePiece,
    piece_index: u8,
    captured: Option<(GamePiece, u8)>,
    promotion: bool,
}

impl GameMove {
    /// The square the piece moves from
    pub fn from(&self) -> Square {
        self.from
    }

    /// The square the piece moves to
    pub fn to(&self) -> Square {
        self.to
    }

    /// The piece being moved
    pub fn piece(&self) -> GamePiece {
        self.piece
    }

    /// The piece being captured, if any
    pub fn captured(&self) -> Option<GamePiece> {
        self.captured.map(|(piece, _)| piece)
    }

    /// Returns `true` if the move promotes a pawn
    pub fn is_promotion(&self) -> bool {
        self.promotion
    }
}

impl fmt::Display for GameMove {
    /// Formats the move in coordinate notation, such as `e2e4` or `a7a8q`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.promotion {
            write!(f, "{}{}q", self.from, self.to)
        } else {
            write!(f, "{}{}", self.from, self.to)
        }
    }
}

lazy_static! {
    static ref MOVE_REGEX: Regex = Regex::new(r"^([a-h][1-8])([a-h][1-8])q?$").expect("INFALLIBLE");
}

impl GameState {
    /// Describes moving the piece on `from` to `to` in the current state
    ///
    /// Returns `None` if there is no piece on `from`. Nothing checks that the move is allowed;
    /// use [`check_game_move`](#method.check_game_move) or
    /// [`generate_all_moves`](#method.generate_all_moves) for that.
    pub fn get_game_move(&self, from: Square, to: Square) -> Option<GameMove> {
        let piece = self.position.piece_at(from)?;
        let index = self.position.pieces(piece.side(), piece.piece_type()).index_of(from)?;

        let captured = match self.position.piece_at(to) {
            Some(target) => {
                let target_index = self.position.pieces(target.side(), target.piece_type())
                    .index_of(to)?;
                Some((target, target_index as u8))
            },
            None => None,
        };

        let promotion = piece.piece_type() == PieceType::Pawn
            && to.row() == piece.side().promotion_row();

        Some(GameMove { from, to, piece, piece_index: index as u8, captured, promotion })
    }

    /// Applies `mv` to the state and passes the turn to the other side
    pub fn record_game_move(&mut self, mv: GameMove) {
        let side = mv.piece.side();
        let pos = &mut self.position;
        debug_assert_eq!(pos.board[mv.from as usize], Some(mv.piece));

        if let Some((captured, index)) = mv.captured {
            let opp = captured.side() as usize;
            let removed = pos.pieces[opp][captured.piece_type() as usize].remove(index as usize);
            debug_assert_eq!(removed, mv.to);
            pos.side_occupancy[opp].remove(mv.to);
        }

        pos.board[mv.from as usize] = None;
        pos.side_occupancy[side as usize].remove(mv.from);
        pos.side_occupancy[side as usize].insert(mv.to);

        if mv.promotion {
            pos.pieces[side as usize][PieceType::Pawn as usize].remove(mv.piece_index as usize);
            pos.pieces[side as usize][PieceType::Queen as usize].push(mv.to);
            pos.board[mv.to as usize] = Some(GamePiece::new(side, PieceType::Queen));
        } else {
            pos.pieces[side as usize][mv.piece.piece_type() as usize].set(mv.piece_index as usize, mv.to);
            pos.board[mv.to as usize] = Some(mv.piece);
        }

        self.current_side = !self.current_side;
    }

    /// Undoes `mv`, which must be the move most recently recorded on this state
    ///
    /// The state afterwards is identical to the one before `record_game_move`, including the
    /// order of every piece list.
    pub fn rollback_game_move(&mut self, mv: GameMove) {
        let side = mv.piece.side();
        let pos = &mut self.position;

        self.current_side = !self.current_side;

        if mv.promotion {
            let queen = pos.pieces[side as usize][PieceType::Queen as usize].pop();
            debug_assert_eq!(queen, Some(mv.to));
            pos.pieces[side as usize][PieceType::Pawn as usize].insert(mv.piece_index as usize, mv.from);
        } else {
            pos.pieces[side as usize][mv.piece.piece_type() as usize].set(mv.piece_index as usize, mv.from);
        }

        pos.board[mv.from as usize] = Some(mv.piece);
        pos.side_occupancy[side as usize].remove(mv.to);
        pos.side_occupancy[side as usize].insert(mv.from);

        match mv.captured {
            Some((captured, index)) => {
                let opp = captured.side() as usize;
                pos.pieces[opp][captured.piece_type() as usize].insert(index as usize, mv.to);
                pos.side_occupancy[opp].insert(mv.to);
                pos.board[mv.to as usize] = Some(captured);
            },
            None => pos.board[mv.to as usize] = None,
        }
    }

    /// Parses a move in coordinate notation, such as `e2e4`, for the side to move
    ///
    /// The move must be legal in the current state. A trailing `q` on a promotion is accepted
    /// but not required.
    pub fn parse_move(&mut self, tables: &AttackTables, text: &str)
        -> std::result::Result<GameMove, ParseMoveError>
    {
        let caps = MOVE_REGEX.captures(text.trim()).ok_or(ParseMoveError::Syntax)?;
        let from: Square = caps[1].parse().map_err(|_| ParseMoveError::Syntax)?;
        let to: Square = caps[2].parse().map_err(|_| ParseMoveError::Syntax)?;

        match self.piece_at(from) {
            Some(piece) if piece.side() == self.current_side => {},
            _ => return Err(ParseMoveError::NoPiece),
        }

        self.generate_all_moves(tables)
            .into_iter()
            .find(|mv| mv.from == from && mv.to == to)
            .ok_or(ParseMoveError::IllegalMove)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A move that has been recorded on a state, and is rolled back when this guard is dropped
///
/// The guard dereferences to the state, so moves can be nested by applying further moves to it.
///
/// ```rust
/// use bitmove::chess::{AppliedMove, GameState, Square};
///
/// let mut state = GameState::new();
/// let mv = state.get_game_move(Square::E2, Square::E4).unwrap();
/// {
///     let after = AppliedMove::new(&mut state, mv);
///     assert!(after.piece_at(Square::E2).is_none());
/// }
/// assert_eq!(state, GameState::new());
/// ```
#[derive(Debug)]
pub struct AppliedMove<'a> {
    state: &'a mut GameState,
    mv: GameMove,
}

impl<'a> AppliedMove<'a> {
    /// Records `mv` on `state`
    pub fn new(state: &'a mut GameState, mv: GameMove) -> AppliedMove<'a> {
        state.record_game_move(mv);
        AppliedMove { state, mv }
    }

    /// The move that was applied
    pub fn game_move(&self) -> GameMove {
        self.mv
    }
}

impl<'a> Deref for AppliedMove<'a> {
    type Target = GameState;

    fn deref(&self) -> &GameState {
        self.state
    }
}

impl<'a> DerefMut for AppliedMove<'a> {
    fn deref_mut(&mut self) -> &mut GameState {
        self.state
    }
}

impl<'a> Drop for AppliedMove<'a> {
    fn drop(&mut self) {
        self.state.rollback_game_move(self.mv);
    }
}
