//! Static evaluation of a game state
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use crate::chess::{GameState, PieceType, Side, Square};

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Scores a state from the point of view of one side
///
/// Higher is better for `side`. Implementations should be antisymmetric: swapping `side` negates
/// the score.
pub trait Evaluator {
    /// Returns the estimated value of `state` for `side`
    fn eval(&self, state: &GameState, side: Side) -> i32;
}

const PIECE_VAL: [i32; PieceType::COUNT] = [500, 325, 335, 975, 0, 100];

const BISHOP_PAIR: i32 = 30;
const TEMPO: i32 = 10;

// Rows are relative to the side being scored: the first row is its back row.
const PIECE_SQUARE_VAL: [[[i32; 8]; 8]; PieceType::COUNT] = [
    [ // Rook
        [  0,   0,   0,   2,   2,   0,   0,   0],
        [ -5,   0,   0,   0,   0,   0,   0,  -5],
        [ -5,   0,   0,   0,   0,   0,   0,  -5],
        [ -5,   0,   0,   0,   0,   0,   0,  -5],
        [ -5,   0,   0,   0,   0,   0,   0,  -5],
        [ -5,   0,   0,   0,   0,   0,   0,  -5],
        [  5,  10,  10,  10,  10,  10,  10,   5],
        [  5,   5,   5,   5,   5,   5,   5,   5],
    ],
    [ // Knight
        [-16, -12,  -8,  -8,  -8,  -8, -12, -16],
        [ -8,   0,   1,   2,   2,   1,   0,  -8],
        [ -8,   0,   4,   6,   6,   4,   0,  -8],
        [ -8,   0,   6,   8,   8,   6,   0,  -8],
        [ -8,   0,   6,   8,   8,   6,   0,  -8],
        [ -8,   0,   4,   6,   6,   4,   0,  -8],
        [ -8,   0,   0,   0,   0,   0,   0,  -8],
        [ -8,  -8,  -8,  -8,  -8,  -8,  -8,  -8],
    ],
    [ // Bishop
        [ -4,  -4, -12,  -4,  -4, -12,  -4,  -4],
        [ -4,   2,   1,   1,   1,   1,   2,  -4],
        [ -4,   1,   2,   4,   4,   2,   1,  -4],
        [ -4,   0,   4,   6,   6,   4,   0,  -4],
        [ -4,   0,   4,   6,   6,   4,   0,  -4],
        [ -4,   0,   2,   4,   4,   2,   0,  -4],
        [ -4,   0,   0,   0,   0,   0,   0,  -4],
        [ -4,  -4,  -4,  -4,  -4,  -4,  -4,  -4],
    ],
    [ // Queen
        [ -5,  -5,  -5,  -5,  -5,  -5,  -5,  -5],
        [  0,   0,   1,   1,   1,   1,   0,   0],
        [  0,   0,   1,   2,   2,   1,   0,   0],
        [  0,   0,   2,   3,   3,   2,   0,   0],
        [  0,   0,   2,   3,   3,   2,   0,   0],
        [  0,   0,   1,   2,   2,   1,   0,   0],
        [  0,   0,   1,   1,   1,   1,   0,   0],
        [  0,   0,   0,   0,   0,   0,   0,   0],
    ],
    [ // King, middle game
        [ 40,  50,  30,  10,  10,  30,  50,  40],
        [ 30,  40,  20,   0,   0,  20,  40,  30],
        [ 10,  20,   0, -20, -20,   0,  20,  10],
        [  0,  10, -10, -30, -30, -10,  10,   0],
        [-10,   0, -20, -40, -40, -20,   0, -10],
        [-20, -10, -30, -50, -50, -30, -10, -20],
        [-30, -20, -40, -60, -60, -40, -20, -30],
        [-40, -30, -50, -70, -70, -50, -30, -40],
    ],
    [ // Pawn
        [  0,   0,   0,   0,   0,   0,   0,   0],
        [ -4,  -4,   1,   5,   5,   1,  -4,  -4],
        [ -6,  -4,   5,  10,  10,   5,  -4,  -6],
        [ -6,  -4,   2,   8,   8,   2,  -4,  -6],
        [ -6,  -4,   1,   2,   2,   1,  -4,  -6],
        [ -6,  -4,   1,   1,   1,   1,  -4,  -6],
        [ 20,  20,  20,  20,  20,  20,  20,  20],
        [  0,   0,   0,   0,   0,   0,   0,   0],
    ],
];

const END_KING_VAL: [[i32; 8]; 8] = [
    [-72, -48, -36, -24, -24, -36, -48, -72],
    [-48, -24, -12,   0,   0, -12, -24, -48],
    [-36, -12,   0,  12,  12,   0, -12, -36],
    [-24,   0,  12,  24,  24,  12,   0, -24],
    [-24,   0,  12,  24,  24,  12,   0, -24],
    [-36, -12,   0,  12,  12,   0, -12, -36],
    [-48, -24, -12,   0,   0, -12, -24, -48],
    [-72, -48, -36, -24, -24, -36, -48, -72],
];

/// Below this much non-pawn material on the board, kings use the endgame table
const ENDGAME_MATERIAL: i32 = 2 * 975 + 2 * 500;

/// Returns the value of a piece type
pub fn piece_val(piece_type: PieceType) -> i32 {
    PIECE_VAL[piece_type as usize]
}

/// Row and column of `sq` as seen from `side`'s end of the board
fn relative(sq: Square, side: Side) -> (usize, usize) {
    let row = sq.row() as usize;
    match side {
        Side::White => (row, sq.column() as usize),
        Side::Black => (7 - row, sq.column() as usize),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Material, piece placement, the bishop pair and a bonus for having the move
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct MaterialEvaluator;

impl MaterialEvaluator {
    fn side_value(&self, state: &GameState, side: Side, endgame: bool) -> i32 {
        let pos = state.position();
        let mut val = 0;

        for &piece_type in PieceType::ALL.iter() {
            for sq in pos.pieces(side, piece_type).iter() {
                let (row, column) = relative(sq, side);
                val += PIECE_VAL[piece_type as usize];
                val += if piece_type == PieceType::King && endgame {
                    END_KING_VAL[row][column]
                } else {
                    PIECE_SQUARE_VAL[piece_type as usize][row][column]
                };
            }
        }

        if pos.pieces(side, PieceType::Bishop).len() >= 2 {
            val += BISHOP_PAIR;
        }

        val
    }
}

impl Evaluator for MaterialEvaluator {
    fn eval(&self, state: &GameState, side: Side) -> i32 {
        let pos = state.position();
        let mut heavy = 0;
        for &s in Side::ALL.iter() {
            for &t in PieceType::ALL.iter() {
                if t != PieceType::Pawn {
                    heavy += pos.pieces(s, t).len() as i32 * piece_val(t);
                }
            }
        }
        let endgame = heavy < ENDGAME_MATERIAL;

        let tempo = if state.current_side() == side { TEMPO } else { -TEMPO };

        self.side_value(state, side, endgame) - self.side_value(state, !side, endgame) + tempo
    }
}
