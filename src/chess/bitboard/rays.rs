//! Computes moves by walking the board one square at a time
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use super::*;

/// Row and column steps of a rook
pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Row and column steps of a bishop
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (-1, -1), (1, -1), (-1, 1)];

const KNIGHT_STEPS: [(i8, i8); 8] = [
    (2, 1), (1, 2), (2, -1), (1, -2), (-2, -1), (-1, -2), (-2, 1), (-1, 2),
];

const KING_STEPS: [(i8, i8); 8] = [
    (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1), (0, -1), (1, -1),
];

/// Returns the squares along each of `directions` that could block a slide from `sq`
///
/// The last square of each ray is left out: a slider always reaches it once it gets that far,
/// whether or not anything stands there.
pub fn blocker_mask(sq: Square, directions: &[(i8, i8)]) -> Bitboard {
    let mut mask = Bitboard::new();

    for &(rows, columns) in directions {
        let mut current = sq;
        while let Some(next) = current.offset(rows, columns) {
            if next.offset(rows, columns).is_none() {
                break;
            }
            mask.insert(next);
            current = next;
        }
    }

    mask
}

/// Returns the squares reached from `sq` along each of `directions`, where each ray stops at
/// (and includes) the first square in `occ`
pub fn slide(sq: Square, directions: &[(i8, i8)], occ: Bitboard) -> Bitboard {
    let mut moves = Bitboard::new();

    for &(rows, columns) in directions {
        let mut current = sq;
        while let Some(next) = current.offset(rows, columns) {
            moves.insert(next);
            if occ.contains(next) {
                break;
            }
            current = next;
        }
    }

    moves
}

/// Blocker mask of a rook on `sq`
pub fn rook_blocker_mask(sq: Square) -> Bitboard {
    blocker_mask(sq, &ROOK_DIRECTIONS)
}

/// Blocker mask of a bishop on `sq`
pub fn bishop_blocker_mask(sq: Square) -> Bitboard {
    blocker_mask(sq, &BISHOP_DIRECTIONS)
}

/// Rook moves from `sq` with the occupied squares given by `occ`
pub fn rook_moves(sq: Square, occ: Bitboard) -> Bitboard {
    slide(sq, &ROOK_DIRECTIONS, occ)
}

/// Bishop moves from `sq` with the occupied squares given by `occ`
pub fn bishop_moves(sq: Square, occ: Bitboard) -> Bitboard {
    slide(sq, &BISHOP_DIRECTIONS, occ)
}

fn steps(sq: Square, steps: &[(i8, i8)]) -> Bitboard {
    steps.iter().filter_map(|&(rows, columns)| sq.offset(rows, columns)).collect()
}

/// Knight moves from `sq` on an empty board
pub fn knight_moves(sq: Square) -> Bitboard {
    steps(sq, &KNIGHT_STEPS)
}

/// King moves from `sq` on an empty board
pub fn king_moves(sq: Square) -> Bitboard {
    steps(sq, &KING_STEPS)
}

/// Forward pawn moves for `side` from `sq` on an empty board: one step, plus a second step when
/// the pawn is on its starting row
pub fn pawn_moves(side: Side, sq: Square) -> Bitboard {
    let forward = side.forward();
    let mut moves = steps(sq, &[(forward, 0)]);

    if sq.row() == side.pawn_row() {
        moves |= steps(sq, &[(2 * forward, 0)]);
    }

    moves
}

/// Diagonal pawn captures for `side` from `sq`
pub fn pawn_captures(side: Side, sq: Square) -> Bitboard {
    let forward = side.forward();
    steps(sq, &[(forward, -1), (forward, 1)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rook_blocker_mask_skips_the_edges() {
        let mask = rook_blocker_mask(Square::A1);
        assert_eq!(mask.bit_count(), 12);
        assert!(!mask.contains(Square::A8));
        assert!(!mask.contains(Square::H1));
        assert!(mask.contains(Square::A7));
        assert!(mask.contains(Square::G1));

        assert_eq!(rook_blocker_mask(Square::D4).bit_count(), 10);
        assert_eq!(rook_blocker_mask(Square::B1).bit_count(), 11);
    }

    #[test]
    fn bishop_blocker_mask_sizes() {
        assert_eq!(bishop_blocker_mask(Square::A1).bit_count(), 6);
        assert_eq!(bishop_blocker_mask(Square::H8).bit_count(), 6);
        assert_eq!(bishop_blocker_mask(Square::B1).bit_count(), 5);
        assert_eq!(bishop_blocker_mask(Square::D4).bit_count(), 9);
        for sq in Square::all() {
            assert!(bishop_blocker_mask(sq).bit_count() <= 9);
            assert!(rook_blocker_mask(sq).bit_count() <= 12);
        }
    }

    #[test]
    fn rook_slides_stop_at_blockers() {
        let moves = rook_moves(Square::A1, Bitboard::new());
        assert_eq!(moves.bit_count(), 14);

        let moves = rook_moves(Square::A1, Square::D1.into());
        assert!(moves.contains(Square::D1));
        assert!(!moves.contains(Square::E1));
        assert_eq!(moves.bit_count(), 10);
    }

    #[test]
    fn bishop_slides_stop_at_blockers() {
        let occ = Bitboard::from(Square::F6) | Square::B2.into();
        let moves = bishop_moves(Square::D4, occ);
        assert!(moves.contains(Square::F6));
        assert!(!moves.contains(Square::G7));
        assert!(moves.contains(Square::B2));
        assert!(!moves.contains(Square::A1));
        assert!(moves.contains(Square::A7));
        assert!(moves.contains(Square::G1));
    }

    #[test]
    fn knight_and_king_steps() {
        let mut moves = knight_moves(Square::H1);
        assert_eq!(moves.pop(), Some(Square::F2));
        assert_eq!(moves.pop(), Some(Square::G3));
        assert_eq!(moves.pop(), None);

        assert_eq!(knight_moves(Square::D4).bit_count(), 8);
        assert_eq!(king_moves(Square::A1).bit_count(), 3);
        assert_eq!(king_moves(Square::E4).bit_count(), 8);
    }

    #[test]
    fn pawns_move_toward_the_opponent() {
        let white = pawn_moves(Side::White, Square::E2);
        assert_eq!(white, Bitboard::from(Square::E3) | Square::E4.into());
        assert_eq!(pawn_moves(Side::White, Square::E3), Bitboard::from(Square::E4));
        assert_eq!(pawn_moves(Side::White, Square::E8), Bitboard::new());

        let black = pawn_moves(Side::Black, Square::E7);
        assert_eq!(black, Bitboard::from(Square::E6) | Square::E5.into());

        assert_eq!(pawn_captures(Side::White, Square::A2), Bitboard::from(Square::B3));
        assert_eq!(
            pawn_captures(Side::Black, Square::D5),
            Bitboard::from(Square::C4) | Square::E4.into()
        );
    }
}
