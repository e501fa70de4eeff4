//! Move queries: which squares a piece can reach, and which moves are legal
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use super::*;
use super::moves::{AppliedMove, GameMove};
use super::super::tables::AttackTables;

impl GameState {
    /// Returns the squares the piece on `sq` can move to, ignoring whether the move would leave
    /// its own king attacked
    ///
    /// Returns an empty bitboard if `sq` is empty. Squares occupied by the piece's own side are
    /// never included. A pawn may only advance two squares if the square directly in front of it
    /// is also empty.
    pub fn check_game_move(&self, tables: &AttackTables, sq: Square) -> Bitboard {
        let piece = match self.position.piece_at(sq) {
            Some(piece) => piece,
            None => return Bitboard::new(),
        };

        let side = piece.side();
        let own = self.position.side_occupancy(side);
        let opponent = self.position.side_occupancy(!side);
        let occ = own | opponent;

        match piece.piece_type() {
            PieceType::Rook => tables.rook_moves(sq, occ) & !own,
            PieceType::Bishop => tables.bishop_moves(sq, occ) & !own,
            PieceType::Queen => tables.queen_moves(sq, occ) & !own,
            PieceType::Knight => tables.knight_moves(sq) & !own,
            PieceType::King => tables.king_moves(sq) & !own,
            PieceType::Pawn => {
                let forward = tables.pawn_moves(side, sq);
                let one_step = sq.offset(side.forward(), 0).map(Bitboard::from).unwrap_or_default();

                let mut moves = forward & one_step & !occ;
                if !moves.is_empty() {
                    moves |= forward & !one_step & !occ;
                }

                moves | (tables.pawn_captures(side, sq) & opponent)
            },
        }
    }

    /// Returns `true` if any of `by`'s pieces could move to `sq`
    pub fn is_square_attacked(&self, tables: &AttackTables, sq: Square, by: Side) -> bool {
        let pos = &self.position;
        let occ = pos.occupancy();
        let queens = pos.piece_occupancy(by, PieceType::Queen);

        let rooks = pos.piece_occupancy(by, PieceType::Rook) | queens;
        let bishops = pos.piece_occupancy(by, PieceType::Bishop) | queens;

        tables.rook_moves(sq, occ).intersects(rooks)
            || tables.bishop_moves(sq, occ).intersects(bishops)
            || tables.knight_moves(sq).intersects(pos.piece_occupancy(by, PieceType::Knight))
            || tables.king_moves(sq).intersects(pos.piece_occupancy(by, PieceType::King))
            || tables.pawn_captures(!by, sq).intersects(pos.piece_occupancy(by, PieceType::Pawn))
    }

    /// Returns `true` if `side`'s king is attacked
    ///
    /// A side without a king is never in check.
    pub fn is_in_check(&self, tables: &AttackTables, side: Side) -> bool {
        match self.position.king_square(side) {
            Some(king) => self.is_square_attacked(tables, king, !side),
            None => false,
        }
    }

    /// Returns `true` if making `mv` would not leave the mover's king attacked
    ///
    /// The move is made and undone on `self`, which is unchanged afterwards.
    pub fn is_move_legal(&mut self, tables: &AttackTables, mv: GameMove) -> bool {
        let side = mv.piece().side();
        let after = AppliedMove::new(self, mv);
        !after.is_in_check(tables, side)
    }

    /// Returns every legal move for the side to move
    ///
    /// Moves are ordered by origin square, then by destination square, both ascending.
    pub fn generate_all_moves(&mut self, tables: &AttackTables) -> Vec<GameMove> {
        let mut moves = Vec::new();

        for from in self.position.side_occupancy(self.current_side) {
            for to in self.check_game_move(tables, from) {
                if let Some(mv) = self.get_game_move(from, to) {
                    if self.is_move_legal(tables, mv) {
                        moves.push(mv);
                    }
                }
            }
        }

        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;
    use super::super::super::magic::MagicBuilder;

    lazy_static! {
        static ref TABLES: AttackTables = AttackTables::build(&mut MagicBuilder::seeded(11))
            .expect("tables");
    }

    fn state(fen: &str) -> GameState {
        fen.parse().unwrap()
    }

    #[test]
    fn empty_square_has_no_moves() {
        assert!(GameState::new().check_game_move(&TABLES, Square::E4).is_empty());
    }

    #[test]
    fn own_pieces_are_excluded() {
        let start = GameState::new();
        for sq in start.side_occupancy(Side::White) {
            let moves = start.check_game_move(&TABLES, sq);
            assert!(moves.is_disjoint(start.side_occupancy(Side::White)));
        }
        assert!(start.check_game_move(&TABLES, Square::A1).is_empty());
        assert_eq!(
            start.check_game_move(&TABLES, Square::B1),
            Bitboard::from(Square::A3) | Square::C3.into()
        );
    }

    #[test]
    fn blocked_pawn_cannot_jump() {
        let mut s = GameState::empty(Side::White);
        s.put(Square::A2, GamePiece::new(Side::White, PieceType::Pawn));
        s.put(Square::A3, GamePiece::new(Side::Black, PieceType::Knight));
        assert!(s.check_game_move(&TABLES, Square::A2).is_empty());

        let s = state("8/8/8/8/4p3/8/4P3/8 w");
        assert_eq!(s.check_game_move(&TABLES, Square::E2), Bitboard::from(Square::E3));
    }

    #[test]
    fn pawns_capture_diagonally_only() {
        let s = state("8/8/8/3p1p2/4P3/8/8/8 w");
        let moves = s.check_game_move(&TABLES, Square::E4);
        assert!(moves.contains(Square::D5));
        assert!(moves.contains(Square::F5));
        assert!(moves.contains(Square::E5));
        assert_eq!(moves.bit_count(), 3);

        let s = state("8/8/8/4p3/4P3/8/8/8 b");
        assert!(s.check_game_move(&TABLES, Square::E5).is_empty());
    }

    #[test]
    fn attacks_are_detected() {
        let s = state("4k3/8/8/8/8/8/3p4/R3K3 w");
        assert!(s.is_square_attacked(&TABLES, Square::E1, Side::Black));
        assert!(s.is_in_check(&TABLES, Side::White));
        assert!(s.is_square_attacked(&TABLES, Square::A8, Side::White));
        assert!(!s.is_square_attacked(&TABLES, Square::E8, Side::White));
        assert!(!s.is_in_check(&TABLES, Side::Black));
    }

    #[test]
    fn pinned_piece_moves_are_illegal() {
        let mut s = state("4r1k1/8/8/8/8/8/4B3/4K3 w");
        let original = s.clone();
        let moves = s.generate_all_moves(&TABLES);
        assert!(moves.iter().all(|mv| mv.from() != Square::E2));
        assert_eq!(s, original);
    }

    #[test]
    fn generated_moves_are_sorted() {
        let mut s = GameState::new();
        let moves = s.generate_all_moves(&TABLES);
        assert_eq!(moves.len(), 20);
        let keys: Vec<_> = moves.iter().map(|mv| (mv.from(), mv.to())).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(moves[0].to_string(), "b1a3");
    }
}
