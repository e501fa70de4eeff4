//! The game-tree search
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::time::Instant;
use log::debug;
use crate::chess::{AppliedMove, AttackTables, GameMove, GameState};

mod eval;
pub use eval::{Evaluator, MaterialEvaluator, piece_val};

/// A value greater than any score the search can return
pub const VALUE_INF: i32 = 1_000_000_000;

/// The score of delivering checkmate immediately
///
/// A mate found `n` plies from the root scores `MATE - n` for the winner, so nearer mates are
/// preferred.
pub const MATE: i32 = 1_000_000;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A move together with the score the search gave it
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ValuedMove {
    /// The best move, or `None` at a leaf or when there are no legal moves
    pub mv: Option<GameMove>,
    /// The score, from the point of view of the side to move
    pub value: i32,
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Searches a `GameState` for the best move with negamax and alpha-beta pruning
///
/// The state is searched in place: every move is recorded on it and rolled back again, so the
/// state is unchanged when the search returns.
#[derive(Debug)]
pub struct Searcher<'a, E = MaterialEvaluator> {
    tables: &'a AttackTables,
    evaluator: E,
    nodes: u64,
}

impl<'a> Searcher<'a> {
    /// Creates a searcher using the default evaluator
    pub fn new(tables: &'a AttackTables) -> Self {
        Searcher::with_evaluator(tables, MaterialEvaluator)
    }
}

impl<'a, E: Evaluator> Searcher<'a, E> {
    /// Creates a searcher using `evaluator` to score leaves
    pub fn with_evaluator(tables: &'a AttackTables, evaluator: E) -> Self {
        Searcher { tables, evaluator, nodes: 0 }
    }

    /// Returns the number of nodes visited since the searcher was created
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Searches `state` to `depth` plies with a full window
    pub fn search(&mut self, state: &mut GameState, depth: usize) -> ValuedMove {
        let start = Instant::now();
        let nodes = self.nodes;

        debug!("searching {} to depth {}", state, depth);
        let best = self.negamax(state, -VALUE_INF, VALUE_INF, depth);

        debug!(
            "search done: value {}, {} nodes in {:?}",
            best.value,
            self.nodes - nodes,
            start.elapsed(),
        );
        best
    }

    /// Returns the best move for the side to move in `state`, searching `depth` more plies and
    /// looking for a score between `alpha` and `beta`
    ///
    /// At depth 0 the state is scored by the evaluator. Without legal moves the side to move
    /// is either checkmated, scoring `-MATE` plus the distance from the root, or stalemated,
    /// scoring 0. Among equally good moves the first one generated wins.
    pub fn negamax(&mut self, state: &mut GameState, alpha: i32, beta: i32, depth: usize)
        -> ValuedMove
    {
        self.negamax_from(state, alpha, beta, depth, 0)
    }

    fn negamax_from(&mut self,
        state: &mut GameState,
        mut alpha: i32, beta: i32,
        depth: usize, ply: usize)
    -> ValuedMove {
        self.nodes += 1;

        if depth == 0 {
            let side = state.current_side();
            return ValuedMove { mv: None, value: self.evaluator.eval(state, side) };
        }

        let moves = state.generate_all_moves(self.tables);

        // no legal moves
        if moves.is_empty() {
            let value = if state.is_in_check(self.tables, state.current_side()) {
                -MATE + ply as i32
            } else {
                0
            };
            return ValuedMove { mv: None, value };
        }

        let mut best = ValuedMove { mv: None, value: -VALUE_INF };
        for mv in moves {
            let value = {
                let mut after = AppliedMove::new(state, mv);
                -self.negamax_from(&mut after, -beta, -alpha, depth - 1, ply + 1).value
            };

            if value > best.value {
                best = ValuedMove { mv: Some(mv), value };
            }
            if value > alpha {
                alpha = value;
            }
            if alpha >= beta {
                break;
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;
    use crate::chess::{Side, Square};
    use crate::chess::magic::MagicBuilder;

    lazy_static! {
        static ref TABLES: AttackTables = AttackTables::build(&mut MagicBuilder::seeded(3))
            .expect("tables");
    }

    struct Constant(i32);

    impl Evaluator for Constant {
        fn eval(&self, _state: &GameState, _side: Side) -> i32 {
            self.0
        }
    }

    #[test]
    fn depth_zero_returns_the_evaluation() {
        let mut state = GameState::new();
        let mut searcher = Searcher::with_evaluator(&TABLES, Constant(42));
        let best = searcher.negamax(&mut state, -VALUE_INF, VALUE_INF, 0);
        assert_eq!(best, ValuedMove { mv: None, value: 42 });
        assert_eq!(searcher.nodes(), 1);
    }

    #[test]
    fn ties_go_to_the_first_move() {
        let mut state = GameState::new();
        let first = state.generate_all_moves(&TABLES)[0];
        let mut searcher = Searcher::with_evaluator(&TABLES, Constant(0));
        let best = searcher.search(&mut state, 1);
        assert_eq!(best.mv, Some(first));
        assert_eq!(best.value, 0);
    }

    #[test]
    fn checkmated_and_stalemated() {
        let mut mated: GameState = "R5k1/5ppp/8/8/8/8/8/6K1 b".parse().unwrap();
        let mut searcher = Searcher::new(&TABLES);
        assert_eq!(searcher.search(&mut mated, 3), ValuedMove { mv: None, value: -MATE });

        let mut stalemate: GameState = "7k/5Q2/6K1/8/8/8/8/8 b".parse().unwrap();
        assert_eq!(searcher.search(&mut stalemate, 3), ValuedMove { mv: None, value: 0 });
    }

    #[test]
    fn finds_mate_in_one() {
        let mut state: GameState = "6k1/5ppp/8/8/8/8/8/R5K1 w".parse().unwrap();
        let original = state.clone();
        let mut searcher = Searcher::new(&TABLES);

        let best = searcher.search(&mut state, 2);
        let mv = best.mv.expect("a move");
        assert_eq!((mv.from(), mv.to()), (Square::A1, Square::A8));
        assert_eq!(best.value, MATE - 1);
        assert_eq!(state, original);
    }
}
