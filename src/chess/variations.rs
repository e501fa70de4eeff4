//! Module for counting and printing the number of variations from a given state
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use crate::chess::*;

/// Returns the number of variations of the given `depth` after each legal move from `state`, in
/// generation order
pub fn divide(state: &mut GameState, tables: &AttackTables, depth: usize) -> Vec<(GameMove, usize)> {
    if depth < 1 {
        return Vec::new();
    }

    let moves = state.generate_all_moves(tables);
    let mut counts = Vec::with_capacity(moves.len());
    for mv in moves {
        let mut after = AppliedMove::new(state, mv);
        counts.push((mv, count(&mut after, tables, depth - 1)));
    }

    counts
}

/// Print the number of variations of the given `depth` for each legal move from `state`
pub fn print(state: &mut GameState, tables: &AttackTables, depth: usize) -> usize {
    if depth < 1 {
        return 1;
    }

    let mut total = 0;

    for (mv, count) in divide(state, tables, depth) {
        total += count;
        println!("\t{:7}\t{:12}", mv, count);
    }

    total
}

/// Count the number of variations of the given `depth` from `state`
pub fn count(state: &mut GameState, tables: &AttackTables, depth: usize) -> usize {
    if depth < 1 {
        return 1;
    }

    let moves = state.generate_all_moves(tables);
    if depth == 1 {
        return moves.len();
    }

    let mut total = 0;
    for mv in moves {
        let mut after = AppliedMove::new(state, mv);
        total += count(&mut after, tables, depth - 1);
    }

    total
}
