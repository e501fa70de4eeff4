//! Bitboard move generation for chess, built on magic-bitboard attack tables
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
//! The [`chess`](chess/index.html) module holds the board representation, the attack tables
//! and the move generator. The [`engine`](engine/index.html) module searches a
//! [`GameState`](chess/struct.GameState.html) with negamax, and [`config`](config/index.html)
//! reads the settings shared by the binaries.
//!
//! ```rust
//! use bitmove::chess::{AttackTables, GameState};
//! use bitmove::chess::magic::MagicBuilder;
//!
//! let tables = AttackTables::build(&mut MagicBuilder::seeded(1)).unwrap();
//! let mut state = GameState::new();
//! assert_eq!(state.generate_all_moves(&tables).len(), 20);
//! ```
////////////////////////////////////////////////////////////////////////////////////////////////////
#![warn(missing_docs, missing_debug_implementations, unused_extern_crates)]
#![warn(clippy::unimplemented, clippy::option_unwrap_used, clippy::result_unwrap_used)]

pub mod chess;
pub mod engine;
pub mod config;
