//! Defines the error types needed by the chess module
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::io;
use super::Square;
use super::magic::Slider;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Error type used by the basic types of the `chess` module
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// Cannot parse string
    ParseError,
    /// Failed to convert an integer to an another type
    TryFromIntError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Error::*;

        match self {
            ParseError => "cannot parse string",
            TryFromIntError => "integer out of range",
        }.fmt(f)
    }
}

impl std::error::Error for Error { }

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Result type used by methods in the `chess` module
pub type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Error produced while searching for magic multipliers
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MagicError {
    /// No collision-free magic was found for a square within the retry limit
    Exhausted {
        /// The sliding piece being built
        slider: Slider,
        /// The square being built
        square: Square,
        /// Number of candidates tried
        tries: u64,
    },
}

impl fmt::Display for MagicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MagicError::Exhausted { slider, square, tries } => write!(f,
                "no {} magic found for {} after {} candidates", slider, square, tries),
        }
    }
}

impl std::error::Error for MagicError { }

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Error produced when reading or writing a serialized attack-table blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The underlying file could not be read or written
    Io(String),
    /// The blob ended before all of its sections were read
    Truncated,
    /// A declared blocker bit count is outside `0..=13`
    InvalidBitCount {
        /// The sliding piece section containing the bad count
        slider: Slider,
        /// The square whose entry is bad
        square: Square,
        /// The declared bit count
        bits: u64,
    },
    /// The blob's length doesn't match the length implied by its bit counts
    LengthMismatch {
        /// Length computed from the declared bit counts
        expected: usize,
        /// Actual length of the blob
        actual: usize,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TableError::*;

        match self {
            Io(msg) => msg.fmt(f),
            Truncated => "attack table blob is truncated".fmt(f),
            InvalidBitCount { slider, square, bits } => write!(f,
                "invalid {} blocker bit count {} for {}", slider, bits, square),
            LengthMismatch { expected, actual } => write!(f,
                "attack table blob is {} bytes, expected {}", actual, expected),
        }
    }
}

impl std::error::Error for TableError { }

impl From<io::Error> for TableError {
    fn from(err: io::Error) -> Self {
        TableError::Io(err.to_string())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Error produced when a move in coordinate notation can't be parsed or doesn't apply to the
/// current position
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParseMoveError {
    /// The text is not of the form `e2e4`
    Syntax,
    /// There's no piece of the side to move on the origin square
    NoPiece,
    /// The move isn't legal in the current position
    IllegalMove,
}

impl fmt::Display for ParseMoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ParseMoveError::*;

        match self {
            Syntax => "expected a move such as e2e4",
            NoPiece => "no piece of the side to move on the origin square",
            IllegalMove => "illegal move",
        }.fmt(f)
    }
}

impl std::error::Error for ParseMoveError { }
