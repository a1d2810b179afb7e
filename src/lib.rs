//! Tarsia Puzzle Library
//!
//! Core logic for Tarsia cut-and-rearrange puzzles: the piece layout of each
//! grid, portable save tokens, and shuffling that keeps every question paired
//! with its answer.

pub mod codec;
pub mod geometry;
pub mod grid;
pub mod puzzle;
pub mod session;
pub mod shuffle;

pub use codec::{decode, encode, InvalidTokenError, SaveToken};
pub use grid::{compute, LayoutParams};
pub use puzzle::{
    ContentMap, GridChoice, PieceIndex, PieceIndexError, PuzzleState, Side, MAX_PIECE_INDEX,
};
pub use session::Session;
pub use shuffle::{generate_permutation, max_index, remap, Permutation};
