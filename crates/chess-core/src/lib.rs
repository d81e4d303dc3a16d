//! Core types for chess.
//!
//! This crate provides the vocabulary shared by the engine and its drivers:
//! - [`Piece`] and [`Color`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`], [`MoveKind`] and [`MoveId`] for move representation
//! - [`Fen`] parsing and serialization

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{Fen, FenError};
pub use mov::{CastleSide, Move, MoveId, MoveKind};
pub use piece::Piece;
pub use square::{File, Rank, Square};
