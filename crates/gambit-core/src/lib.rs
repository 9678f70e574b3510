//! Core types shared by the Gambit chess engine.
//!
//! This crate defines the vocabulary the rest of the workspace speaks:
//! - [`Color`] and [`Piece`] for piece identity
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] and [`MoveFlags`] for move records
//! - [`Fen`] for parsing and serializing positions

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{Fen, FenError};
pub use mov::{Move, MoveFlags};
pub use piece::Piece;
pub use square::{File, Rank, Square};
