//! Polyglot opening book support.
//!
//! A Polyglot book is a flat file of 16-byte big-endian entries sorted
//! ascending by 64-bit Zobrist key: the key, a packed move, a weight, and a
//! learn field (ignored here). The whole file is read into memory at
//! startup; probing is a binary search on the current position's key
//! followed by decoding the packed move against the board.

mod keys;

use gambit_core::{Color, File, Move, MoveFlags, Piece, Rank, Square};
use gambit_engine::{Bitboard, Board};
use std::path::Path;
use thiserror::Error;

/// Errors opening or reading a book file.
#[derive(Debug, Error)]
pub enum BookError {
    #[error("could not read book file: {0}")]
    Io(#[from] std::io::Error),
}

/// One book entry in host byte order. The on-disk weight and learn fields
/// are skipped; probing is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    key: u64,
    mov: u16,
}

const ENTRY_SIZE: usize = 16;

/// An in-memory opening book.
#[derive(Debug, Default)]
pub struct Book {
    entries: Vec<Entry>,
}

impl Book {
    /// A book with no entries; every probe misses.
    pub fn empty() -> Self {
        Book::default()
    }

    /// Reads a book file into memory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BookError> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(&bytes))
    }

    /// Parses raw book bytes. A trailing partial entry is dropped.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let entries = bytes
            .chunks_exact(ENTRY_SIZE)
            .map(|chunk| Entry {
                key: u64::from_be_bytes(chunk[0..8].try_into().expect("chunk is 16 bytes")),
                mov: u16::from_be_bytes(chunk[8..10].try_into().expect("chunk is 16 bytes")),
            })
            .collect();
        Book { entries }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the book holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks the position up and decodes the stored move, if any.
    pub fn probe(&self, board: &Board) -> Option<Move> {
        let key = polyglot_key(board);
        let index = self
            .entries
            .binary_search_by_key(&key, |e| e.key)
            .ok()?;
        decode_move(board, self.entries[index].mov)
    }
}

/// Computes the Polyglot Zobrist key for a position.
///
/// XORs one constant per (piece, square), one per retained castle right, the
/// en-passant file constant when a side-to-move pawn can actually capture to
/// the target, and the turn constant when white is to move.
pub fn polyglot_key(board: &Board) -> u64 {
    let mut key = 0u64;

    for color in Color::ALL {
        for piece in Piece::ALL {
            // Piece kinds are laid out in pairs, black then white.
            let kind = piece.index() * 2 + usize::from(color == Color::White);
            for sq in board.pieces_of(color, piece) {
                key ^= keys::RANDOM_PIECE[64 * kind + sq.index() as usize];
            }
        }
    }

    let castling = board.castling();
    if castling.kingside(Color::White) {
        key ^= keys::RANDOM_CASTLE[0];
    }
    if castling.queenside(Color::White) {
        key ^= keys::RANDOM_CASTLE[1];
    }
    if castling.kingside(Color::Black) {
        key ^= keys::RANDOM_CASTLE[2];
    }
    if castling.queenside(Color::Black) {
        key ^= keys::RANDOM_CASTLE[3];
    }

    if let Some(target) = board.en_passant() {
        let target_bb = Bitboard::from_square(target);
        let us = board.side_to_move();
        let capturers = match us {
            Color::White => target_bb.south_west() | target_bb.south_east(),
            Color::Black => target_bb.north_west() | target_bb.north_east(),
        };
        if (capturers & board.pieces_of(us, Piece::Pawn)).is_not_empty() {
            key ^= keys::RANDOM_EN_PASSANT[target.file().index() as usize];
        }
    }

    if board.side_to_move() == Color::White {
        key ^= keys::RANDOM_TURN;
    }

    key
}

/// Decodes a packed book move against the board, inferring the moving piece
/// and the special-move flags. Returns `None` if the origin square holds no
/// piece of the side to move (a stale or corrupt entry).
fn decode_move(board: &Board, packed: u16) -> Option<Move> {
    let to_file = File::from_index((packed & 0x7) as u8)?;
    let to_rank = Rank::from_index((packed >> 3 & 0x7) as u8)?;
    let from_file = File::from_index((packed >> 6 & 0x7) as u8)?;
    let from_rank = Rank::from_index((packed >> 9 & 0x7) as u8)?;
    let promotion_code = packed >> 12 & 0x7;

    let from = Square::new(from_file, from_rank);
    let mut to = Square::new(to_file, to_rank);

    let us = board.side_to_move();
    let them = us.opposite();

    let piece = Piece::ALL
        .into_iter()
        .find(|p| board.pieces_of(us, *p).contains(from))?;

    let mut flags = MoveFlags::NONE;
    let mut capture = None;
    if board.occupancy(them).contains(to) {
        flags |= MoveFlags::CAPTURE;
        capture = Piece::ALL
            .into_iter()
            .find(|p| board.pieces_of(them, *p).contains(to));
    }

    let (king_home, kingside_rook, queenside_rook) = match us {
        Color::White => (Square::E1, Square::H1, Square::A1),
        Color::Black => (Square::E8, Square::H8, Square::A8),
    };

    if piece == Piece::King && from == king_home && to == kingside_rook {
        // Polyglot encodes castling as king-takes-rook.
        flags = MoveFlags::KING_CASTLE;
        capture = None;
        to = match us {
            Color::White => Square::G1,
            Color::Black => Square::G8,
        };
    } else if piece == Piece::King && from == king_home && to == queenside_rook {
        flags = MoveFlags::QUEEN_CASTLE;
        capture = None;
        to = match us {
            Color::White => Square::C1,
            Color::Black => Square::C8,
        };
    } else if piece == Piece::Pawn {
        let (start_rank, double_rank) = match us {
            Color::White => (Rank::R2, Rank::R4),
            Color::Black => (Rank::R7, Rank::R5),
        };
        if from.rank() == start_rank && to.rank() == double_rank {
            flags |= MoveFlags::DOUBLE_PUSH;
        } else if !flags.contains(MoveFlags::CAPTURE) && board.en_passant() == Some(to) {
            flags |= MoveFlags::EN_PASSANT;
        }
    }

    let promotion = if promotion_code != 0 {
        flags |= MoveFlags::PROMOTION;
        Some(match promotion_code {
            1 => Piece::Knight,
            2 => Piece::Bishop,
            3 => Piece::Rook,
            _ => Piece::Queen,
        })
    } else {
        None
    };

    Some(Move {
        flags,
        from,
        to,
        piece,
        capture,
        promotion,
    })
}
