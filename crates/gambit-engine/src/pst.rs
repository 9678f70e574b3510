//! Piece-square tables.
//!
//! Values from the Simplified Evaluation Function
//! (<https://www.chessprogramming.org/Simplified_Evaluation_Function>).
//! The tables are written as the board looks on paper, rank 8 first; white
//! reads them mirrored vertically (`sq ^ 56`) and black reads them directly,
//! so the two colors see the same values on mirrored squares.

use gambit_core::{Color, Piece, Square};

#[rustfmt::skip]
const PAWN: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING: [i32; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

/// The positional value of `piece` of `color` standing on `sq`.
#[inline]
pub fn value(color: Color, piece: Piece, sq: Square) -> i32 {
    let table = match piece {
        Piece::Pawn => &PAWN,
        Piece::Knight => &KNIGHT,
        Piece::Bishop => &BISHOP,
        Piece::Rook => &ROOK,
        Piece::Queen => &QUEEN,
        Piece::King => &KING,
    };
    let index = match color {
        Color::White => sq.index() ^ 56,
        Color::Black => sq.index(),
    };
    table[index as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(coord: &str) -> Square {
        Square::from_coord(coord).unwrap()
    }

    #[test]
    fn tables_mirror_between_colors() {
        for piece in Piece::ALL {
            for index in 0..64u8 {
                let square = Square::from_index(index).unwrap();
                let mirrored = Square::from_index(index ^ 56).unwrap();
                assert_eq!(
                    value(Color::White, piece, square),
                    value(Color::Black, piece, mirrored)
                );
            }
        }
    }

    #[test]
    fn pawns_gain_as_they_advance() {
        assert_eq!(value(Color::White, Piece::Pawn, sq("e7")), 50);
        assert_eq!(value(Color::Black, Piece::Pawn, sq("e2")), 50);
        assert_eq!(value(Color::White, Piece::Pawn, sq("e2")), -20);
    }

    #[test]
    fn knights_prefer_the_center() {
        assert_eq!(value(Color::White, Piece::Knight, sq("e4")), 20);
        assert_eq!(value(Color::White, Piece::Knight, sq("a1")), -50);
        assert_eq!(value(Color::Black, Piece::Knight, sq("h8")), -50);
    }

    #[test]
    fn kings_prefer_the_back_rank() {
        assert_eq!(value(Color::White, Piece::King, sq("g1")), 30);
        assert_eq!(value(Color::Black, Piece::King, sq("g8")), 30);
        assert_eq!(value(Color::White, Piece::King, sq("e4")), -40);
        assert_eq!(value(Color::White, Piece::King, sq("e5")), -50);
    }
}
