//! Static evaluation in centipawns.
//!
//! The score is material plus the incremental piece-square differential plus
//! a handful of structural terms: mobility, king pawn shield, the bishop
//! pair, rooks on open files, and isolated/doubled/backward pawn penalties.
//! Every term is computed for both sides and differenced, so a symmetric
//! position scores zero.

use crate::movegen::{attacks, pawn_attacks};
use crate::{bitboard, Bitboard, Board};
use gambit_core::{Color, Piece, Rank};

pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 350;
pub const BISHOP_VALUE: i32 = 375;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 1000;

const MOBILITY_BONUS: i32 = 1;
const KING_PAWN_SHIELD_BONUS: i32 = 7;
const BISHOP_PAIR_BONUS: i32 = 10;
const ROOK_OPEN_FILE_BONUS: i32 = 15;

const ISOLATED_PAWN_PENALTY: i32 = -30;
const DOUBLED_PAWN_PENALTY: i32 = -25;
const BACKWARD_PAWN_PENALTY: i32 = -20;

/// The material value of a piece. The king has none; it cannot be traded.
#[inline]
pub const fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => PAWN_VALUE,
        Piece::Knight => KNIGHT_VALUE,
        Piece::Bishop => BISHOP_VALUE,
        Piece::Rook => ROOK_VALUE,
        Piece::Queen => QUEEN_VALUE,
        Piece::King => 0,
    }
}

/// Masks of the files adjacent to each file.
const ADJACENT_FILES: [Bitboard; 8] = {
    let mut masks = [Bitboard::EMPTY; 8];
    let mut f = 0;
    while f < 8 {
        let mut bits = 0u64;
        if f > 0 {
            bits |= bitboard::FILES[f - 1].0;
        }
        if f < 7 {
            bits |= bitboard::FILES[f + 1].0;
        }
        masks[f] = Bitboard(bits);
        f += 1;
    }
    masks
};

/// Shield squares per (color, king square): the three squares diagonally
/// ahead of and in front of the king, restricted to the shield rank.
const PAWN_SHIELDS: [[Bitboard; 64]; 2] = {
    const FILE_A: u64 = 0x0101_0101_0101_0101;
    const FILE_H: u64 = FILE_A << 7;
    const RANK_2: u64 = 0xFF00;
    const RANK_7: u64 = 0x00FF_0000_0000_0000;

    let mut shields = [[Bitboard::EMPTY; 64]; 2];
    let mut sq = 0;
    while sq < 64 {
        let b = 1u64 << sq;
        let white = ((b << 8) | ((b << 7) & !FILE_H) | ((b << 9) & !FILE_A)) & RANK_2;
        let black = ((b >> 8) | ((b >> 7) & !FILE_A) | ((b >> 9) & !FILE_H)) & RANK_7;
        shields[0][sq] = Bitboard(white);
        shields[1][sq] = Bitboard(black);
        sq += 1;
    }
    shields
};

/// Scores the position for `color`: positive means `color` stands better.
pub fn evaluate(board: &Board, color: Color) -> i32 {
    let other = color.opposite();

    let mut score = 0;

    for piece in [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
    ] {
        let balance = board.pieces_of(color, piece).count() as i32
            - board.pieces_of(other, piece).count() as i32;
        score += piece_value(piece) * balance;
    }

    score += board.pst_score(color) - board.pst_score(other);

    score += MOBILITY_BONUS * (mobility(board, color) - mobility(board, other));

    score += KING_PAWN_SHIELD_BONUS
        * (pawns_shielding_king(board, color) - pawns_shielding_king(board, other));

    if has_bishop_pair(board, color) {
        score += BISHOP_PAIR_BONUS;
    }
    if has_bishop_pair(board, other) {
        score -= BISHOP_PAIR_BONUS;
    }

    score += ROOK_OPEN_FILE_BONUS
        * (rooks_on_open_files(board, color) - rooks_on_open_files(board, other));

    score += ISOLATED_PAWN_PENALTY * (isolated_pawns(board, color) - isolated_pawns(board, other));

    score += DOUBLED_PAWN_PENALTY * (doubled_pawns(board, color) - doubled_pawns(board, other));

    score +=
        BACKWARD_PAWN_PENALTY * (backward_pawns(board, color) - backward_pawns(board, other));

    score
}

/// Counts pseudo-legal non-king moves: pawn pushes onto empty squares, pawn
/// captures of enemy pieces, and attack squares off own pieces for the
/// knights and sliders.
fn mobility(board: &Board, color: Color) -> i32 {
    let own = board.occupancy(color);
    let enemy = board.occupancy(color.opposite());
    let occupied = own | enemy;
    let empty = !occupied;
    let pawns = board.pieces_of(color, Piece::Pawn);

    let (single, double) = match color {
        Color::White => {
            let single = pawns.north() & empty;
            (single, (single & Bitboard::rank(Rank::R3)).north() & empty)
        }
        Color::Black => {
            let single = pawns.south() & empty;
            (single, (single & Bitboard::rank(Rank::R6)).south() & empty)
        }
    };

    let mut captures = Bitboard::EMPTY;
    for from in pawns {
        captures |= pawn_attacks(from, color);
    }
    captures &= enemy;

    let mut total = (single | double).count() as i32 + captures.count() as i32;

    for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
        for from in board.pieces_of(color, piece) {
            total += (attacks(color, piece, from, occupied) & !own).count() as i32;
        }
    }

    total
}

/// Counts own pawns standing on the king's shield squares.
fn pawns_shielding_king(board: &Board, color: Color) -> i32 {
    match board.pieces_of(color, Piece::King).lsb() {
        Some(king_sq) => {
            let shield = PAWN_SHIELDS[color.index()][king_sq.index() as usize];
            (shield & board.pieces_of(color, Piece::Pawn)).count() as i32
        }
        None => 0,
    }
}

/// True when `color` has bishops on both square colors.
fn has_bishop_pair(board: &Board, color: Color) -> bool {
    let bishops = board.pieces_of(color, Piece::Bishop);
    (bishops & Bitboard::LIGHT_SQUARES).is_not_empty()
        && (bishops & Bitboard::DARK_SQUARES).is_not_empty()
}

/// Counts own rooks on files that hold nothing but those rooks.
fn rooks_on_open_files(board: &Board, color: Color) -> i32 {
    let rooks = board.pieces_of(color, Piece::Rook);
    let occupied = board.occupied();

    let mut count = 0;
    for file in bitboard::FILES {
        let on_file = file & rooks;
        if on_file.is_not_empty() && on_file == (file & occupied) {
            count += 1;
        }
    }
    count
}

/// Counts files whose pawns have no friendly pawn on either adjacent file.
fn isolated_pawns(board: &Board, color: Color) -> i32 {
    let pawns = board.pieces_of(color, Piece::Pawn);

    let mut count = 0;
    for (f, file) in bitboard::FILES.iter().enumerate() {
        if (*file & pawns).is_not_empty() && (ADJACENT_FILES[f] & pawns).is_empty() {
            count += 1;
        }
    }
    count
}

/// Counts pawns beyond the first on each file.
fn doubled_pawns(board: &Board, color: Color) -> i32 {
    let pawns = board.pieces_of(color, Piece::Pawn);

    let mut count = 0;
    for file in bitboard::FILES {
        let on_file = (file & pawns).count() as i32;
        if on_file > 1 {
            count += on_file - 1;
        }
    }
    count
}

/// Counts pawns whose stop square is covered by an enemy pawn but not by a
/// friendly one.
fn backward_pawns(board: &Board, color: Color) -> i32 {
    let own_pawns = board.pieces_of(color, Piece::Pawn);
    let enemy_pawns = board.pieces_of(color.opposite(), Piece::Pawn);
    let occupied = board.occupied();

    let (stops, own_cover, enemy_cover) = match color {
        Color::White => (
            own_pawns.north() & !occupied,
            own_pawns.north_west() | own_pawns.north_east(),
            enemy_pawns.south_west() | enemy_pawns.south_east(),
        ),
        Color::Black => (
            own_pawns.south() & !occupied,
            own_pawns.south_west() | own_pawns.south_east(),
            enemy_pawns.north_west() | enemy_pawns.north_east(),
        ),
    };

    (stops & !own_cover & enemy_cover).count() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_is_balanced() {
        let board = Board::startpos();
        assert_eq!(evaluate(&board, Color::White), 0);
        assert_eq!(evaluate(&board, Color::Black), 0);
    }

    #[test]
    fn evaluation_is_antisymmetric() {
        let board =
            Board::from_fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3")
                .unwrap();
        assert_eq!(
            evaluate(&board, Color::White),
            -evaluate(&board, Color::Black)
        );
    }

    #[test]
    fn a_spare_queen_dominates_the_score() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1").unwrap();
        let score = evaluate(&board, Color::White);
        assert!(score > QUEEN_VALUE / 2, "score was {}", score);
    }

    #[test]
    fn material_balance_drives_the_score() {
        // A lone white rook versus a lone black knight, kings apart so the
        // structural terms stay small.
        let board = Board::from_fen("4k3/8/n7/8/8/7R/8/4K3 w - - 0 1").unwrap();
        let score = evaluate(&board, Color::White);
        let material = ROOK_VALUE - KNIGHT_VALUE;
        assert!(
            (score - material).abs() < 100,
            "score {} strayed from material {}",
            score,
            material
        );
    }

    #[test]
    fn bishop_pair_needs_both_square_colors() {
        let pair = Board::from_fen("4k3/8/8/8/8/8/8/2B1KB2 w - - 0 1").unwrap();
        assert!(has_bishop_pair(&pair, Color::White));

        // Two bishops on the same square color are not a pair.
        let same = Board::from_fen("4k3/8/8/8/8/8/8/1B2K2B w - - 0 1").unwrap();
        assert!(!has_bishop_pair(&same, Color::White));
    }

    #[test]
    fn rook_open_file_detection() {
        // The h-rook sits alone on its file; the a-rook is behind a pawn.
        let board = Board::from_fen("4k3/8/8/8/8/8/P7/R3K2R w - - 0 1").unwrap();
        assert_eq!(rooks_on_open_files(&board, Color::White), 1);
    }

    #[test]
    fn isolated_pawn_detection() {
        // The a-pawn and h-pawn have no neighbors; d and e support each other.
        let board = Board::from_fen("4k3/8/8/8/8/8/P2PP2P/4K3 w - - 0 1").unwrap();
        assert_eq!(isolated_pawns(&board, Color::White), 2);
        assert_eq!(isolated_pawns(&board, Color::Black), 0);
    }

    #[test]
    fn doubled_pawn_detection() {
        // Three pawns on the c-file count double, two on the f-file single.
        let board = Board::from_fen("4k3/8/2P5/2P2P2/2P2P2/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(doubled_pawns(&board, Color::White), 3);
    }

    #[test]
    fn backward_pawn_detection() {
        // The white d2 pawn's stop square d3 is covered by the black pawn on
        // c4 and by no white pawn; the mirrored statement holds for c4.
        let board = Board::from_fen("4k3/8/8/8/2p5/8/3P4/4K3 w - - 0 1").unwrap();
        assert_eq!(backward_pawns(&board, Color::White), 1);
        assert_eq!(backward_pawns(&board, Color::Black), 1);

        // A defender of the stop square clears the flag: with a white pawn
        // on c2 covering d3, nothing is backward for white.
        let defended = Board::from_fen("4k3/8/8/8/2p5/8/2PP4/4K3 w - - 0 1").unwrap();
        assert_eq!(backward_pawns(&defended, Color::White), 0);
    }

    #[test]
    fn shield_counts_pawns_near_the_king() {
        let board = Board::from_fen("4k3/8/8/8/8/8/5PPP/6K1 w - - 0 1").unwrap();
        assert_eq!(pawns_shielding_king(&board, Color::White), 3);

        let bare = Board::from_fen("4k3/8/8/8/8/8/8/6K1 w - - 0 1").unwrap();
        assert_eq!(pawns_shielding_king(&bare, Color::White), 0);
    }

    #[test]
    fn mobility_counts_startpos_moves() {
        // At the start each side has 16 pawn moves and 4 knight moves.
        let board = Board::startpos();
        assert_eq!(mobility(&board, Color::White), 20);
        assert_eq!(mobility(&board, Color::Black), 20);
    }
}
