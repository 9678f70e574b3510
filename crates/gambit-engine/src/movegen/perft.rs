//! Perft: exhaustive leaf counting to validate the move generator.

use super::generate_moves;
use crate::Board;

/// Counts leaf positions reachable in exactly `depth` plies.
pub fn perft(board: &Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_moves(board);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for m in &moves {
        let mut next = board.clone();
        next.apply_move(*m);
        nodes += perft(&next, depth - 1);
    }
    nodes
}

/// Per-move node counts at `depth`, sorted by coordinate notation.
/// The standard tool for bisecting generator bugs.
pub fn perft_divide(board: &Board, depth: u32) -> Vec<(String, u64)> {
    let moves = generate_moves(board);
    let mut results: Vec<(String, u64)> = moves
        .as_slice()
        .iter()
        .map(|m| {
            let mut next = board.clone();
            next.apply_move(*m);
            let nodes = if depth > 1 { perft(&next, depth - 1) } else { 1 };
            (m.to_coord(), nodes)
        })
        .collect();

    results.sort();
    results
}
