//! A trivial depth-limited minimax over `generate`/`make`/`undo`, just
//! enough to exercise the move generator end to end. No transposition
//! table, no move ordering, no quiescence search — a demo, not an engine.

use crate::board::Position;
use crate::moves::magic::{MagicTables, default_tables};
use crate::moves::movegen::generate_into;
use crate::moves::types::Move;
use crate::piece::{Color, Piece, PieceKind};
use crate::status::{GameStatus, position_status};
use tracing::instrument;

const INF: i32 = 32_000;
const MATE_SCORE: i32 = 31_000;

/// Material count from White's perspective, in centipawns.
pub fn material_eval(pos: &Position) -> i32 {
    let mut score = 0;
    for &kind in &PieceKind::ALL {
        let white = pos.pieces[Piece::new(kind, Color::White).array_index()].count_ones() as i32;
        let black = pos.pieces[Piece::new(kind, Color::Black).array_index()].count_ones() as i32;
        score += (white - black) * kind.value();
    }
    score
}

/// Material count from the side to move's perspective.
fn relative_eval(pos: &Position) -> i32 {
    match pos.side {
        Color::White => material_eval(pos),
        Color::Black => -material_eval(pos),
    }
}

/// The best move and its score (from the side to move's perspective) found
/// by a fixed-depth alpha-beta search.
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: i32,
}

#[instrument(skip(pos, tables), fields(depth))]
pub fn search(pos: &mut Position, tables: &MagicTables, depth: u32) -> SearchResult {
    let mut buf = Vec::with_capacity(64);
    generate_into(pos, tables, &mut buf);

    if buf.is_empty() {
        let score = if matches!(position_status(pos), GameStatus::Checkmate) {
            -MATE_SCORE
        } else {
            0
        };
        return SearchResult { best_move: None, score };
    }

    let mut best_move = None;
    let mut alpha = -INF;
    let beta = INF;

    for &mv in &buf {
        pos.make(mv);
        let score = -alpha_beta(pos, tables, depth - 1, -beta, -alpha);
        pos.undo(mv);

        if score > alpha {
            alpha = score;
            best_move = Some(mv);
        }
    }

    SearchResult { best_move, score: alpha }
}

fn alpha_beta(pos: &mut Position, tables: &MagicTables, depth: u32, mut alpha: i32, beta: i32) -> i32 {
    if depth == 0 {
        return relative_eval(pos);
    }

    let mut buf = Vec::with_capacity(64);
    generate_into(pos, tables, &mut buf);

    if buf.is_empty() {
        return if pos.attacks.checkers != 0 { -MATE_SCORE } else { 0 };
    }

    for &mv in &buf {
        pos.make(mv);
        let score = -alpha_beta(pos, tables, depth - 1, -beta, -alpha);
        pos.undo(mv);

        if score >= beta {
            return beta;
        }
        if score > alpha {
            alpha = score;
        }
    }

    alpha
}

/// Convenience wrapper using the process-wide magic tables.
pub fn search_default(pos: &mut Position, depth: u32) -> SearchResult {
    search(pos, default_tables(), depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn material_eval_is_zero_at_start() {
        let pos = Position::new_start();
        assert_eq!(material_eval(&pos), 0);
    }

    #[test]
    fn search_finds_a_move_at_depth_two() {
        let mut pos = Position::new_start();
        let result = search_default(&mut pos, 2);
        assert!(result.best_move.is_some());
    }

    #[test]
    fn search_prefers_capturing_a_free_queen() {
        // White to move, can capture a hanging black queen on d8 with Rxd8.
        let mut pos = Position::from_str("3qk3/8/8/8/8/8/8/3RK3 w - - 0 1").unwrap();
        let result = search_default(&mut pos, 1);
        let mv = result.best_move.expect("a legal move exists");
        assert_eq!(mv.to().index(), 3);
    }
}
