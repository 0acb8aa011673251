//! Applies and reverses moves on a `Position`: piece placement, castling
//! rook hops, en-passant captures, promotions, castling-rights and
//! en-passant hash bookkeeping, and the trailing attack-analyzer refresh.

use crate::board::{Position, Undo};
use crate::hash::zobrist_keys;
use crate::moves::types::{Move, MoveFlag};
use crate::piece::{Color, Piece, PieceKind};
use crate::square::Square;
use crate::tables;

fn castle_rook_squares(color: Color, flag: MoveFlag) -> (Square, Square) {
    match (color, flag) {
        (Color::White, MoveFlag::CastleK) => (Square::from_index(63), Square::from_index(61)),
        (Color::White, MoveFlag::CastleQ) => (Square::from_index(56), Square::from_index(59)),
        (Color::Black, MoveFlag::CastleK) => (Square::from_index(7), Square::from_index(5)),
        (Color::Black, MoveFlag::CastleQ) => (Square::from_index(0), Square::from_index(3)),
        _ => unreachable!("castle_rook_squares called for a non-castling flag"),
    }
}

/// Applies `mv` to `pos`, pushing enough state onto `pos`'s internal undo
/// stack for a matching call to [`undo`] to reverse it exactly.
pub fn make(pos: &mut Position, mv: Move) {
    let from = mv.from();
    let to = mv.to();
    let flag = mv.flag();
    let to_i = to.index() as usize;

    let prior_castle = pos.castle;
    let prior_ep = pos.ep;
    let prior_halfmove = pos.halfmove;
    let prior_hash = pos.hash;

    let moving = pos
        .piece_at(from)
        .unwrap_or_else(|| panic!("make: no piece on from-square {}", from));
    let color = moving.color();

    let captured_code = if flag.is_capture() {
        if matches!(flag, MoveFlag::EnPassant) {
            pos.mailbox[prior_ep as usize]
        } else {
            pos.mailbox[to_i]
        }
    } else {
        0
    };

    pos.hash ^= zobrist_keys().ep[prior_ep as usize];

    if flag.is_capture() {
        if matches!(flag, MoveFlag::EnPassant) {
            pos.remove_piece(Square::from_index(prior_ep));
        } else {
            pos.remove_piece(to);
        }
    }

    pos.remove_piece(from);
    match flag.promotion_kind() {
        Some(promo_kind) => pos.put_piece(to, Piece::new(promo_kind, color)),
        None => pos.put_piece(to, moving),
    }

    if matches!(flag, MoveFlag::CastleK | MoveFlag::CastleQ) {
        let (rook_from, rook_to) = castle_rook_squares(color, flag);
        let rook = pos
            .piece_at(rook_from)
            .expect("castling move with no rook on its home square");
        pos.remove_piece(rook_from);
        pos.put_piece(rook_to, rook);
    }

    pos.hash ^= zobrist_keys().castle[pos.castle as usize];
    pos.castle &= tables::castle_mask(from.index() as usize) & tables::castle_mask(to_i);
    pos.hash ^= zobrist_keys().castle[pos.castle as usize];

    pos.ep = if matches!(flag, MoveFlag::DoublePush) {
        to_i as u8
    } else {
        0
    };
    pos.hash ^= zobrist_keys().ep[pos.ep as usize];

    pos.halfmove = if flag.is_capture() || moving.kind() == PieceKind::Pawn {
        0
    } else {
        prior_halfmove + 1
    };

    if color == Color::Black {
        pos.fullmove += 1;
    }

    pos.hash ^= zobrist_keys().side[1];
    pos.side = pos.side.opposite();

    pos.record_position();

    pos.push_undo(Undo {
        mv,
        captured: captured_code,
        prior_castle,
        prior_ep,
        prior_halfmove,
        prior_hash,
    });

    pos.refresh_attacks();
}

/// Reverses the most recent `make`. `mv` must be the same move that was
/// just applied.
pub fn undo(pos: &mut Position, mv: Move) {
    let record = pos.pop_undo();
    debug_assert!(record.mv == mv, "undo called with a move other than the last make");

    let from = mv.from();
    let to = mv.to();
    let flag = mv.flag();

    pos.forget_position();
    pos.side = pos.side.opposite();

    let moved = pos
        .piece_at(to)
        .unwrap_or_else(|| panic!("undo: no piece on to-square {}", to));
    let color = moved.color();

    if matches!(flag, MoveFlag::CastleK | MoveFlag::CastleQ) {
        let (rook_from, rook_to) = castle_rook_squares(color, flag);
        let rook = pos
            .piece_at(rook_to)
            .expect("castling undo with no rook on its post-castle square");
        pos.remove_piece(rook_to);
        pos.put_piece(rook_from, rook);
    }

    pos.remove_piece(to);
    match flag.promotion_kind() {
        Some(_) => pos.put_piece(from, Piece::new(PieceKind::Pawn, color)),
        None => pos.put_piece(from, moved),
    }

    if flag.is_capture() {
        let captured = Piece::from_code(record.captured)
            .expect("undo: capture flag set but no captured piece code recorded");
        if matches!(flag, MoveFlag::EnPassant) {
            pos.put_piece(Square::from_index(record.prior_ep), captured);
        } else {
            pos.put_piece(to, captured);
        }
    }

    pos.castle = record.prior_castle;
    pos.ep = record.prior_ep;
    pos.halfmove = record.prior_halfmove;
    pos.hash = record.prior_hash;

    if color == Color::Black {
        pos.fullmove -= 1;
    }

    pos.refresh_attacks();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;
    use std::str::FromStr;

    #[test]
    fn quiet_pawn_push_round_trips() {
        let mut pos = Position::new_start();
        let before = pos.clone();
        let mv = Move::new(Square::from_index(52), Square::from_index(36), MoveFlag::DoublePush);
        make(&mut pos, mv);
        assert_ne!(pos.hash, before.hash);
        assert_eq!(pos.ep, 36);
        undo(&mut pos, mv);
        assert_eq!(pos.hash, before.hash);
        assert_eq!(pos.mailbox, before.mailbox);
        assert_eq!(pos.ep, before.ep);
    }

    #[test]
    fn en_passant_capture_round_trips() {
        let mut pos =
            Position::from_str("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3").unwrap();
        let before = pos.clone();
        let from = Square::from_str("e5").unwrap();
        let to = Square::from_str("d6").unwrap();
        let mv = Move::new(from, to, MoveFlag::EnPassant);
        make(&mut pos, mv);
        assert!(pos.piece_at(Square::from_str("d5").unwrap()).is_none());
        assert!(pos.piece_at(to).is_some());
        undo(&mut pos, mv);
        assert_eq!(pos.mailbox, before.mailbox);
        assert_eq!(pos.hash, before.hash);
    }

    #[test]
    fn kingside_castle_moves_the_rook_and_round_trips() {
        let mut pos =
            Position::from_str("rnbqk2r/pppp1ppp/5n2/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4")
                .unwrap();
        let before = pos.clone();
        let mv = Move::new(Square::from_index(60), Square::from_index(62), MoveFlag::CastleK);
        make(&mut pos, mv);
        assert!(pos.piece_at(Square::from_index(61)).is_some());
        assert!(pos.piece_at(Square::from_index(63)).is_none());
        undo(&mut pos, mv);
        assert_eq!(pos.mailbox, before.mailbox);
        assert_eq!(pos.castle, before.castle);
    }
}
