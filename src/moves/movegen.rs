//! Legal move generation.
//!
//! Pseudo-legality and legality are decided together: the attack analyzer's
//! check mask and pin masks are consulted directly while destinations are
//! built, rather than generating pseudo-legal moves and filtering them by
//! making and retracting each one. The one exception is en passant's
//! horizontal discovered-check case, which a per-square pin mask cannot
//! express; that single case is resolved with a direct synthetic-occupancy
//! slider check instead of mutating the position.

use crate::bitboard::{BitboardExt, RANK_1, RANK_2, RANK_7, RANK_8};
use crate::board::Position;
use crate::moves::attack::attack_union_excluding;
use crate::moves::magic::{MagicTables, default_tables};
use crate::moves::types::{Move, MoveBuffer, MoveFlag};
use crate::piece::{Color, Piece, PieceKind};
use crate::square::Square;
use crate::tables;

const PROMOS: [MoveFlag; 4] = [
    MoveFlag::PromoQ,
    MoveFlag::PromoR,
    MoveFlag::PromoB,
    MoveFlag::PromoN,
];
const PROMO_CAPTURES: [MoveFlag; 4] = [
    MoveFlag::PromoQCapture,
    MoveFlag::PromoRCapture,
    MoveFlag::PromoBCapture,
    MoveFlag::PromoNCapture,
];

#[inline]
fn push_targets(from: Square, mut targets: u64, enemy_occ: u64, buf: &mut impl MoveBuffer) {
    while targets != 0 {
        let to = targets.pop_lsb() as u8;
        let flag = if enemy_occ & (1u64 << to) != 0 {
            MoveFlag::Capture
        } else {
            MoveFlag::Quiet
        };
        buf.push(Move::new(from, Square::from_index(to), flag));
    }
}

#[inline]
fn push_promotions(from: Square, mut targets: u64, enemy_occ: u64, buf: &mut impl MoveBuffer) {
    while targets != 0 {
        let to = targets.pop_lsb() as u8;
        let is_cap = enemy_occ & (1u64 << to) != 0;
        let flags = if is_cap { &PROMO_CAPTURES } else { &PROMOS };
        for &flag in flags {
            buf.push(Move::new(from, Square::from_index(to), flag));
        }
    }
}

fn pin_restricted(pos: &Position, from: Square, destinations: u64) -> u64 {
    let pin_mask = pos.attacks.pins[pos.side as usize][from.index() as usize];
    if pin_mask == 0 {
        destinations
    } else {
        destinations & pin_mask
    }
}

/// Generates every legal move for the side to move into `buf`.
pub fn generate_into(pos: &Position, tables: &MagicTables, buf: &mut impl MoveBuffer) {
    buf.clear();

    let side = pos.side;
    let enemy = side.opposite();
    let own_occ = pos.occupancy(side);
    let enemy_occ = pos.occupancy(enemy);
    let all_occ = pos.occupied();
    let king_sq = pos.king_square(side);

    let checker_count = pos.attacks.checkers.count_ones();
    generate_king_moves(pos, tables, side, king_sq, own_occ, enemy_occ, buf);
    if checker_count >= 2 {
        return; // double check: only the king may move
    }

    let check_mask = pos.attacks.check_mask;

    generate_pawn_moves(pos, side, own_occ, enemy_occ, all_occ, check_mask, buf);

    for &kind in &[PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen] {
        let piece = Piece::new(kind, side);
        let mut bb = pos.pieces[piece.array_index()];
        while bb != 0 {
            let from_idx = bb.pop_lsb() as usize;
            let from = Square::from_index(from_idx as u8);
            let atk = crate::moves::attack::attacks_from(kind, side, from_idx, all_occ, tables);
            let mut targets = atk & !own_occ & check_mask;
            targets = pin_restricted(pos, from, targets);
            push_targets(from, targets, enemy_occ, buf);
        }
    }

    if checker_count == 0 {
        generate_castling(pos, tables, side, king_sq, all_occ, buf);
    }
}

/// Convenience wrapper returning a freshly allocated move list.
pub fn generate(pos: &Position) -> Vec<Move> {
    let mut buf = Vec::with_capacity(64);
    generate_into(pos, default_tables(), &mut buf);
    buf
}

/// Parses a UCI-style move string (`<from><to>[promo]`, e.g. `e2e4` or
/// `a7a8q`) against the position's own legal move list, since the string
/// alone doesn't carry capture/en-passant/castle flags.
pub fn parse_uci(pos: &Position, s: &str) -> Result<Move, crate::error::EngineError> {
    use crate::error::EngineError;

    if s.len() != 4 && s.len() != 5 {
        return Err(EngineError::MalformedMove(format!("'{s}' is not 4 or 5 characters")));
    }
    let from: Square = s[0..2]
        .parse()
        .map_err(|_| EngineError::MalformedMove(format!("bad from-square in '{s}'")))?;
    let to: Square = s[2..4]
        .parse()
        .map_err(|_| EngineError::MalformedMove(format!("bad to-square in '{s}'")))?;
    let promo = match s.as_bytes().get(4) {
        None => None,
        Some(b'q') => Some(PieceKind::Queen),
        Some(b'r') => Some(PieceKind::Rook),
        Some(b'b') => Some(PieceKind::Bishop),
        Some(b'n') => Some(PieceKind::Knight),
        Some(_) => return Err(EngineError::MalformedMove(format!("bad promotion letter in '{s}'"))),
    };

    generate(pos)
        .into_iter()
        .find(|mv| mv.from() == from && mv.to() == to && mv.promotion_kind() == promo)
        .ok_or_else(|| EngineError::MalformedMove(format!("'{s}' is not a legal move here")))
}

fn generate_king_moves(
    pos: &Position,
    tables: &MagicTables,
    side: Color,
    king_sq: Square,
    own_occ: u64,
    enemy_occ: u64,
    buf: &mut impl MoveBuffer,
) {
    let enemy = side.opposite();
    let raw = tables::get_king_attacks(king_sq.index() as usize) & !own_occ;
    let danger = attack_union_excluding(pos, tables, enemy, Some(king_sq.index() as usize));
    let safe = raw & !danger;
    push_targets(king_sq, safe, enemy_occ, buf);
}

fn generate_castling(
    pos: &Position,
    tables: &MagicTables,
    side: Color,
    king_sq: Square,
    all_occ: u64,
    buf: &mut impl MoveBuffer,
) {
    use crate::board::{CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};

    let enemy = side.opposite();
    let danger = attack_union_excluding(pos, tables, enemy, Some(king_sq.index() as usize));

    let (king_flag, queen_flag, king_sq_idx) = match side {
        Color::White => (CASTLE_WK, CASTLE_WQ, 60u8),
        Color::Black => (CASTLE_BK, CASTLE_BQ, 4u8),
    };
    if king_sq.index() != king_sq_idx {
        return;
    }

    if pos.has_castling(king_flag) {
        let (between, pass_through) = match side {
            Color::White => (0x6000_0000_0000_0000u64, [61u8, 62u8]),
            Color::Black => (0x0000_0000_0000_0060u64, [5u8, 6u8]),
        };
        let clear = all_occ & between == 0;
        let safe = pass_through.iter().all(|&s| danger & (1u64 << s) == 0);
        if clear && safe {
            let to = Square::from_index(pass_through[1]);
            buf.push(Move::new(king_sq, to, MoveFlag::CastleK));
        }
    }

    if pos.has_castling(queen_flag) {
        let (between, pass_through) = match side {
            Color::White => (0x0E00_0000_0000_0000u64, [59u8, 58u8]),
            Color::Black => (0x0000_0000_0000_000Eu64, [3u8, 2u8]),
        };
        let clear = all_occ & between == 0;
        let safe = pass_through.iter().all(|&s| danger & (1u64 << s) == 0);
        if clear && safe {
            let to = Square::from_index(pass_through[1]);
            buf.push(Move::new(king_sq, to, MoveFlag::CastleQ));
        }
    }
}

fn generate_pawn_moves(
    pos: &Position,
    side: Color,
    own_occ: u64,
    enemy_occ: u64,
    all_occ: u64,
    check_mask: u64,
    buf: &mut impl MoveBuffer,
) {
    let (forward, start_rank, promo_rank): (i32, u64, u64) = match side {
        Color::White => (-8, RANK_2, RANK_8),
        Color::Black => (8, RANK_7, RANK_1),
    };

    let pawns = pos.pieces[Piece::new(PieceKind::Pawn, side).array_index()];
    let mut remaining = pawns;
    while remaining != 0 {
        let from_idx = remaining.pop_lsb() as usize;
        let from = Square::from_index(from_idx as u8);
        let from_bit = 1u64 << from_idx;

        let one_idx = from_idx as i32 + forward;
        let mut single_push = 0u64;
        let mut double_push = 0u64;
        if (0..64).contains(&one_idx) && all_occ & (1u64 << one_idx) == 0 {
            single_push = 1u64 << one_idx;
            let two_idx = one_idx + forward;
            if from_bit & start_rank != 0 && (0..64).contains(&two_idx) && all_occ & (1u64 << two_idx) == 0 {
                double_push = 1u64 << two_idx;
            }
        }

        let attacks = tables::pawn_attacks(side, from_idx) & enemy_occ;

        let targets = pin_restricted(pos, from, (single_push | attacks) & check_mask);
        let double_targets = pin_restricted(pos, from, double_push & check_mask);

        let promo_targets = targets & promo_rank;
        let plain_targets = targets & !promo_rank;
        push_targets(from, plain_targets, enemy_occ, buf);
        push_promotions(from, promo_targets, enemy_occ, buf);
        if double_targets != 0 {
            let to = Square::from_index(double_targets.lsb() as u8);
            buf.push(Move::new(from, to, MoveFlag::DoublePush));
        }

        if pos.ep != 0 {
            if let Some(landing) = ep_landing_square(side, pos.ep) {
                if tables::pawn_attacks(side, from_idx) & (1u64 << landing) != 0 {
                    try_en_passant(pos, side, from, Square::from_index(landing), check_mask, buf);
                }
            }
        }
    }
}

/// The square a capturing pawn lands on, given the square of the pawn it
/// would capture en passant (our `ep` field stores the captured pawn's
/// actual square, one rank behind where the FEN names the target).
fn ep_landing_square(side: Color, captured_pawn_sq: u8) -> Option<u8> {
    let idx = captured_pawn_sq as i32;
    let landing = match side {
        Color::White => idx - 8,
        Color::Black => idx + 8,
    };
    if (0..64).contains(&landing) {
        Some(landing as u8)
    } else {
        None
    }
}

fn try_en_passant(
    pos: &Position,
    side: Color,
    from: Square,
    to: Square,
    check_mask: u64,
    buf: &mut impl MoveBuffer,
) {
    let captured_sq = pos.ep as usize;
    // An en-passant capture also resolves a check only if it removes the
    // checking pawn or blocks/captures along the check line at `to`.
    if check_mask & ((1u64 << to.index()) | (1u64 << captured_sq)) == 0 && pos.attacks.checkers != 0 {
        return;
    }

    let pin_mask = pos.attacks.pins[side as usize][from.index() as usize];
    if pin_mask != 0 && pin_mask & (1u64 << to.index()) == 0 {
        return;
    }

    if ep_discovers_check(pos, side, from, captured_sq) {
        return;
    }

    buf.push(Move::new(from, to, MoveFlag::EnPassant));
}

/// The one case a per-square pin mask cannot express: both the capturing
/// pawn and the captured pawn leave the board in the same instant, which can
/// expose the king along a rank, file, or diagonal even when neither pawn
/// was individually pinned (a diagonal discovery runs through the captured
/// pawn's square rather than the landing square, so it isn't caught by the
/// landing square's own pin mask either).
fn ep_discovers_check(pos: &Position, side: Color, from: Square, captured_sq: usize) -> bool {
    let king_sq = pos.king_square(side).index() as usize;
    let tables = default_tables();
    let synthetic_occ = pos.occupied() & !(1u64 << from.index()) & !(1u64 << captured_sq);
    let enemy = side.opposite();
    let enemy_rooks = pos.pieces[Piece::new(PieceKind::Rook, enemy).array_index()];
    let enemy_bishops = pos.pieces[Piece::new(PieceKind::Bishop, enemy).array_index()];
    let enemy_queens = pos.pieces[Piece::new(PieceKind::Queen, enemy).array_index()];
    let rook_like = tables.rook.get_attacks(king_sq, synthetic_occ) & (enemy_rooks | enemy_queens);
    let bishop_like =
        tables.bishop.get_attacks(king_sq, synthetic_occ) & (enemy_bishops | enemy_queens);
    (rook_like | bishop_like) != 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn start_position_has_twenty_moves() {
        let pos = Position::new_start();
        let moves = generate(&pos);
        assert_eq!(moves.len(), 20);
    }

    #[test]
    fn single_check_restricts_to_blocks_and_captures() {
        // White king on e1 in check from a rook on e8; only blocks/captures/king moves are legal.
        let pos = Position::from_str("4r3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let moves = generate(&pos);
        assert!(moves.iter().all(|m| m.from().index() == 60));
    }

    #[test]
    fn pinned_bishop_cannot_leave_the_pin_line() {
        let pos = Position::from_str("4k3/8/8/8/8/2b5/8/4KB1r w - - 0 1").unwrap();
        let moves = generate(&pos);
        let bishop_moves: Vec<_> = moves.iter().filter(|m| m.from().index() == 61).collect();
        assert!(bishop_moves.is_empty(), "a bishop pinned along a rank has no legal moves");
    }

    #[test]
    fn parse_uci_finds_the_matching_legal_move() {
        let pos = Position::new_start();
        let mv = parse_uci(&pos, "e2e4").unwrap();
        assert_eq!(mv.flag(), MoveFlag::DoublePush);
    }

    #[test]
    fn parse_uci_rejects_an_illegal_move() {
        let pos = Position::new_start();
        assert!(parse_uci(&pos, "e2e5").is_err());
    }

    #[test]
    fn en_passant_diagonal_discovered_check_is_illegal() {
        // White Kb8, black pawn double-pushed to e5, white pawn d5 could
        // capture e.p. on e6; doing so removes the e5 pawn and opens the
        // b8-f4 diagonal onto the black bishop, a discovery the landing
        // square e6 itself is not on.
        let pos = Position::from_str("1K6/8/8/3Pp3/5b2/8/8/7k w - e6 0 1").unwrap();
        let moves = generate(&pos);
        assert!(
            moves.iter().all(|m| m.flag() != MoveFlag::EnPassant),
            "en passant must be rejected when it uncovers a diagonal check"
        );
    }
}
