//! The attack analyzer: derives attack-union and per-square attack
//! bitboards, the checker set, the check mask, and absolute pins from a
//! position. Rebuilt from scratch after every make/undo.

use crate::bitboard::BitboardExt;
use crate::board::Position;
use crate::moves::magic::MagicTables;
use crate::piece::{Color, Piece, PieceKind};
use crate::tables;

/// Bitboard of squares a piece of `kind`/`color` on `sq` attacks, given the
/// blocker set `blockers` (ignored by leapers).
#[inline]
pub fn attacks_from(kind: PieceKind, color: Color, sq: usize, blockers: u64, tables: &MagicTables) -> u64 {
    match kind {
        PieceKind::Pawn => crate::tables::pawn_attacks(color, sq),
        PieceKind::Knight => crate::tables::get_knight_attacks(sq),
        PieceKind::King => crate::tables::get_king_attacks(sq),
        PieceKind::Bishop => tables.bishop.get_attacks(sq, blockers),
        PieceKind::Rook => tables.rook.get_attacks(sq, blockers),
        PieceKind::Queen => tables.queen_attacks(sq, blockers),
    }
}

fn is_slider(kind: PieceKind) -> bool {
    matches!(kind, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
}

#[derive(Debug, Clone)]
pub struct AttackAnalyzer {
    pub attack_union: [u64; 2],
    pub attack_from: [[u64; 64]; 2],
    pub checkers: u64,
    pub check_mask: u64,
    pub pins: [[u64; 64]; 2],
}

impl AttackAnalyzer {
    /// An analyzer with nothing computed yet; valid only until `compute` is
    /// called for the first time over a real position.
    pub fn empty() -> Self {
        AttackAnalyzer {
            attack_union: [0; 2],
            attack_from: [[0; 64]; 2],
            checkers: 0,
            check_mask: u64::MAX,
            pins: [[0; 64]; 2],
        }
    }

    pub fn compute(pos: &Position, tables: &MagicTables) -> Self {
        let occ = pos.occupied();
        let mut attack_union = [0u64; 2];
        let mut attack_from = [[0u64; 64]; 2];

        for &color in &[Color::White, Color::Black] {
            for &kind in &PieceKind::ALL {
                let piece = Piece::new(kind, color);
                let mut bb = pos.pieces[piece.array_index()];
                while bb != 0 {
                    let sq = bb.pop_lsb() as usize;
                    let atk = attacks_from(kind, color, sq, occ, tables);
                    attack_from[color as usize][sq] = atk;
                    attack_union[color as usize] |= atk;
                }
            }
        }

        let side = pos.side;
        let enemy = side.opposite();
        let king_sq = pos.king_square(side).index() as usize;

        let mut checkers = 0u64;
        let mut enemy_pieces = pos.occ[enemy as usize];
        while enemy_pieces != 0 {
            let sq = enemy_pieces.pop_lsb() as usize;
            if attack_from[enemy as usize][sq] & (1u64 << king_sq) != 0 {
                checkers |= 1u64 << sq;
            }
        }

        let check_mask = match checkers.count_ones() {
            0 => u64::MAX,
            1 => {
                let checker_sq = checkers.lsb() as usize;
                let checker_kind = pos
                    .piece_kind_at(checker_sq)
                    .expect("checker square must hold a piece");
                if is_slider(checker_kind) {
                    tables::line(king_sq, checker_sq)
                } else {
                    checkers
                }
            }
            _ => 0,
        };

        let mut pins = [[0u64; 64]; 2];
        for &color in &[Color::White, Color::Black] {
            let enemy_color = color.opposite();
            let king_sq = pos.king_square(color).index() as usize;
            for &kind in &[PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen] {
                let piece = Piece::new(kind, enemy_color);
                let mut bb = pos.pieces[piece.array_index()];
                while bb != 0 {
                    let enemy_sq = bb.pop_lsb() as usize;
                    let line = tables::line(king_sq, enemy_sq);
                    if line == 0 {
                        continue; // not collinear at all
                    }
                    // A rook slides only along ranks/files, a bishop only along
                    // diagonals; reject lines the piece kind can't actually see.
                    let same_rank_or_file =
                        (king_sq / 8 == enemy_sq / 8) || (king_sq % 8 == enemy_sq % 8);
                    let ok_for_kind = match kind {
                        PieceKind::Rook => same_rank_or_file,
                        PieceKind::Bishop => !same_rank_or_file,
                        _ => true,
                    };
                    if !ok_for_kind {
                        continue;
                    }

                    let between = tables::between(king_sq, enemy_sq);
                    let friendly_between = between & pos.occ[color as usize];
                    let enemy_between = between & pos.occ[enemy_color as usize];
                    if friendly_between.count_ones() == 1 && enemy_between == 0 {
                        let pinned_sq = friendly_between.lsb() as usize;
                        pins[color as usize][pinned_sq] = line;
                    }
                }
            }
        }

        AttackAnalyzer {
            attack_union,
            attack_from,
            checkers,
            check_mask,
            pins,
        }
    }
}

/// The attack union of `attacker`'s pieces, with `exclude_sq` (typically the
/// defending king's own square) removed from the blocker set. Used when
/// filtering king destination squares and castling paths, so a slider's ray
/// is not cut short by the very king that would be moving out of it.
pub fn attack_union_excluding(
    pos: &Position,
    tables: &MagicTables,
    attacker: Color,
    exclude_sq: Option<usize>,
) -> u64 {
    let mut occ = pos.occupied();
    if let Some(sq) = exclude_sq {
        occ &= !(1u64 << sq);
    }
    let mut union = 0u64;
    for &kind in &PieceKind::ALL {
        let piece = Piece::new(kind, attacker);
        let mut bb = pos.pieces[piece.array_index()];
        while bb != 0 {
            let sq = bb.pop_lsb() as usize;
            union |= attacks_from(kind, attacker, sq, occ, tables);
        }
    }
    union
}

pub fn in_check(pos: &Position, side: Color, tables: &MagicTables) -> bool {
    let king_sq = pos.king_square(side).index() as usize;
    attack_union_excluding(pos, tables, side.opposite(), None) & (1u64 << king_sq) != 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;

    #[test]
    fn start_position_has_no_checks_or_pins() {
        let pos = Position::new_start();
        let tables = crate::moves::magic::default_tables();
        let aa = AttackAnalyzer::compute(&pos, tables);
        assert_eq!(aa.checkers, 0);
        assert_eq!(aa.check_mask, u64::MAX);
        assert!(aa.pins[0].iter().all(|&p| p == 0));
        assert!(aa.pins[1].iter().all(|&p| p == 0));
    }
}
