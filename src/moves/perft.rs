//! Move-generator performance/correctness testing: node counts per depth,
//! divide (per-root-move node counts), and an optional move-type breakdown.

use crate::board::Position;
use crate::moves::magic::MagicTables;
use crate::moves::movegen::generate_into;
use crate::moves::types::Move;
use tracing::{debug, instrument};

const MAX_LOG_DEPTH: u32 = 3;
const MAX_PERFT_DEPTH: usize = 20;

pub struct PerftCounters {
    pub nodes: u64,
    pub captures: u64,
    pub ep_captures: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl PerftCounters {
    pub fn zero() -> Self {
        Self {
            nodes: 0,
            captures: 0,
            ep_captures: 0,
            castles: 0,
            promotions: 0,
            checks: 0,
            checkmates: 0,
        }
    }

    pub fn add(&mut self, o: &PerftCounters) {
        self.nodes += o.nodes;
        self.captures += o.captures;
        self.ep_captures += o.ep_captures;
        self.castles += o.castles;
        self.promotions += o.promotions;
        self.checks += o.checks;
        self.checkmates += o.checkmates;
    }
}

fn create_move_buffer_array() -> [Vec<Move>; MAX_PERFT_DEPTH] {
    std::array::from_fn(|_| Vec::with_capacity(64))
}

fn perft_recursive(
    pos: &mut Position,
    tables: &MagicTables,
    depth: u32,
    ply: usize,
    move_buffers: &mut [Vec<Move>],
) -> u64 {
    if depth == 0 {
        return 1;
    }

    generate_into(pos, tables, &mut move_buffers[ply]);
    let move_count = move_buffers[ply].len();
    let mut node_count = 0;

    for i in 0..move_count {
        let mv = move_buffers[ply][i];
        pos.make(mv);
        node_count += perft_recursive(pos, tables, depth - 1, ply + 1, move_buffers);
        pos.undo(mv);
    }

    node_count
}

#[instrument(skip(pos, tables), fields(depth))]
pub fn perft(pos: &mut Position, tables: &MagicTables, depth: u32) -> u64 {
    assert!(
        depth as usize <= MAX_PERFT_DEPTH,
        "depth {} exceeds MAX_PERFT_DEPTH {}",
        depth,
        MAX_PERFT_DEPTH
    );
    let mut move_buffers = create_move_buffer_array();
    perft_recursive(pos, tables, depth, 0, &mut move_buffers)
}

#[instrument(skip(pos, tables), fields(depth))]
pub fn perft_divide(pos: &mut Position, tables: &MagicTables, depth: u32) -> u64 {
    assert!(
        depth as usize <= MAX_PERFT_DEPTH,
        "depth {} exceeds MAX_PERFT_DEPTH {}",
        depth,
        MAX_PERFT_DEPTH
    );
    let mut move_buffers = create_move_buffer_array();

    generate_into(pos, tables, &mut move_buffers[0]);
    if depth <= MAX_LOG_DEPTH {
        debug!(depth, moves = move_buffers[0].len(), "divide: root legal moves");
    }

    let mut total = 0;
    let move_count = move_buffers[0].len();

    for i in 0..move_count {
        let mv = move_buffers[0][i];
        pos.make(mv);

        let count = if depth == 1 {
            1
        } else {
            perft_recursive(pos, tables, depth - 1, 1, &mut move_buffers)
        };

        pos.undo(mv);

        if depth <= MAX_LOG_DEPTH {
            debug!(%mv, nodes = count, "divide: root child total");
        }

        println!("{}: {}", mv, count);
        total += count;
    }

    debug!(depth, total, "divide: total");
    println!("Total: {}", total);
    total
}

fn perft_count_recursive(
    pos: &mut Position,
    tables: &MagicTables,
    depth: u32,
    ply: usize,
    out: &mut PerftCounters,
    move_buffers: &mut [Vec<Move>],
) {
    if depth == 0 {
        out.nodes += 1;
        let side_in_check = crate::moves::attack::in_check(pos, pos.side, tables);
        if side_in_check {
            out.checks += 1;
        }
        generate_into(pos, tables, &mut move_buffers[ply]);
        if move_buffers[ply].is_empty() && side_in_check {
            out.checkmates += 1;
        }
        return;
    }

    generate_into(pos, tables, &mut move_buffers[ply]);
    let move_count = move_buffers[ply].len();

    for i in 0..move_count {
        let mv = move_buffers[ply][i];

        if mv.is_capture() {
            out.captures += 1;
            if mv.is_en_passant() {
                out.ep_captures += 1;
            }
        }
        if mv.is_castle() {
            out.castles += 1;
        }
        if mv.promotion_kind().is_some() {
            out.promotions += 1;
        }

        #[cfg(debug_assertions)]
        let h0 = pos.hash;

        pos.make(mv);
        perft_count_recursive(pos, tables, depth - 1, ply + 1, out, move_buffers);
        pos.undo(mv);

        #[cfg(debug_assertions)]
        {
            debug_assert_eq!(pos.hash, h0, "hash changed across make/undo");
            debug_assert_eq!(pos.compute_hash_full(), pos.hash, "full recompute mismatch");
        }
    }
}

pub fn perft_count_with_breakdown(pos: &mut Position, tables: &MagicTables, depth: u32, out: &mut PerftCounters) {
    assert!(
        depth as usize <= MAX_PERFT_DEPTH,
        "depth {} exceeds MAX_PERFT_DEPTH {}",
        depth,
        MAX_PERFT_DEPTH
    );
    let mut move_buffers = create_move_buffer_array();
    perft_count_recursive(pos, tables, depth, 0, out, &mut move_buffers);
}

pub fn perft_divide_with_breakdown(pos: &mut Position, tables: &MagicTables, depth: u32) -> Vec<(Move, PerftCounters)> {
    assert!(
        depth as usize <= MAX_PERFT_DEPTH,
        "depth {} exceeds MAX_PERFT_DEPTH {}",
        depth,
        MAX_PERFT_DEPTH
    );
    let mut move_buffers = create_move_buffer_array();
    generate_into(pos, tables, &mut move_buffers[0]);

    let move_count = move_buffers[0].len();
    let mut out = Vec::with_capacity(move_count);

    for i in 0..move_count {
        let mv = move_buffers[0][i];
        pos.make(mv);
        let mut pc = PerftCounters::zero();

        if depth > 1 {
            perft_count_recursive(pos, tables, depth - 1, 1, &mut pc, &mut move_buffers);
        } else {
            pc.nodes = 1;
        }

        pos.undo(mv);
        out.push((mv, pc));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::magic::default_tables;
    use std::str::FromStr;

    #[test]
    fn perft_depth_one_matches_move_count() {
        let mut pos = Position::new_start();
        let tables = default_tables();
        assert_eq!(perft(&mut pos, tables, 1), 20);
    }

    #[test]
    fn perft_depth_two_is_four_hundred() {
        let mut pos = Position::new_start();
        let tables = default_tables();
        assert_eq!(perft(&mut pos, tables, 2), 400);
    }

    #[test]
    fn perft_depth_three_matches_known_count() {
        let mut pos = Position::new_start();
        let tables = default_tables();
        assert_eq!(perft(&mut pos, tables, 3), 8902);
    }

    #[test]
    fn kiwipete_depth_one_matches_known_count() {
        let mut pos =
            Position::from_str("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
        let tables = default_tables();
        assert_eq!(perft(&mut pos, tables, 1), 48);
    }
}
