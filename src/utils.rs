//! Small free functions shared across the precomputed-table and
//! move-generation code.

use crate::bitboard::BitboardExt;

/// Index of the square at `(rank, file)` using this crate's top-down rank
/// convention (rank 0 = chess rank 8, file 0 = file a).
#[inline]
pub fn square_index(rank: usize, file: usize) -> usize {
    rank * 8 + file
}

/// Pops and returns the least-significant set bit's index, clearing it in `bb`.
#[inline]
pub fn pop_lsb(bb: &mut u64) -> u8 {
    bb.pop_lsb() as u8
}
