//! One-shot construction of the magic bitboard tables for sliding pieces.
//!
//! Relevant-blocker masks exclude the board edge on each ray (a piece can
//! always slide all the way to the edge regardless of what, if anything, sits
//! there, so the edge square never changes the attack set and is dropped from
//! the hash key). Magic numbers are found by bounded random search and are
//! re-derived once per process start rather than persisted, matching the
//! "no persistence" restriction on this crate.

use super::attacks::{bishop_attacks_per_square, rook_attacks_per_square};
use super::search::find_magic_number_for_square;
use super::structs::{BishopMagicTables, MagicEntry, MagicTables, RookMagicTables};
use crate::utils::square_index;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Selects how the magic-number search's PRNG is seeded.
pub enum MagicTableSeed {
    Fixed(u64),
    Random,
}

/// The seed used by `generate_magic_tables` callers that don't care about
/// reproducing a specific search (the CLI, normal library use). Fixed so that
/// successive runs build byte-identical tables.
const DEFAULT_MAGIC_SEED: u64 = 0x4D41_4749_4331_0001;

fn rook_relevant_mask(square: usize) -> u64 {
    let rank = (square / 8) as i32;
    let file = (square % 8) as i32;
    let mut mask = 0u64;
    for r in (rank + 1)..7 {
        mask |= 1 << square_index(r as usize, file as usize);
    }
    for r in (1..rank).rev() {
        mask |= 1 << square_index(r as usize, file as usize);
    }
    for f in (file + 1)..7 {
        mask |= 1 << square_index(rank as usize, f as usize);
    }
    for f in (1..file).rev() {
        mask |= 1 << square_index(rank as usize, f as usize);
    }
    mask
}

fn bishop_relevant_mask(square: usize) -> u64 {
    let rank = (square / 8) as i32;
    let file = (square % 8) as i32;
    let mut mask = 0u64;
    for (dr, df) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        let mut r = rank + dr;
        let mut f = file + df;
        while (1..=6).contains(&r) && (1..=6).contains(&f) {
            mask |= 1 << square_index(r as usize, f as usize);
            r += dr;
            f += df;
        }
    }
    mask
}

/// Enumerates every subset of `mask`'s set bits (the Carry-Rippler trick).
fn subsets_of(mask: u64) -> Vec<u64> {
    let mut subsets = Vec::with_capacity(1usize << mask.count_ones());
    let mut subset = 0u64;
    loop {
        subsets.push(subset);
        if subset == mask {
            break;
        }
        subset = subset.wrapping_sub(mask) & mask;
    }
    subsets
}

fn build_entry<R: rand::RngCore>(
    square: usize,
    mask: u64,
    attacker: impl Fn(usize, u64) -> u64,
    rng: &mut R,
) -> MagicEntry {
    let blockers = subsets_of(mask);
    let attacks: Vec<u64> = blockers.iter().map(|&b| attacker(square, b)).collect();
    let shift = 64 - mask.count_ones();

    let magic = loop {
        match find_magic_number_for_square(&blockers, &attacks, shift, rng) {
            Ok(m) => break m,
            Err(_) => continue,
        }
    };

    let mut table = vec![0u64; 1usize << mask.count_ones()];
    for (&b, &a) in blockers.iter().zip(attacks.iter()) {
        let index = (b.wrapping_mul(magic) >> shift) as usize;
        table[index] = a;
    }

    MagicEntry {
        magic,
        shift,
        mask,
        table: table.into_boxed_slice(),
    }
}

pub fn generate_magic_tables(seed: MagicTableSeed) -> Result<MagicTables, String> {
    let mut rng = match seed {
        MagicTableSeed::Fixed(s) => StdRng::seed_from_u64(s),
        MagicTableSeed::Random => StdRng::seed_from_u64(rand::random()),
    };

    let mut rook_entries = Vec::with_capacity(64);
    let mut bishop_entries = Vec::with_capacity(64);

    for square in 0..64 {
        let rook_mask = rook_relevant_mask(square);
        rook_entries.push(build_entry(
            square,
            rook_mask,
            rook_attacks_per_square,
            &mut rng,
        ));

        let bishop_mask = bishop_relevant_mask(square);
        bishop_entries.push(build_entry(
            square,
            bishop_mask,
            bishop_attacks_per_square,
            &mut rng,
        ));
    }

    Ok(MagicTables {
        rook: RookMagicTables {
            entries: rook_entries,
        },
        bishop: BishopMagicTables {
            entries: bishop_entries,
        },
    })
}

pub fn generate_default_magic_tables() -> MagicTables {
    generate_magic_tables(MagicTableSeed::Fixed(DEFAULT_MAGIC_SEED))
        .expect("default magic table generation must succeed")
}
