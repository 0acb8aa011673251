use crate::utils::square_index;
use once_cell::sync::OnceCell;

#[inline]
/// Scanning along an axis for available positions. Created a function to replace repeated logic.
fn scan_ray<F>(mut rank: isize, mut file: isize, step: F, mut on_square: impl FnMut(usize) -> bool)
where
    F: Fn(isize, isize) -> (isize, isize),
{
    while (0..=7).contains(&rank) && (0..=7).contains(&file) {
        let sq = square_index(rank as usize, file as usize);
        if !on_square(sq) {
            break;
        }
        let (new_rank, new_file) = step(rank, file);
        rank = new_rank;
        file = new_file;
    }
}

#[inline]
pub fn rook_attacks_per_square(square: usize, blockers: u64) -> u64 {
    let rank = square / 8;
    let file = square % 8;
    let mut attacks = 0u64;

    // Function to add possible attacks based blockers and current square
    // Created as a closure to keep the function local
    let mut add = |sq: usize| {
        attacks |= 1 << sq;
        (blockers >> sq) & 1 == 0 // stop if blocker found
    };

    scan_ray(
        rank as isize + 1,
        file as isize,
        |r, f| (r + 1, f),
        &mut add,
    ); // north

    scan_ray(
        rank as isize - 1,
        file as isize,
        |r, f| (r - 1, f),
        &mut add,
    ); // south

    scan_ray(
        rank as isize,
        file as isize + 1,
        |r, f| (r, f + 1),
        &mut add,
    ); // east

    scan_ray(
        rank as isize,
        file as isize - 1,
        |r, f| (r, f - 1),
        &mut add,
    ); // west

    attacks
}

#[inline]
pub fn bishop_attacks_per_square(square: usize, blockers: u64) -> u64 {
    let rank = square / 8;
    let file = square % 8;
    let mut attacks = 0u64;

    let mut add = |sq: usize| {
        attacks |= 1 << sq;
        (blockers >> sq) & 1 == 0
    };

    scan_ray(
        rank as isize + 1,
        file as isize + 1,
        |r, f| (r + 1, f + 1),
        &mut add,
    ); // NE

    scan_ray(
        rank as isize - 1,
        file as isize - 1,
        |r, f| (r - 1, f - 1),
        &mut add,
    ); // SW

    scan_ray(
        rank as isize + 1,
        file as isize - 1,
        |r, f| (r + 1, f - 1),
        &mut add,
    ); // NW

    scan_ray(
        rank as isize - 1,
        file as isize + 1,
        |r, f| (r - 1, f + 1),
        &mut add,
    ); // SE

    attacks
}

pub fn get_rook_attack_bitboards(square: usize, blockers: &[u64]) -> Vec<u64> {
    blockers
        .iter()
        .map(|&b| rook_attacks_per_square(square, b))
        .collect()
}

pub fn get_bishop_attack_bitboards(square: usize, blockers: &[u64]) -> Vec<u64> {
    blockers
        .iter()
        .map(|&b| bishop_attacks_per_square(square, b))
        .collect()
}

/// Built from bit geometry rather than a reused literal table: a hardcoded
/// table tied to one square-numbering convention silently breaks under
/// another, so these are derived the same way `build_pawn_attacks` is.
fn build_knight_attacks() -> [u64; 64] {
    const DELTAS: [(i32, i32); 8] = [
        (1, 2),
        (1, -2),
        (-1, 2),
        (-1, -2),
        (2, 1),
        (2, -1),
        (-2, 1),
        (-2, -1),
    ];
    let mut table = [0u64; 64];
    for square in 0..64usize {
        let rank = (square / 8) as i32;
        let file = (square % 8) as i32;
        for (dr, df) in DELTAS {
            let r = rank + dr;
            let f = file + df;
            if (0..=7).contains(&r) && (0..=7).contains(&f) {
                table[square] |= 1 << square_index(r as usize, f as usize);
            }
        }
    }
    table
}

fn build_king_attacks() -> [u64; 64] {
    const DELTAS: [(i32, i32); 8] = [
        (1, 0),
        (-1, 0),
        (0, 1),
        (0, -1),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ];
    let mut table = [0u64; 64];
    for square in 0..64usize {
        let rank = (square / 8) as i32;
        let file = (square % 8) as i32;
        for (dr, df) in DELTAS {
            let r = rank + dr;
            let f = file + df;
            if (0..=7).contains(&r) && (0..=7).contains(&f) {
                table[square] |= 1 << square_index(r as usize, f as usize);
            }
        }
    }
    table
}

static KNIGHT_ATTACKS: OnceCell<[u64; 64]> = OnceCell::new();
static KING_ATTACKS: OnceCell<[u64; 64]> = OnceCell::new();

#[inline]
pub fn get_knight_attacks(square: usize) -> u64 {
    KNIGHT_ATTACKS.get_or_init(build_knight_attacks)[square]
}

#[inline]
pub fn get_king_attacks(square: usize) -> u64 {
    KING_ATTACKS.get_or_init(build_king_attacks)[square]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bit(sq: usize) -> u64 {
        1u64 << sq
    }

    #[test]
    fn rook_attacks_from_d4_no_blockers() {
        let square = 27; // d4
        let blockers = 0;
        let result = rook_attacks_per_square(square, blockers);

        let expected = bit(3)   // d1
            | bit(11)           // d2
            | bit(19)           // d3
            | bit(35)           // d5
            | bit(43)           // d6
            | bit(51)           // d7
            | bit(59)           // d8
            | bit(24)           // a4
            | bit(25)           // b4
            | bit(26)           // c4
            | bit(28)           // e4
            | bit(29)           // f4
            | bit(30)           // g4
            | bit(31); // h4

        assert_eq!(result, expected);
    }

    #[test]
    fn bishop_attacks_from_d4_no_blockers() {
        let square = 27; // d4
        let blockers = 0;
        let result = bishop_attacks_per_square(square, blockers);

        let expected = bit(36) // e5
            | bit(45)          // f6
            | bit(54)          // g7
            | bit(63)          // h8 
            | bit(34)          // c5  NW
            | bit(41)          // b6  NW
            | bit(48)          // a7  NW
            | bit(20)          // e3
            | bit(13)          // f2
            | bit(6)           // g1
            | bit(18)          // c3
            | bit(9)           // b2
            | bit(0); // a1

        assert_eq!(result, expected);
    }

    #[test]
    fn rook_attacks_blocked_east() {
        let square = 27; // d4
        let blockers = bit(28); // e4 blocks east
        let result = rook_attacks_per_square(square, blockers);

        let expected = bit(3)   // d1
            | bit(11)           // d2
            | bit(19)           // d3
            | bit(35)           // d5
            | bit(43)           // d6
            | bit(51)           // d7
            | bit(59)           // d8
            | bit(24)           // a4
            | bit(25)           // b4
            | bit(26)           // c4
            | bit(28); // e4 (included)

        assert_eq!(result, expected);
    }

    #[test]
    fn bishop_attacks_blocked_ne() {
        let square = 27; // d4
        let blockers = bit(36); // e5 blocks NE
        let result = bishop_attacks_per_square(square, blockers);

        let expected = bit(36) // e5 (included)
            | bit(20)          // e3
            | bit(13)          // f2
            | bit(6)           // g1
            | bit(18)          // c3
            | bit(9)           // b2
            | bit(0)           // a1
            | bit(34)          // c5 
            | bit(41)          // b6 
            | bit(48); // a7

        assert_eq!(result, expected);
    }

    #[test]
    fn king_attacks_differ_by_rank() {
        // squares 40 (a3) and 48 (a2) used to alias under the old reused
        // table; under this crate's convention they must differ.
        assert_ne!(get_king_attacks(40), get_king_attacks(48));
        assert_eq!(
            get_king_attacks(40),
            bit(32) | bit(33) | bit(41) | bit(48) | bit(49)
        );
    }

    #[test]
    fn knight_attacks_from_b2() {
        // square 49 = b2 under this crate's convention.
        assert_eq!(
            get_knight_attacks(49),
            bit(32) | bit(34) | bit(43) | bit(59)
        );
    }
}
