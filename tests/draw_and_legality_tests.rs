//! Draw detection and the two hand-picked legality edge cases: castling
//! through an attacked square, and en passant that would discover check.

use mantle::board::Position;
use mantle::moves::movegen::generate;
use mantle::moves::types::{Move, MoveFlag};
use mantle::square::Square;
use mantle::status::{GameStatus, position_status};
use std::str::FromStr;

#[test]
fn lone_kings_and_a_bishop_is_insufficient_material() {
    let pos = Position::from_str("4k3/8/8/8/8/8/8/2B1K3 w - - 0 1").unwrap();
    assert_eq!(position_status(&pos), GameStatus::DrawInsufficientMaterial);
}

#[test]
fn threefold_repetition_is_flagged_on_the_third_occurrence() {
    let mut pos = Position::new_start();
    let wn_out = Move::new(Square::from_index(62), Square::from_index(45), MoveFlag::Quiet); // Ng1-f3
    let wn_back = Move::new(Square::from_index(45), Square::from_index(62), MoveFlag::Quiet); // Nf3-g1
    let bn_out = Move::new(Square::from_index(6), Square::from_index(21), MoveFlag::Quiet); // Ng8-f6
    let bn_back = Move::new(Square::from_index(21), Square::from_index(6), MoveFlag::Quiet); // Nf6-g8

    assert_eq!(position_status(&pos), GameStatus::InPlay);

    for _ in 0..2 {
        pos.make(wn_out);
        pos.make(bn_out);
        pos.make(wn_back);
        pos.make(bn_back);
    }
    // Back at the start position for the third time.
    assert_eq!(position_status(&pos), GameStatus::DrawThreefold);
}

#[test]
fn castling_through_an_attacked_square_is_illegal() {
    let pos = Position::from_str("r3k2r/8/8/8/8/8/4r3/R3K2R w KQkq - 0 1").unwrap();
    let moves = generate(&pos);
    assert!(
        !moves.iter().any(|m| m.flag() == MoveFlag::CastleK || m.flag() == MoveFlag::CastleQ),
        "e1 and d1 are both attacked by the rook on e2, so neither castle is legal"
    );
}

#[test]
fn en_passant_that_discovers_check_is_illegal() {
    let pos = Position::from_str("8/8/8/KPp4r/8/8/8/k7 w - c6 0 1").unwrap();
    let moves = generate(&pos);
    assert!(
        !moves.iter().any(|m| m.flag() == MoveFlag::EnPassant),
        "b5xc6 e.p. would expose the white king to the rook on h5 along rank 5"
    );
}
