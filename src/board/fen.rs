use super::fen_tables::{CHAR_TO_CODE, code_to_char};
use super::{CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, Position};
use crate::error::EngineError;
use crate::piece::{Color, Piece};
use crate::square::Square;
use std::fmt::Write as _;

fn bad(msg: impl Into<String>) -> EngineError {
    EngineError::MalformedFen(msg.into())
}

pub fn parse_fen(s: &str) -> Result<Position, EngineError> {
    let mut fields = s.split_whitespace();

    let placement = fields.next().ok_or_else(|| bad("missing piece placement"))?;
    let side_field = fields.next().ok_or_else(|| bad("missing side to move"))?;
    let castle_field = fields.next().ok_or_else(|| bad("missing castling rights"))?;
    let ep_field = fields.next().ok_or_else(|| bad("missing en-passant field"))?;
    let halfmove_field = fields.next().unwrap_or("0");
    let fullmove_field = fields.next().unwrap_or("1");

    let mut pos = Position::new_empty();
    pos.mailbox = [super::EMPTY_SQ; 64];
    pos.pieces = [0u64; Piece::NUM_CODES];
    pos.occ = [0u64; 2];

    let mut rank = 0usize;
    let mut file = 0usize;
    for row in placement.split('/') {
        file = 0;
        for ch in row.chars() {
            if let Some(skip) = ch.to_digit(10) {
                file += skip as usize;
            } else {
                if file >= 8 {
                    return Err(bad(format!("rank {} overflows 8 files", rank)));
                }
                let code = CHAR_TO_CODE[ch as usize];
                if code == 0 {
                    return Err(bad(format!("unrecognized piece glyph '{}'", ch)));
                }
                let piece = Piece::from_code(code).ok_or_else(|| bad("invalid piece code"))?;
                let sq = Square::from_file_rank(file as u8, rank as u8);
                pos.put_piece(sq, piece);
                file += 1;
            }
        }
        rank += 1;
    }
    if rank != 8 {
        return Err(bad("expected 8 ranks"));
    }

    let side = match side_field {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(bad(format!("invalid side to move '{}'", other))),
    };
    pos.side = side;

    pos.castle = 0;
    if castle_field != "-" {
        for ch in castle_field.chars() {
            pos.castle |= match ch {
                'K' => CASTLE_WK,
                'Q' => CASTLE_WQ,
                'k' => CASTLE_BK,
                'q' => CASTLE_BQ,
                other => return Err(bad(format!("invalid castling glyph '{}'", other))),
            };
        }
    }

    pos.ep = if ep_field == "-" {
        0
    } else {
        let target: Square = ep_field
            .parse()
            .map_err(|_| bad(format!("invalid en-passant square '{}'", ep_field)))?;
        // The FEN field names the square a capturing pawn would land on; the
        // captured pawn sits one rank toward the side that just moved, i.e.
        // one rank *toward* the side now to move.
        let idx = target.index() as i16;
        let captured = if side == Color::White { idx + 8 } else { idx - 8 };
        captured as u8
    };

    pos.halfmove = halfmove_field
        .parse()
        .map_err(|_| bad("invalid halfmove clock"))?;
    pos.fullmove = fullmove_field
        .parse()
        .map_err(|_| bad("invalid fullmove number"))?;

    pos.hash = pos.compute_hash_full();
    pos.record_position();
    pos.refresh_attacks();
    Ok(pos)
}

pub fn to_fen(pos: &Position) -> String {
    let mut placement = String::new();
    for rank in 0..8u8 {
        let mut empty_run = 0u32;
        for file in 0..8u8 {
            let sq = Square::from_file_rank(file, rank);
            match pos.piece_at(sq) {
                Some(piece) => {
                    if empty_run > 0 {
                        let _ = write!(placement, "{}", empty_run);
                        empty_run = 0;
                    }
                    placement.push(code_to_char(piece.code()));
                }
                None => empty_run += 1,
            }
        }
        if empty_run > 0 {
            let _ = write!(placement, "{}", empty_run);
        }
        if rank != 7 {
            placement.push('/');
        }
    }

    let side = if pos.side == Color::White { "w" } else { "b" };

    let mut castle = String::new();
    if pos.castle & CASTLE_WK != 0 {
        castle.push('K');
    }
    if pos.castle & CASTLE_WQ != 0 {
        castle.push('Q');
    }
    if pos.castle & CASTLE_BK != 0 {
        castle.push('k');
    }
    if pos.castle & CASTLE_BQ != 0 {
        castle.push('q');
    }
    if castle.is_empty() {
        castle.push('-');
    }

    let ep = if pos.ep == 0 {
        "-".to_string()
    } else {
        let idx = pos.ep as i16;
        let landing = if pos.side == Color::White { idx - 8 } else { idx + 8 };
        Square::from_index(landing as u8).to_string()
    };

    format!(
        "{} {} {} {} {} {}",
        placement, side, castle, ep, pos.halfmove, pos.fullmove
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_placement() {
        assert!(parse_fen("8/8/8/8/8/8/8 w - - 0 1").is_err());
    }

    #[test]
    fn en_passant_square_round_trips() {
        let pos = parse_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3").unwrap();
        // d5 is square index 3 + 3*8 = 27 under our convention; the captured
        // pawn sits one rank toward White, i.e. at d5 (index 27).
        assert_ne!(pos.ep, 0);
        assert_eq!(to_fen(&pos), "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3");
    }
}
