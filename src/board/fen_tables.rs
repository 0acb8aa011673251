// O(1) FEN glyph <-> piece-code maps.

use crate::piece::{Color, Piece, PieceKind};

pub(super) const CHAR_TO_CODE: [u8; 128] = {
    let mut table = [0u8; 128];

    const KINDS: [(char, PieceKind); 6] = [
        ('p', PieceKind::Pawn),
        ('n', PieceKind::Knight),
        ('b', PieceKind::Bishop),
        ('r', PieceKind::Rook),
        ('q', PieceKind::Queen),
        ('k', PieceKind::King),
    ];

    let mut i = 0;
    while i < KINDS.len() {
        let (lower, kind) = KINDS[i];
        let upper = (lower as u8 - b'a' + b'A') as char;
        table[upper as usize] = ((kind as u8) << 1) | (Color::White as u8);
        table[lower as usize] = ((kind as u8) << 1) | (Color::Black as u8);
        i += 1;
    }

    table
};

pub(super) fn code_to_char(code: u8) -> char {
    let piece = Piece::from_code(code).expect("valid piece code");
    let letter = match piece.kind() {
        PieceKind::Pawn => 'p',
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        PieceKind::Queen => 'q',
        PieceKind::King => 'k',
    };
    if piece.color() == Color::White {
        letter.to_ascii_uppercase()
    } else {
        letter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_all_twelve_glyphs() {
        for &g in &['P', 'N', 'B', 'R', 'Q', 'K', 'p', 'n', 'b', 'r', 'q', 'k'] {
            let code = CHAR_TO_CODE[g as usize];
            assert_ne!(code, 0, "glyph {} missing", g);
            assert_eq!(code_to_char(code), g);
        }
    }
}
