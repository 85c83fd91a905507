//! Immutable record of one applied ply.

use crate::game_state::chess_types::{Color, PieceKind, Square};
use crate::moves::move_descriptions::{
    has_flag, move_captured_piece, move_from, move_moved_piece, move_promotion_piece, move_to,
    FLAG_CASTLING, FLAG_EN_PASSANT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialMove {
    None,
    CastleKingside,
    CastleQueenside,
    EnPassant,
    Promotion(PieceKind),
}

impl SpecialMove {
    /// Name used by the browser client's move history.
    pub const fn wire_name(self) -> &'static str {
        match self {
            SpecialMove::None => "normal",
            SpecialMove::CastleKingside => "kingside-castling",
            SpecialMove::CastleQueenside => "queenside-castling",
            SpecialMove::EnPassant => "en-passant",
            SpecialMove::Promotion(_) => "promotion",
        }
    }
}

/// One applied move as stored in the move log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChessMove {
    pub color: Color,
    pub from: Square,
    pub to: Square,
    pub moved_piece: PieceKind,
    pub captured_piece: Option<PieceKind>,
    pub special: SpecialMove,
}

impl ChessMove {
    /// Expands a packed move description played by `color`.
    pub fn from_description(color: Color, move_description: u64) -> Option<Self> {
        let from = move_from(move_description);
        let to = move_to(move_description);
        let moved_piece = move_moved_piece(move_description)?;

        let special = if let Some(promo) = move_promotion_piece(move_description) {
            SpecialMove::Promotion(promo)
        } else if has_flag(move_description, FLAG_EN_PASSANT) {
            SpecialMove::EnPassant
        } else if has_flag(move_description, FLAG_CASTLING) {
            if to > from {
                SpecialMove::CastleKingside
            } else {
                SpecialMove::CastleQueenside
            }
        } else {
            SpecialMove::None
        };

        Some(Self {
            color,
            from,
            to,
            moved_piece,
            captured_piece: move_captured_piece(move_description),
            special,
        })
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured_piece.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::move_descriptions::{pack_move_description, FLAG_CAPTURE};

    #[test]
    fn castling_side_is_derived_from_direction() {
        let short = pack_move_description(4, 6, PieceKind::King, None, None, FLAG_CASTLING);
        let long = pack_move_description(60, 58, PieceKind::King, None, None, FLAG_CASTLING);

        let short = ChessMove::from_description(Color::Light, short).expect("short castle");
        let long = ChessMove::from_description(Color::Dark, long).expect("long castle");

        assert_eq!(short.special, SpecialMove::CastleKingside);
        assert_eq!(long.special, SpecialMove::CastleQueenside);
        assert_eq!(long.special.wire_name(), "queenside-castling");
    }

    #[test]
    fn en_passant_keeps_captured_pawn() {
        let mv = pack_move_description(
            36,
            43,
            PieceKind::Pawn,
            Some(PieceKind::Pawn),
            None,
            FLAG_CAPTURE | FLAG_EN_PASSANT,
        );
        let record = ChessMove::from_description(Color::Light, mv).expect("en passant record");
        assert_eq!(record.special, SpecialMove::EnPassant);
        assert!(record.is_capture());
    }
}
