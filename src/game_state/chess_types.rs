//! Shared chess primitives used by the board model, the rule engine, and the
//! wire protocol.

use serde::{Deserialize, Serialize};

pub use crate::game_state::chess_move::{ChessMove, SpecialMove};
pub use crate::game_state::game_state::GameState;

/// Side to move. Serialized as `"white"` / `"black"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "white")]
    Light,
    #[serde(rename = "black")]
    Dark,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// Rank index (0-based, 0 == rank 1) of this side's back rank.
    #[inline]
    pub const fn home_rank(self) -> u8 {
        match self {
            Color::Light => 0,
            Color::Dark => 7,
        }
    }

    /// Rank a pawn of this color promotes on.
    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        self.opposite().home_rank()
    }

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Color::Light => "white",
            Color::Dark => "black",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Piece kind (color is represented separately for cache-friendly layouts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

pub const ALL_PIECE_KINDS: [PieceKind; 6] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

/// Pieces a pawn may become.
pub const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

impl PieceKind {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    #[inline]
    pub const fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight
        )
    }

    /// Unicode chess glyph used by the browser client's board encoding.
    pub const fn symbol(self, color: Color) -> char {
        match (color, self) {
            (Color::Light, PieceKind::Pawn) => '♙',
            (Color::Light, PieceKind::Knight) => '♘',
            (Color::Light, PieceKind::Bishop) => '♗',
            (Color::Light, PieceKind::Rook) => '♖',
            (Color::Light, PieceKind::Queen) => '♕',
            (Color::Light, PieceKind::King) => '♔',
            (Color::Dark, PieceKind::Pawn) => '♟',
            (Color::Dark, PieceKind::Knight) => '♞',
            (Color::Dark, PieceKind::Bishop) => '♝',
            (Color::Dark, PieceKind::Rook) => '♜',
            (Color::Dark, PieceKind::Queen) => '♛',
            (Color::Dark, PieceKind::King) => '♚',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<(Color, PieceKind)> {
        let decoded = match symbol {
            '♙' => (Color::Light, PieceKind::Pawn),
            '♘' => (Color::Light, PieceKind::Knight),
            '♗' => (Color::Light, PieceKind::Bishop),
            '♖' => (Color::Light, PieceKind::Rook),
            '♕' => (Color::Light, PieceKind::Queen),
            '♔' => (Color::Light, PieceKind::King),
            '♟' => (Color::Dark, PieceKind::Pawn),
            '♞' => (Color::Dark, PieceKind::Knight),
            '♝' => (Color::Dark, PieceKind::Bishop),
            '♜' => (Color::Dark, PieceKind::Rook),
            '♛' => (Color::Dark, PieceKind::Queen),
            '♚' => (Color::Dark, PieceKind::King),
            _ => return None,
        };
        Some(decoded)
    }

    /// Parses a promotion choice given either as a lowercase name, a single
    /// algebraic letter, or a Unicode glyph of either color.
    pub fn parse_choice(raw: &str) -> Option<PieceKind> {
        let trimmed = raw.trim();
        let mut chars = trimmed.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            if let Some((_, kind)) = PieceKind::from_symbol(ch) {
                return Some(kind);
            }
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "pawn" | "p" => Some(PieceKind::Pawn),
            "knight" | "n" => Some(PieceKind::Knight),
            "bishop" | "b" => Some(PieceKind::Bishop),
            "rook" | "r" => Some(PieceKind::Rook),
            "queen" | "q" => Some(PieceKind::Queen),
            "king" | "k" => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// Compact castling rights bitmask.
pub type CastlingRights = u8;
pub const CASTLE_LIGHT_KINGSIDE: CastlingRights = 1 << 0;
pub const CASTLE_LIGHT_QUEENSIDE: CastlingRights = 1 << 1;
pub const CASTLE_DARK_KINGSIDE: CastlingRights = 1 << 2;
pub const CASTLE_DARK_QUEENSIDE: CastlingRights = 1 << 3;
pub const CASTLE_ALL: CastlingRights =
    CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE | CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE;

/// Board square index (`0..=63`, `0 == a1`, `63 == h8`).
pub type Square = u8;

#[inline]
pub const fn square_file(square: Square) -> u8 {
    square % 8
}

#[inline]
pub const fn square_rank(square: Square) -> u8 {
    square / 8
}

#[inline]
pub const fn make_square(file: u8, rank: u8) -> Square {
    rank * 8 + file
}

/// Converts the browser's `(row, col)` addressing (row 0 is rank 8) into a
/// square index. Returns `None` when either coordinate is off the board.
#[inline]
pub fn square_from_row_col(row: i64, col: i64) -> Option<Square> {
    if !(0..8).contains(&row) || !(0..8).contains(&col) {
        return None;
    }
    Some(make_square(col as u8, 7 - row as u8))
}

#[inline]
pub const fn square_to_row_col(square: Square) -> (u8, u8) {
    (7 - square_rank(square), square_file(square))
}
