//! Canonical chess-rule constants.
//!
//! Stores the standard starting position and the fixed square geometry of the
//! four castling moves so the generator, validator, and applier agree on it.

use crate::game_state::chess_types::*;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Fixed geometry of one castling move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingLane {
    pub color: Color,
    pub kingside: bool,
    pub right: CastlingRights,
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares that must be empty between king and rook.
    pub must_be_empty: u64,
    /// Squares the king transits or lands on; none may be attacked.
    pub king_path: [Square; 2],
}

pub const CASTLING_LANES: [CastlingLane; 4] = [
    CastlingLane {
        color: Color::Light,
        kingside: true,
        right: CASTLE_LIGHT_KINGSIDE,
        king_from: 4,
        king_to: 6,
        rook_from: 7,
        rook_to: 5,
        must_be_empty: (1 << 5) | (1 << 6),
        king_path: [5, 6],
    },
    CastlingLane {
        color: Color::Light,
        kingside: false,
        right: CASTLE_LIGHT_QUEENSIDE,
        king_from: 4,
        king_to: 2,
        rook_from: 0,
        rook_to: 3,
        must_be_empty: (1 << 1) | (1 << 2) | (1 << 3),
        king_path: [3, 2],
    },
    CastlingLane {
        color: Color::Dark,
        kingside: true,
        right: CASTLE_DARK_KINGSIDE,
        king_from: 60,
        king_to: 62,
        rook_from: 63,
        rook_to: 61,
        must_be_empty: (1 << 61) | (1 << 62),
        king_path: [61, 62],
    },
    CastlingLane {
        color: Color::Dark,
        kingside: false,
        right: CASTLE_DARK_QUEENSIDE,
        king_from: 60,
        king_to: 58,
        rook_from: 56,
        rook_to: 59,
        must_be_empty: (1 << 57) | (1 << 58) | (1 << 59),
        king_path: [59, 58],
    },
];

/// Castling lane whose king move is `from -> to` for `color`, if any.
pub fn castling_lane(color: Color, from: Square, to: Square) -> Option<&'static CastlingLane> {
    CASTLING_LANES
        .iter()
        .find(|lane| lane.color == color && lane.king_from == from && lane.king_to == to)
}

/// Castling right revoked when a piece leaves or is captured on `square`.
#[inline]
pub fn castling_right_for_rook_square(square: Square) -> CastlingRights {
    CASTLING_LANES
        .iter()
        .find(|lane| lane.rook_from == square)
        .map(|lane| lane.right)
        .unwrap_or(0)
}
