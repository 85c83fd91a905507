//! Attack detection.
//!
//! Works purely from piece geometry and path clearance. It never asks whether
//! the attacking move would itself be legal, so check detection cannot recurse
//! back into the legality probe.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::leaper_moves::{king_attacks, knight_attacks};
use crate::moves::pawn_moves::pawn_attacks;
use crate::moves::slider_moves::{bishop_attacks, rook_attacks};

#[inline]
pub fn king_square(game_state: &GameState, color: Color) -> Option<Square> {
    let kings = game_state.piece_bitboard(color, PieceKind::King);
    if kings == 0 {
        None
    } else {
        Some(kings.trailing_zeros() as Square)
    }
}

/// Whether `color`'s king is attacked. A side without a king is never in check.
#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    let Some(king_sq) = king_square(game_state, color) else {
        return false;
    };
    is_square_attacked(game_state, king_sq, color.opposite())
}

pub fn is_square_attacked(game_state: &GameState, square: Square, attacker_color: Color) -> bool {
    attackers_bitboard(game_state, square, attacker_color) != 0
}

/// Squares holding `attacker_color` pieces that attack `square`.
pub fn attackers_bitboard(game_state: &GameState, square: Square, attacker_color: Color) -> u64 {
    let theirs = |piece| game_state.piece_bitboard(attacker_color, piece);
    let occupancy = game_state.occupancy_all;

    // A pawn of `attacker_color` attacks `square` exactly when a pawn of the
    // other color on `square` would attack the pawn's square.
    let pawns = pawn_attacks(attacker_color.opposite(), square) & theirs(PieceKind::Pawn);
    let knights = knight_attacks(square) & theirs(PieceKind::Knight);
    let kings = king_attacks(square) & theirs(PieceKind::King);
    let diagonal = bishop_attacks(square, occupancy)
        & (theirs(PieceKind::Bishop) | theirs(PieceKind::Queen));
    let straight =
        rook_attacks(square, occupancy) & (theirs(PieceKind::Rook) | theirs(PieceKind::Queen));

    pawns | knights | kings | diagonal | straight
}
