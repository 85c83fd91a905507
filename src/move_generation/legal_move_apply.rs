//! Copy-on-write move application.
//!
//! `apply_move` never touches its input: it returns a fresh position with the
//! move played and an empty move log, which is what legality probes run check
//! detection on. `apply_and_record` carries the log over and appends the new
//! entry, and is what committed moves go through.

use crate::game_state::chess_move::ChessMove;
use crate::game_state::chess_rules::{castling_lane, castling_right_for_rook_square};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::rule_errors::{RuleError, RuleResult};
use crate::moves::move_descriptions::{
    has_flag, move_from, move_promotion_piece, move_to, pack_move_description, FLAG_CAPTURE,
    FLAG_CASTLING, FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT,
};

pub fn apply_move(game_state: &GameState, move_description: u64) -> RuleResult<GameState> {
    let from = move_from(move_description);
    let to = move_to(move_description);
    let from_mask = 1u64 << from;
    let to_mask = 1u64 << to;

    let moving_color = game_state.side_to_move;
    let enemy_color = moving_color.opposite();

    let (owner, moved_piece) = game_state.piece_at(from).ok_or_else(|| {
        RuleError::Inconsistent(format!("no piece on from-square {from} during apply"))
    })?;
    if owner != moving_color {
        return Err(RuleError::Inconsistent(format!(
            "piece on {from} belongs to {owner} but {moving_color} is to move"
        )));
    }

    let mut next = game_state.position_copy();

    next.pieces[moving_color.index()][moved_piece.index()] &= !from_mask;

    if has_flag(move_description, FLAG_EN_PASSANT) {
        // The passed pawn sits beside the origin, on the destination file.
        let capture_sq = make_square(square_file(to), square_rank(from));
        next.pieces[enemy_color.index()][PieceKind::Pawn.index()] &= !(1u64 << capture_sq);
    } else {
        for bb in next.pieces[enemy_color.index()].iter_mut() {
            *bb &= !to_mask;
        }
    }

    let placed = move_promotion_piece(move_description).unwrap_or(moved_piece);
    next.pieces[moving_color.index()][placed.index()] |= to_mask;

    if has_flag(move_description, FLAG_CASTLING) && moved_piece == PieceKind::King {
        let lane = castling_lane(moving_color, from, to).ok_or_else(|| {
            RuleError::Inconsistent(format!("no castling lane for king move {from}->{to}"))
        })?;
        let rook_bb = &mut next.pieces[moving_color.index()][PieceKind::Rook.index()];
        *rook_bb &= !(1u64 << lane.rook_from);
        *rook_bb |= 1u64 << lane.rook_to;
    }

    update_castling_rights(&mut next, moving_color, from, to, moved_piece);

    next.en_passant_square = if has_flag(move_description, FLAG_DOUBLE_PAWN_PUSH) {
        Some((from + to) / 2)
    } else {
        None
    };

    let is_capture = game_state.occupancy_by_color[enemy_color.index()] & to_mask != 0
        || has_flag(move_description, FLAG_EN_PASSANT);
    if moved_piece == PieceKind::Pawn || is_capture {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock = next.halfmove_clock.saturating_add(1);
    }
    if moving_color == Color::Dark {
        next.fullmove_number = next.fullmove_number.saturating_add(1);
    }

    next.side_to_move = enemy_color;
    next.recalc_occupancy();

    Ok(next)
}

/// Applies the move and appends it to the move log.
pub fn apply_and_record(game_state: &GameState, move_description: u64) -> RuleResult<GameState> {
    let record = ChessMove::from_description(game_state.side_to_move, move_description)
        .ok_or_else(|| RuleError::Inconsistent("move description without a piece".to_owned()))?;
    let mut next = apply_move(game_state, move_description)?;
    next.move_log.reserve_exact(game_state.move_log.len() + 1);
    next.move_log.extend_from_slice(&game_state.move_log);
    next.move_log.push(record);
    Ok(next)
}

#[inline]
pub fn build_move(
    from: Square,
    to: Square,
    moved_piece: PieceKind,
    captured_piece: Option<PieceKind>,
    promotion_piece: Option<PieceKind>,
    flags: u64,
) -> u64 {
    let flags = if captured_piece.is_some() {
        flags | FLAG_CAPTURE
    } else {
        flags
    };
    pack_move_description(from, to, moved_piece, captured_piece, promotion_piece, flags)
}

fn update_castling_rights(
    game_state: &mut GameState,
    moving_color: Color,
    from: Square,
    to: Square,
    moved_piece: PieceKind,
) {
    if moved_piece == PieceKind::King {
        game_state.castling_rights &= match moving_color {
            Color::Light => !(CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE),
            Color::Dark => !(CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE),
        };
    }

    // A rook leaving its corner, or anything landing on it, ends that right.
    game_state.castling_rights &= !castling_right_for_rook_square(from);
    game_state.castling_rights &= !castling_right_for_rook_square(to);
}
