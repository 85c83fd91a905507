//! Full legal move generation pipeline.
//!
//! Gathers piece-wise pseudo-legal candidates, plays each on a scratch copy,
//! and drops any that leave the mover's own king attacked.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_pieces::generate_piece_moves;
use crate::move_generation::move_generator::{GeneratedMove, MoveGenerator};
use crate::move_generation::rule_errors::RuleResult;

pub struct LegalMoveGenerator;

impl MoveGenerator for LegalMoveGenerator {
    fn generate_legal_moves(&self, game_state: &GameState) -> RuleResult<Vec<GeneratedMove>> {
        let mut legal = Vec::new();
        for_each_legal_move(game_state, |move_description, next| {
            let gives_check = is_king_in_check(&next, next.side_to_move);
            legal.push(GeneratedMove {
                move_description,
                game_after_move: next,
                gives_check,
            });
            true
        })?;
        Ok(legal)
    }
}

/// Whether the side to move has at least one legal move. Stops at the first one found.
pub fn has_any_legal_move(game_state: &GameState) -> RuleResult<bool> {
    let mut found = false;
    for_each_legal_move(game_state, |_, _| {
        found = true;
        false
    })?;
    Ok(found)
}

pub fn pseudo_legal_moves(game_state: &GameState) -> Vec<u64> {
    let mut pseudo = Vec::<u64>::with_capacity(64);

    generate_pawn_moves(game_state, &mut pseudo);
    for piece in [
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
    ] {
        generate_piece_moves(game_state, piece, &mut pseudo);
    }
    generate_king_moves(game_state, &mut pseudo);

    pseudo
}

/// Calls `visit` with every legal move and the position it produces until
/// `visit` returns `false`.
fn for_each_legal_move<F>(game_state: &GameState, mut visit: F) -> RuleResult<()>
where
    F: FnMut(u64, GameState) -> bool,
{
    let mover = game_state.side_to_move;
    for mv in pseudo_legal_moves(game_state) {
        let next = apply_move(game_state, mv)?;
        if is_king_in_check(&next, mover) {
            continue;
        }
        if !visit(mv, next) {
            break;
        }
    }
    Ok(())
}
