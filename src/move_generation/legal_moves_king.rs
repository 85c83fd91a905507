//! King steps and castling.
//!
//! Castling candidates are only emitted when the right is held, the king and
//! rook stand on their home squares, the squares between them are empty, and
//! neither the king's square nor any square it crosses or lands on is attacked.

use crate::game_state::chess_rules::{CastlingLane, CASTLING_LANES};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::build_move;
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::moves::leaper_moves::king_attacks;
use crate::moves::move_descriptions::FLAG_CASTLING;

pub fn generate_king_moves(game_state: &GameState, out: &mut Vec<u64>) {
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];
    let king_bb = game_state.piece_bitboard(side, PieceKind::King);
    if king_bb == 0 {
        return;
    }

    let from = king_bb.trailing_zeros() as Square;
    let mut targets = king_attacks(from) & !own_occ;
    while targets != 0 {
        let to = targets.trailing_zeros() as Square;
        let captured = game_state.piece_at(to).map(|(_, piece)| piece);
        out.push(build_move(from, to, PieceKind::King, captured, None, 0));
        targets &= targets - 1;
    }

    for lane in CASTLING_LANES.iter().filter(|lane| lane.color == side) {
        if castling_blocker(game_state, lane).is_none() {
            out.push(build_move(
                lane.king_from,
                lane.king_to,
                PieceKind::King,
                None,
                None,
                FLAG_CASTLING,
            ));
        }
    }
}

/// First reason `lane` cannot be castled through right now, if any.
pub fn castling_blocker(game_state: &GameState, lane: &CastlingLane) -> Option<&'static str> {
    let side = lane.color;
    let enemy = side.opposite();

    if !game_state.has_castling_right(lane.right) {
        return Some(if lane.kingside {
            "kingside castling right has been lost"
        } else {
            "queenside castling right has been lost"
        });
    }
    if game_state.piece_at(lane.king_from) != Some((side, PieceKind::King))
        || game_state.piece_at(lane.rook_from) != Some((side, PieceKind::Rook))
    {
        return Some("king or rook is not on its home square");
    }
    if game_state.occupancy_all & lane.must_be_empty != 0 {
        return Some("squares between king and rook are occupied");
    }
    if is_square_attacked(game_state, lane.king_from, enemy) {
        return Some("king is in check");
    }
    if lane
        .king_path
        .iter()
        .any(|&sq| is_square_attacked(game_state, sq, enemy))
    {
        return Some("king would pass through or land on an attacked square");
    }
    None
}
