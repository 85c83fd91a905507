//! Pseudo-legal knight, bishop, rook, and queen move generation.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::build_move;
use crate::moves::leaper_moves::knight_attacks;
use crate::moves::slider_moves::{bishop_attacks, queen_attacks, rook_attacks};

/// Destinations reachable by `piece` from `from`, ignoring whose pieces block.
pub fn piece_reach(piece: PieceKind, from: Square, occupancy: u64) -> u64 {
    match piece {
        PieceKind::Knight => knight_attacks(from),
        PieceKind::Bishop => bishop_attacks(from, occupancy),
        PieceKind::Rook => rook_attacks(from, occupancy),
        PieceKind::Queen => queen_attacks(from, occupancy),
        PieceKind::Pawn | PieceKind::King => 0,
    }
}

pub fn generate_piece_moves(game_state: &GameState, piece: PieceKind, out: &mut Vec<u64>) {
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];

    let mut movers = game_state.piece_bitboard(side, piece);
    while movers != 0 {
        let from = movers.trailing_zeros() as Square;
        let mut targets = piece_reach(piece, from, game_state.occupancy_all) & !own_occ;

        while targets != 0 {
            let to = targets.trailing_zeros() as Square;
            let captured = game_state.piece_at(to).map(|(_, kind)| kind);
            out.push(build_move(from, to, piece, captured, None, 0));
            targets &= targets - 1;
        }

        movers &= movers - 1;
    }
}
