//! Pseudo-legal pawn move generation: pushes, double steps, captures,
//! en passant, and all four promotion choices.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::build_move;
use crate::moves::move_descriptions::{FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT};
use crate::moves::pawn_moves::{pawn_attacks, pawn_push_target, pawn_start_rank};

pub fn generate_pawn_moves(game_state: &GameState, out: &mut Vec<u64>) {
    let side = game_state.side_to_move;
    let enemy_occ = game_state.occupancy_by_color[side.opposite().index()];
    let empty = !game_state.occupancy_all;

    let mut pawns = game_state.piece_bitboard(side, PieceKind::Pawn);
    while pawns != 0 {
        let from = pawns.trailing_zeros() as Square;

        if let Some(to) = pawn_push_target(side, from, 1) {
            if (1u64 << to) & empty != 0 {
                push_with_promotions(side, from, to, None, 0, out);

                if square_rank(from) == pawn_start_rank(side) {
                    if let Some(two_step) = pawn_push_target(side, from, 2) {
                        if (1u64 << two_step) & empty != 0 {
                            out.push(build_move(
                                from,
                                two_step,
                                PieceKind::Pawn,
                                None,
                                None,
                                FLAG_DOUBLE_PAWN_PUSH,
                            ));
                        }
                    }
                }
            }
        }

        let mut targets = pawn_attacks(side, from);
        while targets != 0 {
            let to = targets.trailing_zeros() as Square;
            if (1u64 << to) & enemy_occ != 0 {
                let captured = game_state.piece_at(to).map(|(_, piece)| piece);
                push_with_promotions(side, from, to, captured, 0, out);
            } else if game_state.en_passant_square == Some(to) {
                out.push(build_move(
                    from,
                    to,
                    PieceKind::Pawn,
                    Some(PieceKind::Pawn),
                    None,
                    FLAG_EN_PASSANT,
                ));
            }
            targets &= targets - 1;
        }

        pawns &= pawns - 1;
    }
}

fn push_with_promotions(
    side: Color,
    from: Square,
    to: Square,
    captured: Option<PieceKind>,
    flags: u64,
    out: &mut Vec<u64>,
) {
    if square_rank(to) == side.promotion_rank() {
        for promo in PROMOTION_KINDS {
            out.push(build_move(from, to, PieceKind::Pawn, captured, Some(promo), flags));
        }
    } else {
        out.push(build_move(from, to, PieceKind::Pawn, captured, None, flags));
    }
}
