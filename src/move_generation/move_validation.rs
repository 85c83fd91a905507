//! Validation of a single proposed move.
//!
//! Unlike the generator, which only ever produces legal moves, this path has to
//! say *why* a client's proposal was refused. Checks run cheapest first and the
//! first failing one wins; the scratch-copy legality probe runs last.

use crate::game_state::chess_rules::castling_lane;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::{apply_move, build_move};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_moves_king::castling_blocker;
use crate::move_generation::legal_moves_pieces::piece_reach;
use crate::move_generation::rule_errors::{RuleError, RuleResult};
use crate::moves::leaper_moves::king_attacks;
use crate::moves::move_descriptions::{FLAG_CASTLING, FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT};
use crate::moves::pawn_moves::{pawn_attacks, pawn_push_target, pawn_start_rank};
use crate::moves::slider_moves::squares_between;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveProposal {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl MoveProposal {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(mut self, piece: PieceKind) -> Self {
        self.promotion = Some(piece);
        self
    }

    /// Builds a proposal from wire coordinates (row 0 = rank 8).
    pub fn from_row_col(from_row: i64, from_col: i64, to_row: i64, to_col: i64) -> RuleResult<Self> {
        let from = square_from_row_col(from_row, from_col).ok_or(RuleError::OffBoard)?;
        let to = square_from_row_col(to_row, to_col).ok_or(RuleError::OffBoard)?;
        Ok(Self::new(from, to))
    }
}

/// Whether moving the piece on `from` to `to` would be a pawn reaching its last rank.
pub fn is_promotion_move(game_state: &GameState, from: Square, to: Square) -> bool {
    matches!(
        game_state.piece_at(from),
        Some((color, PieceKind::Pawn)) if square_rank(to) == color.promotion_rank()
    )
}

/// Returns the packed move description for a legal proposal, or the first reason it is not.
pub fn validate_move(
    game_state: &GameState,
    proposal: MoveProposal,
    acting_color: Color,
) -> RuleResult<u64> {
    let MoveProposal { from, to, promotion } = proposal;
    if from > 63 || to > 63 {
        return Err(RuleError::OffBoard);
    }

    let (owner, piece) = game_state
        .piece_at(from)
        .ok_or(RuleError::NoPieceAtOrigin)?;
    if owner != acting_color {
        return Err(RuleError::NotYourPiece { owner });
    }
    if from == to {
        return Err(RuleError::NullMove);
    }

    let target = game_state.piece_at(to);
    if matches!(target, Some((color, _)) if color == acting_color) {
        return Err(RuleError::DestinationOccupiedByOwnPiece);
    }
    let captured = target.map(|(_, kind)| kind);

    let description = match piece {
        PieceKind::Pawn => validate_pawn(game_state, from, to, acting_color, captured, promotion)?,
        PieceKind::King => {
            reject_promotion(promotion)?;
            validate_king(game_state, from, to, acting_color, captured)?
        }
        _ => {
            reject_promotion(promotion)?;
            validate_piece(game_state, piece, from, to, captured)?
        }
    };

    let probe = apply_move(game_state, description)?;
    if is_king_in_check(&probe, acting_color) {
        return Err(RuleError::LeavesKingInCheck);
    }

    Ok(description)
}

fn reject_promotion(promotion: Option<PieceKind>) -> RuleResult<()> {
    match promotion {
        Some(_) => Err(RuleError::UnexpectedPromotion),
        None => Ok(()),
    }
}

fn validate_pawn(
    game_state: &GameState,
    from: Square,
    to: Square,
    color: Color,
    captured: Option<PieceKind>,
    promotion: Option<PieceKind>,
) -> RuleResult<u64> {
    let geometry = RuleError::InvalidGeometry {
        piece: PieceKind::Pawn,
    };
    let to_mask = 1u64 << to;

    let (flags, captured) = if pawn_push_target(color, from, 1) == Some(to) {
        if captured.is_some() {
            return Err(geometry);
        }
        (0, None)
    } else if pawn_push_target(color, from, 2) == Some(to) {
        if square_rank(from) != pawn_start_rank(color) {
            return Err(geometry);
        }
        if game_state.occupancy_all & (squares_between(from, to) | to_mask) != 0 {
            return Err(RuleError::PathObstructed);
        }
        (FLAG_DOUBLE_PAWN_PUSH, None)
    } else if pawn_attacks(color, from) & to_mask != 0 {
        match captured {
            Some(kind) => (0, Some(kind)),
            None if game_state.en_passant_square == Some(to) => {
                (FLAG_EN_PASSANT, Some(PieceKind::Pawn))
            }
            None => return Err(geometry),
        }
    } else {
        return Err(geometry);
    };

    let promotion = if square_rank(to) == color.promotion_rank() {
        match promotion {
            None => return Err(RuleError::PromotionChoiceRequired),
            Some(kind) if !kind.is_promotion_target() => {
                return Err(RuleError::InvalidPromotionPiece { piece: kind })
            }
            Some(kind) => Some(kind),
        }
    } else {
        reject_promotion(promotion)?;
        None
    };

    Ok(build_move(from, to, PieceKind::Pawn, captured, promotion, flags))
}

fn validate_king(
    game_state: &GameState,
    from: Square,
    to: Square,
    color: Color,
    captured: Option<PieceKind>,
) -> RuleResult<u64> {
    if king_attacks(from) & (1u64 << to) != 0 {
        return Ok(build_move(from, to, PieceKind::King, captured, None, 0));
    }

    let lane = castling_lane(color, from, to).ok_or(RuleError::InvalidGeometry {
        piece: PieceKind::King,
    })?;
    if let Some(reason) = castling_blocker(game_state, lane) {
        return Err(RuleError::CastlingNotAllowed { reason });
    }
    Ok(build_move(from, to, PieceKind::King, None, None, FLAG_CASTLING))
}

fn validate_piece(
    game_state: &GameState,
    piece: PieceKind,
    from: Square,
    to: Square,
    captured: Option<PieceKind>,
) -> RuleResult<u64> {
    // Reach over an empty board is pure geometry; blockers are checked separately.
    if piece_reach(piece, from, 0) & (1u64 << to) == 0 {
        return Err(RuleError::InvalidGeometry { piece });
    }
    if piece.is_slider() && squares_between(from, to) & game_state.occupancy_all != 0 {
        return Err(RuleError::PathObstructed);
    }
    Ok(build_move(from, to, piece, captured, None, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::algebraic::algebraic_to_square;

    fn proposal(from: &str, to: &str) -> MoveProposal {
        MoveProposal::new(
            algebraic_to_square(from).expect("valid square"),
            algebraic_to_square(to).expect("valid square"),
        )
    }

    #[test]
    fn rejection_reasons_for_common_mistakes() {
        let game = GameState::new_game();

        assert_eq!(
            validate_move(&game, proposal("e4", "e5"), Color::Light),
            Err(RuleError::NoPieceAtOrigin)
        );
        assert_eq!(
            validate_move(&game, proposal("e7", "e5"), Color::Light),
            Err(RuleError::NotYourPiece { owner: Color::Dark })
        );
        assert_eq!(
            validate_move(&game, proposal("a1", "a2"), Color::Light),
            Err(RuleError::DestinationOccupiedByOwnPiece)
        );
        assert_eq!(
            validate_move(&game, proposal("g1", "g3"), Color::Light),
            Err(RuleError::InvalidGeometry {
                piece: PieceKind::Knight
            })
        );
        assert_eq!(
            validate_move(&game, proposal("e2", "e5"), Color::Light),
            Err(RuleError::InvalidGeometry {
                piece: PieceKind::Pawn
            })
        );
    }

    #[test]
    fn sliders_cannot_jump() {
        let game = GameState::new_game();
        for (from, to) in [("a1", "a4"), ("c1", "f4"), ("d1", "d5"), ("d1", "h5")] {
            assert_eq!(
                validate_move(&game, proposal(from, to), Color::Light),
                Err(RuleError::PathObstructed),
                "{from}{to} should be blocked"
            );
        }
    }

    #[test]
    fn double_step_blocked_by_piece_in_front() {
        let game =
            GameState::from_fen("4k3/8/8/8/8/4n3/4P3/4K3 w - -").expect("fen should parse");
        assert_eq!(
            validate_move(&game, proposal("e2", "e4"), Color::Light),
            Err(RuleError::PathObstructed)
        );
    }

    #[test]
    fn pinned_bishop_may_not_move() {
        let game =
            GameState::from_fen("4r1k1/8/8/8/8/8/4B3/4K3 w - -").expect("fen should parse");
        assert_eq!(
            validate_move(&game, proposal("e2", "d3"), Color::Light),
            Err(RuleError::LeavesKingInCheck)
        );
    }

    #[test]
    fn promotion_requires_a_valid_choice() {
        let game = GameState::from_fen("4k3/P7/8/8/8/8/8/4K3 w - -").expect("fen should parse");

        assert_eq!(
            validate_move(&game, proposal("a7", "a8"), Color::Light),
            Err(RuleError::PromotionChoiceRequired)
        );
        assert_eq!(
            validate_move(
                &game,
                proposal("a7", "a8").with_promotion(PieceKind::King),
                Color::Light
            ),
            Err(RuleError::InvalidPromotionPiece {
                piece: PieceKind::King
            })
        );
        assert!(validate_move(
            &game,
            proposal("a7", "a8").with_promotion(PieceKind::Knight),
            Color::Light
        )
        .is_ok());
        assert!(is_promotion_move(&game, 48, 56));
    }
}
