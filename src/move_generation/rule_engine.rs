//! Entry points the session layer uses to play moves.
//!
//! Every function here is pure over `GameState`: the caller's board is never
//! mutated, a successful move hands back the next board together with the
//! recorded move and the status of the side now to move.

use std::borrow::Cow;

use crate::game_state::chess_move::ChessMove;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::apply_and_record;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::has_any_legal_move;
use crate::move_generation::move_validation::{is_promotion_move, validate_move, MoveProposal};
use crate::move_generation::rule_errors::{RuleError, RuleResult};

/// A game-ending result for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalStatus {
    Checkmate { winner: Color },
    Stalemate,
    /// A king is missing from the board. Legal play never gets here.
    KingCapture { winner: Color },
}

impl TerminalStatus {
    pub fn winner(self) -> Option<Color> {
        match self {
            TerminalStatus::Checkmate { winner } | TerminalStatus::KingCapture { winner } => {
                Some(winner)
            }
            TerminalStatus::Stalemate => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MoveOutcome {
    pub board: GameState,
    pub played: ChessMove,
    /// The new side to move is in check.
    pub in_check: bool,
    pub terminal: Option<TerminalStatus>,
}

/// A legal pawn move onto the last rank still waiting for its piece choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPromotion {
    pub color: Color,
    pub from: Square,
    pub to: Square,
}

#[derive(Debug, Clone)]
pub enum BeginMove {
    Ready(MoveOutcome),
    PendingPromotion(PendingPromotion),
}

/// Validates `proposal` for `acting_color` and, if legal, plays it.
pub fn validate_and_apply(
    board: &GameState,
    proposal: MoveProposal,
    acting_color: Color,
) -> RuleResult<MoveOutcome> {
    ensure_playable(board, acting_color)?;

    let description = validate_move(board, proposal, acting_color)?;
    let next = apply_and_record(board, description)?;
    let played = *next
        .last_move()
        .ok_or_else(|| RuleError::Inconsistent("move log empty after apply".to_owned()))?;

    let terminal = terminal_status(&next)?;
    let in_check = is_in_check(&next, next.side_to_move);

    Ok(MoveOutcome {
        board: next,
        played,
        in_check,
        terminal,
    })
}

/// First phase of a move. A promoting pawn move without a piece choice is
/// checked for legality and parked; everything else is played immediately.
pub fn begin_move(
    board: &GameState,
    proposal: MoveProposal,
    acting_color: Color,
) -> RuleResult<BeginMove> {
    if proposal.promotion.is_none() && is_promotion_move(board, proposal.from, proposal.to) {
        ensure_playable(board, acting_color)?;
        // The promoted piece cannot affect the mover's own king safety.
        validate_move(board, proposal.with_promotion(PieceKind::Queen), acting_color)?;
        return Ok(BeginMove::PendingPromotion(PendingPromotion {
            color: acting_color,
            from: proposal.from,
            to: proposal.to,
        }));
    }

    validate_and_apply(board, proposal, acting_color).map(BeginMove::Ready)
}

/// Second phase: plays a parked promotion with the chosen piece.
pub fn complete_move(
    board: &GameState,
    pending: PendingPromotion,
    promoted: PieceKind,
) -> RuleResult<MoveOutcome> {
    if !promoted.is_promotion_target() {
        return Err(RuleError::InvalidPromotionPiece { piece: promoted });
    }
    let proposal = MoveProposal::new(pending.from, pending.to).with_promotion(promoted);
    validate_and_apply(board, proposal, pending.color)
}

#[inline]
pub fn is_in_check(board: &GameState, color: Color) -> bool {
    is_king_in_check(board, color)
}

pub fn is_checkmate(board: &GameState, color: Color) -> RuleResult<bool> {
    if !is_in_check(board, color) {
        return Ok(false);
    }
    Ok(!has_any_legal_move(&as_side_to_move(board, color))?)
}

pub fn is_stalemate(board: &GameState, color: Color) -> RuleResult<bool> {
    if is_in_check(board, color) {
        return Ok(false);
    }
    Ok(!has_any_legal_move(&as_side_to_move(board, color))?)
}

/// Status of the side to move on `board`, or `None` while play continues.
pub fn terminal_status(board: &GameState) -> RuleResult<Option<TerminalStatus>> {
    for color in [Color::Light, Color::Dark] {
        if board.king_count(color) == 0 {
            return Ok(Some(TerminalStatus::KingCapture {
                winner: color.opposite(),
            }));
        }
    }

    let to_move = board.side_to_move;
    if is_checkmate(board, to_move)? {
        return Ok(Some(TerminalStatus::Checkmate {
            winner: to_move.opposite(),
        }));
    }
    if is_stalemate(board, to_move)? {
        return Ok(Some(TerminalStatus::Stalemate));
    }
    Ok(None)
}

fn ensure_playable(board: &GameState, acting_color: Color) -> RuleResult<()> {
    if board.king_count(Color::Light) == 0 || board.king_count(Color::Dark) == 0 {
        return Err(RuleError::GameAlreadyOver);
    }
    if acting_color != board.side_to_move {
        return Err(RuleError::WrongSideToMove {
            to_move: board.side_to_move,
        });
    }
    Ok(())
}

fn as_side_to_move(board: &GameState, color: Color) -> Cow<'_, GameState> {
    if board.side_to_move == color {
        Cow::Borrowed(board)
    } else {
        let mut flipped = board.position_copy();
        flipped.side_to_move = color;
        flipped.en_passant_square = None;
        Cow::Owned(flipped)
    }
}
