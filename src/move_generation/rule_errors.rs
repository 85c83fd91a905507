//! Rejection reasons produced by the rule engine.
//!
//! Checks and mates are game results, not errors; every variant here means the
//! proposed move was refused and the board is unchanged.

use crate::game_state::chess_types::{Color, PieceKind};

pub type RuleResult<T> = Result<T, RuleError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("square is off the board")]
    OffBoard,

    #[error("it is {to_move}'s turn")]
    WrongSideToMove { to_move: Color },

    #[error("there is no piece on the origin square")]
    NoPieceAtOrigin,

    #[error("that piece belongs to {owner}")]
    NotYourPiece { owner: Color },

    #[error("origin and destination are the same square")]
    NullMove,

    #[error("destination is occupied by your own piece")]
    DestinationOccupiedByOwnPiece,

    #[error("a {piece:?} cannot move that way")]
    InvalidGeometry { piece: PieceKind },

    #[error("the path is blocked")]
    PathObstructed,

    #[error("castling is not allowed: {reason}")]
    CastlingNotAllowed { reason: &'static str },

    #[error("that move would leave your king in check")]
    LeavesKingInCheck,

    #[error("a promotion piece must be chosen")]
    PromotionChoiceRequired,

    #[error("cannot promote to {piece:?}")]
    InvalidPromotionPiece { piece: PieceKind },

    #[error("a promotion piece was given for a move that does not promote")]
    UnexpectedPromotion,

    #[error("the game is already over")]
    GameAlreadyOver,

    #[error("internal board inconsistency: {0}")]
    Inconsistent(String),
}
