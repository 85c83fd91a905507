//! Rejections produced while routing a client request.
//!
//! None of these are fatal: each is reported to the offending connection as a
//! single `error` message and leaves room state untouched.

use crate::move_generation::rule_errors::RuleError;

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error("illegal move: {0}")]
    IllegalMove(#[from] RuleError),

    #[error("it is not your turn")]
    OutOfTurn,

    #[error("only seated players can do that")]
    NotASeatedPlayer,

    #[error("the game is not in progress")]
    GameNotInProgress,

    #[error("there is no promotion waiting for a piece choice")]
    NoPendingPromotion,

    #[error("choose a promotion piece before doing anything else")]
    PromotionPending,

    #[error("this connection has already joined a room")]
    AlreadyInRoom,

    #[error("this connection is not in a room")]
    UnknownConnection,
}

impl SessionError {
    /// Turn and seat violations, as opposed to moves the rules forbid or bad input.
    pub fn is_policy_rejection(&self) -> bool {
        matches!(
            self,
            SessionError::OutOfTurn
                | SessionError::NotASeatedPlayer
                | SessionError::GameNotInProgress
                | SessionError::NoPendingPromotion
                | SessionError::PromotionPending
                | SessionError::AlreadyInRoom
                | SessionError::UnknownConnection
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_errors_are_not_policy_rejections() {
        let illegal = SessionError::from(RuleError::PathObstructed);
        assert!(!illegal.is_policy_rejection());
        assert_eq!(illegal.to_string(), "illegal move: the path is blocked");

        assert!(SessionError::OutOfTurn.is_policy_rejection());
        assert!(!SessionError::MalformedMessage("eof".to_owned()).is_policy_rejection());
    }
}
