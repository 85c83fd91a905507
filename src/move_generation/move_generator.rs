use crate::game_state::game_state::GameState;
use crate::move_generation::rule_errors::RuleResult;

#[derive(Debug, Clone)]
pub struct GeneratedMove {
    pub move_description: u64,
    pub game_after_move: GameState,
    /// The move leaves the opponent's king attacked.
    pub gives_check: bool,
}

/// Enumerates every legal move for the side to move.
pub trait MoveGenerator: Send + Sync {
    fn generate_legal_moves(&self, game_state: &GameState) -> RuleResult<Vec<GeneratedMove>>;
}
