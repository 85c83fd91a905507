//! Browser-facing rendering of the authoritative board.
//!
//! Rows run from rank 8 (row 0) down to rank 1, columns from file a. Pieces
//! are Unicode glyphs and empty squares are empty strings.

use serde::Serialize;

use crate::game_state::chess_move::{ChessMove, SpecialMove};
use crate::game_state::chess_types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl From<Square> for Coord {
    fn from(square: Square) -> Self {
        let (row, col) = square_to_row_col(square);
        Self { row, col }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveHistoryEntry {
    pub from: Coord,
    pub to: Coord,
    pub piece: String,
    pub captured: String,
    pub special: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promoted_piece: Option<String>,
}

impl From<&ChessMove> for MoveHistoryEntry {
    fn from(mv: &ChessMove) -> Self {
        Self {
            from: mv.from.into(),
            to: mv.to.into(),
            piece: glyph(mv.color, mv.moved_piece),
            captured: captured_glyph(mv),
            special: mv.special.wire_name(),
            promoted_piece: promoted_glyph(mv),
        }
    }
}

/// The `lastMove` object of a `moveUpdate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMoveView {
    pub from_row: u8,
    pub from_col: u8,
    pub to_row: u8,
    pub to_col: u8,
    pub piece: String,
    pub captured: String,
    pub special: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promoted_piece: Option<String>,
}

impl From<&ChessMove> for LastMoveView {
    fn from(mv: &ChessMove) -> Self {
        let (from_row, from_col) = square_to_row_col(mv.from);
        let (to_row, to_col) = square_to_row_col(mv.to);
        Self {
            from_row,
            from_col,
            to_row,
            to_col,
            piece: glyph(mv.color, mv.moved_piece),
            captured: captured_glyph(mv),
            special: mv.special.wire_name(),
            promoted_piece: promoted_glyph(mv),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateView {
    pub board: Vec<Vec<String>>,
    pub current_player: Color,
    pub move_history: Vec<MoveHistoryEntry>,
    pub fen: String,
}

impl From<&GameState> for GameStateView {
    fn from(game_state: &GameState) -> Self {
        let board = (0..8u8)
            .map(|row| {
                (0..8u8)
                    .map(|col| {
                        let square = make_square(col, 7 - row);
                        game_state
                            .piece_at(square)
                            .map(|(color, piece)| glyph(color, piece))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        Self {
            board,
            current_player: game_state.side_to_move,
            move_history: game_state.move_log.iter().map(MoveHistoryEntry::from).collect(),
            fen: game_state.get_fen(),
        }
    }
}

fn glyph(color: Color, piece: PieceKind) -> String {
    piece.symbol(color).to_string()
}

fn captured_glyph(mv: &ChessMove) -> String {
    mv.captured_piece
        .map(|piece| glyph(mv.color.opposite(), piece))
        .unwrap_or_default()
}

fn promoted_glyph(mv: &ChessMove) -> Option<String> {
    match mv.special {
        SpecialMove::Promotion(piece) => Some(glyph(mv.color, piece)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generation::move_validation::MoveProposal;
    use crate::move_generation::rule_engine::validate_and_apply;

    #[test]
    fn start_position_layout() {
        let view = GameStateView::from(&GameState::new_game());

        assert_eq!(view.board[0][0], "♜");
        assert_eq!(view.board[0][4], "♚");
        assert_eq!(view.board[7][4], "♔");
        assert_eq!(view.board[6][3], "♙");
        assert_eq!(view.board[4][4], "");
        assert_eq!(view.current_player, Color::Light);
        assert!(view.move_history.is_empty());
    }

    #[test]
    fn history_uses_row_col_coordinates() {
        let game = GameState::new_game();
        let e2e4 = MoveProposal::from_row_col(6, 4, 4, 4).expect("on board");
        let outcome = validate_and_apply(&game, e2e4, Color::Light).expect("e4 is legal");

        let view = GameStateView::from(&outcome.board);
        let entry = &view.move_history[0];
        assert_eq!(entry.from, Coord { row: 6, col: 4 });
        assert_eq!(entry.to, Coord { row: 4, col: 4 });
        assert_eq!(entry.piece, "♙");
        assert_eq!(entry.captured, "");
        assert_eq!(entry.special, "normal");

        let json = serde_json::to_value(&view).expect("serializes");
        assert_eq!(json["currentPlayer"], "black");
        assert!(json["moveHistory"][0].get("promotedPiece").is_none());
    }
}
