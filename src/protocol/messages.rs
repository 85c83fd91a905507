//! JSON message types exchanged with browser clients.
//!
//! Every message is an object carrying a `type` discriminator; field names are
//! camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::game_state::chess_types::Color;
use crate::protocol::game_state_view::{GameStateView, LastMoveView};
use crate::session::room::{ResultKind, RoomStatus};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    Move {
        from_row: i64,
        from_col: i64,
        to_row: i64,
        to_col: i64,
        /// Piece name or glyph for a pawn reaching the last rank.
        #[serde(default)]
        promotion: Option<String>,
        // Hints some clients attach. The board is authoritative; these are ignored.
        #[serde(default)]
        room_id: Option<String>,
        #[serde(default)]
        player_name: Option<String>,
        #[serde(default)]
        piece: Option<String>,
        #[serde(default)]
        captured_piece: Option<serde_json::Value>,
        #[serde(default)]
        special_type: Option<String>,
    },
    Promote {
        piece: String,
    },
    Resign,
}

/// Role handed out on join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatRole {
    White,
    Black,
    Spectator,
}

impl SeatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            SeatRole::White => "white",
            SeatRole::Black => "black",
            SeatRole::Spectator => "spectator",
        }
    }

    pub fn color(self) -> Option<Color> {
        match self {
            SeatRole::White => Some(Color::Light),
            SeatRole::Black => Some(Color::Dark),
            SeatRole::Spectator => None,
        }
    }
}

impl From<Color> for SeatRole {
    fn from(color: Color) -> Self {
        match color {
            Color::Light => SeatRole::White,
            Color::Dark => SeatRole::Black,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResultView {
    pub winner: Option<Color>,
    pub reason: ResultKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    PlayerAssigned {
        color: SeatRole,
        message: String,
    },
    GameStart {
        game_state: GameStateView,
        player_color: Color,
    },
    GameSnapshot {
        game_state: GameStateView,
        status: RoomStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        result: Option<GameResultView>,
    },
    MoveUpdate {
        game_state: GameStateView,
        last_move: LastMoveView,
        in_check: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        result: Option<GameResultView>,
    },
    PromotionRequired {
        from_row: u8,
        from_col: u8,
        to_row: u8,
        to_col: u8,
    },
    GameEnd {
        winner: Option<Color>,
        reason: ResultKind,
        message: String,
    },
    PlayerDisconnected {
        message: String,
    },
    Error {
        message: String,
    },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    /// The wire `type` tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::PlayerAssigned { .. } => "playerAssigned",
            ServerMessage::GameStart { .. } => "gameStart",
            ServerMessage::GameSnapshot { .. } => "gameSnapshot",
            ServerMessage::MoveUpdate { .. } => "moveUpdate",
            ServerMessage::PromotionRequired { .. } => "promotionRequired",
            ServerMessage::GameEnd { .. } => "gameEnd",
            ServerMessage::PlayerDisconnected { .. } => "playerDisconnected",
            ServerMessage::Error { .. } => "error",
        }
    }
}
