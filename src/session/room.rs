//! One game: board, seats, spectators, and lifecycle.
//!
//! A `Room` is always accessed under its own lock, so nothing here is
//! synchronized; the coordinator serializes access.

use serde::Serialize;

use crate::game_state::{chess_types::Color, game_state::GameState};
use crate::move_generation::rule_engine::{PendingPromotion, TerminalStatus};
use crate::protocol::game_state_view::GameStateView;
use crate::protocol::messages::{GameResultView, SeatRole, ServerMessage};
use crate::session::connection::{ConnectionHandle, ConnectionId};
use crate::session::room_id::RoomId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RoomStatus {
    WaitingForOpponent,
    InProgress,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResultKind {
    Checkmate,
    Stalemate,
    #[serde(rename = "resign")]
    Resignation,
    KingCapture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameResult {
    pub kind: ResultKind,
    pub winner: Option<Color>,
}

impl From<TerminalStatus> for GameResult {
    fn from(status: TerminalStatus) -> Self {
        let kind = match status {
            TerminalStatus::Checkmate { .. } => ResultKind::Checkmate,
            TerminalStatus::Stalemate => ResultKind::Stalemate,
            TerminalStatus::KingCapture { .. } => ResultKind::KingCapture,
        };
        Self {
            kind,
            winner: status.winner(),
        }
    }
}

impl GameResult {
    pub fn view(self) -> GameResultView {
        GameResultView {
            winner: self.winner,
            reason: self.kind,
        }
    }

    pub fn announcement(self) -> String {
        match (self.kind, self.winner) {
            (ResultKind::Checkmate, Some(winner)) => format!("Checkmate. {winner} wins."),
            (ResultKind::Stalemate, _) => "Stalemate. The game is drawn.".to_owned(),
            (ResultKind::Resignation, Some(winner)) => {
                format!("{} resigned. {winner} wins.", winner.opposite())
            }
            (ResultKind::KingCapture, Some(winner)) => {
                format!("The king was captured. {winner} wins.")
            }
            (_, None) => "The game is over.".to_owned(),
        }
    }

    pub fn end_message(self) -> ServerMessage {
        ServerMessage::GameEnd {
            winner: self.winner,
            reason: self.kind,
            message: self.announcement(),
        }
    }
}

#[derive(Debug)]
pub struct Seat {
    pub handle: ConnectionHandle,
    pub display_name: String,
    pub color: Color,
    pub pending_promotion: Option<PendingPromotion>,
}

#[derive(Debug)]
pub struct Spectator {
    pub handle: ConnectionHandle,
    pub display_name: String,
}

/// Who left, as reported by `Room::remove`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Departure {
    Seat { display_name: String, color: Color },
    Spectator,
}

#[derive(Debug)]
pub struct Room {
    pub id: RoomId,
    pub seats: Vec<Seat>,
    pub spectators: Vec<Spectator>,
    pub board: GameState,
    pub status: RoomStatus,
    pub result: Option<GameResult>,
}

impl Room {
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            seats: Vec::with_capacity(2),
            spectators: Vec::new(),
            board: GameState::new_game(),
            status: RoomStatus::WaitingForOpponent,
            result: None,
        }
    }

    pub fn occupant_count(&self) -> usize {
        self.seats.len() + self.spectators.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupant_count() == 0
    }

    /// Role the next joiner would receive.
    pub fn next_role(&self) -> SeatRole {
        if self.status != RoomStatus::WaitingForOpponent || self.seats.len() >= 2 {
            return SeatRole::Spectator;
        }
        match self.seats.first() {
            None => SeatRole::White,
            Some(seat) => seat.color.opposite().into(),
        }
    }

    /// Seats or spectates `handle`; the second seat starts the game.
    pub fn admit(&mut self, handle: ConnectionHandle, display_name: String) -> SeatRole {
        let role = self.next_role();
        match role.color() {
            Some(color) => {
                self.seats.push(Seat {
                    handle,
                    display_name,
                    color,
                    pending_promotion: None,
                });
                if self.seats.len() == 2 {
                    self.status = RoomStatus::InProgress;
                }
            }
            None => self.spectators.push(Spectator {
                handle,
                display_name,
            }),
        }
        role
    }

    pub fn remove(&mut self, id: ConnectionId) -> Option<Departure> {
        if let Some(index) = self.seats.iter().position(|seat| seat.handle.id() == id) {
            let seat = self.seats.remove(index);
            return Some(Departure::Seat {
                display_name: seat.display_name,
                color: seat.color,
            });
        }
        let index = self
            .spectators
            .iter()
            .position(|spectator| spectator.handle.id() == id)?;
        self.spectators.remove(index);
        Some(Departure::Spectator)
    }

    pub fn seat(&self, id: ConnectionId) -> Option<&Seat> {
        self.seats.iter().find(|seat| seat.handle.id() == id)
    }

    pub fn seat_mut(&mut self, id: ConnectionId) -> Option<&mut Seat> {
        self.seats.iter_mut().find(|seat| seat.handle.id() == id)
    }

    pub fn finish(&mut self, result: GameResult) {
        self.status = RoomStatus::Finished;
        self.result = Some(result);
        for seat in &mut self.seats {
            seat.pending_promotion = None;
        }
    }

    pub fn game_state_view(&self) -> GameStateView {
        GameStateView::from(&self.board)
    }

    pub fn snapshot_message(&self) -> ServerMessage {
        ServerMessage::GameSnapshot {
            game_state: self.game_state_view(),
            status: self.status,
            result: self.result.map(GameResult::view),
        }
    }

    /// Sends `gameStart` to each seat with that seat's own color.
    pub fn announce_start(&self) {
        let game_state = self.game_state_view();
        for seat in &self.seats {
            seat.handle.send(ServerMessage::GameStart {
                game_state: game_state.clone(),
                player_color: seat.color,
            });
        }
    }

    pub fn broadcast(&self, message: &ServerMessage) {
        self.broadcast_except(None, message);
    }

    pub fn broadcast_except(&self, skip: Option<ConnectionId>, message: &ServerMessage) {
        let recipients = self
            .seats
            .iter()
            .map(|seat| &seat.handle)
            .chain(self.spectators.iter().map(|spectator| &spectator.handle))
            .filter(|handle| Some(handle.id()) != skip);
        for handle in recipients {
            handle.send(message.clone());
        }
    }
}
