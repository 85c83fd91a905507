//! Room registry, matchmaking pool, and request routing.
//!
//! Locking: the registry mutex covers the room table, the connection index,
//! and the matchmaking queue. Each room has its own mutex. When both are held
//! the registry is always taken first. Moves, promotions, and resignations
//! only hold the registry long enough to look up the room, so rooms proceed
//! independently of one another.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use crate::game_state::chess_types::{square_to_row_col, Color, PieceKind};
use crate::game_state::game_state::GameState;
use crate::move_generation::move_validation::MoveProposal;
use crate::move_generation::rule_engine::{begin_move, complete_move, BeginMove, MoveOutcome};
use crate::protocol::game_state_view::{GameStateView, LastMoveView};
use crate::protocol::messages::{ClientMessage, SeatRole, ServerMessage};
use crate::session::connection::{ConnectionHandle, ConnectionId};
use crate::session::room::{Departure, GameResult, ResultKind, Room, RoomStatus};
use crate::session::room_id::{generate_matchmaking_room_id, JoinTarget, RoomId};
use crate::session::session_errors::{SessionError, SessionResult};
use crate::utils::render_game_state::render_game_state;

type SharedRoom = Arc<Mutex<Room>>;

#[derive(Default)]
struct Registry {
    rooms: HashMap<RoomId, SharedRoom>,
    by_connection: HashMap<ConnectionId, RoomId>,
    /// Matchmaking rooms still waiting for their second seat, oldest first.
    matchmaking: VecDeque<RoomId>,
}

impl Registry {
    /// Oldest matchmaking room that can still seat an opponent. Stale entries are dropped.
    fn waiting_matchmaking_room(&mut self) -> Option<RoomId> {
        while let Some(room_id) = self.matchmaking.front() {
            let joinable = self
                .rooms
                .get(room_id)
                .is_some_and(|room| room.lock().next_role() != SeatRole::Spectator);
            if joinable {
                return Some(room_id.clone());
            }
            self.matchmaking.pop_front();
        }
        None
    }

    fn room_for(&self, id: ConnectionId) -> SessionResult<SharedRoom> {
        self.by_connection
            .get(&id)
            .and_then(|room_id| self.rooms.get(room_id))
            .cloned()
            .ok_or(SessionError::UnknownConnection)
    }
}

/// What a join produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub room_id: RoomId,
    pub role: SeatRole,
}

/// A move as submitted over the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub from_row: i64,
    pub from_col: i64,
    pub to_row: i64,
    pub to_col: i64,
    pub promotion: Option<String>,
}

#[derive(Default)]
pub struct SessionCoordinator {
    registry: Mutex<Registry>,
}

impl SessionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seats `handle` in the addressed room, creating the room if needed.
    ///
    /// The joiner always receives `playerAssigned`. A second seat triggers
    /// `gameStart` to both seats; a spectator also gets a `gameSnapshot`.
    pub fn join_room(
        &self,
        target: JoinTarget,
        display_name: &str,
        handle: ConnectionHandle,
    ) -> SessionResult<JoinOutcome> {
        let connection = handle.id();
        let mut registry = self.registry.lock();
        if registry.by_connection.contains_key(&connection) {
            return Err(SessionError::AlreadyInRoom);
        }

        let room_id = match target {
            JoinTarget::Named(room_id) => room_id,
            JoinTarget::Matchmaking => match registry.waiting_matchmaking_room() {
                Some(room_id) => room_id,
                None => {
                    let room_id = generate_matchmaking_room_id();
                    registry.matchmaking.push_back(room_id.clone());
                    room_id
                }
            },
        };

        let room = Arc::clone(registry.rooms.entry(room_id.clone()).or_insert_with(|| {
            info!(room = %room_id, "room created");
            Arc::new(Mutex::new(Room::new(room_id.clone())))
        }));
        registry.by_connection.insert(connection, room_id.clone());

        let mut room = room.lock();
        let role = room.admit(handle.clone(), display_name.to_owned());
        if room.status == RoomStatus::InProgress {
            registry.matchmaking.retain(|queued| queued != &room_id);
        }
        drop(registry);

        info!(room = %room_id, %connection, player = display_name, ?role, "joined");
        handle.send(ServerMessage::PlayerAssigned {
            color: role,
            message: assignment_message(role, display_name),
        });
        match role {
            SeatRole::White => {}
            SeatRole::Black => {
                info!(room = %room_id, "game started");
                room.announce_start();
            }
            SeatRole::Spectator => {
                handle.send(room.snapshot_message());
            }
        }

        Ok(JoinOutcome { room_id, role })
    }

    /// Role and board the next persistent join to `target` would receive,
    /// without taking a seat.
    pub fn preview_join(&self, target: &JoinTarget) -> (SeatRole, GameStateView) {
        let mut registry = self.registry.lock();
        let room_id = match target {
            JoinTarget::Named(room_id) => Some(room_id.clone()),
            JoinTarget::Matchmaking => registry.waiting_matchmaking_room(),
        };
        let existing = room_id.and_then(|room_id| registry.rooms.get(&room_id).cloned());
        drop(registry);

        match existing {
            Some(room) => {
                let room = room.lock();
                (room.next_role(), room.game_state_view())
            }
            None => (SeatRole::White, GameStateView::from(&GameState::new_game())),
        }
    }

    /// Routes one decoded client message.
    pub fn dispatch(&self, connection: ConnectionId, message: ClientMessage) -> SessionResult<()> {
        match message {
            ClientMessage::Move {
                from_row,
                from_col,
                to_row,
                to_col,
                promotion,
                ..
            } => self.submit_move(
                connection,
                MoveRequest {
                    from_row,
                    from_col,
                    to_row,
                    to_col,
                    promotion,
                },
            ),
            ClientMessage::Promote { piece } => self.complete_promotion(connection, &piece),
            ClientMessage::Resign => self.resign(connection),
        }
    }

    pub fn submit_move(&self, connection: ConnectionId, request: MoveRequest) -> SessionResult<()> {
        let room = self.registry.lock().room_for(connection)?;
        let mut room = room.lock();

        if room.status != RoomStatus::InProgress {
            return Err(SessionError::GameNotInProgress);
        }
        let side_to_move = room.board.side_to_move;
        let seat = room.seat(connection).ok_or(SessionError::NotASeatedPlayer)?;
        if seat.pending_promotion.is_some() {
            return Err(SessionError::PromotionPending);
        }
        if seat.color != side_to_move {
            return Err(SessionError::OutOfTurn);
        }
        let color = seat.color;

        let mut proposal = MoveProposal::from_row_col(
            request.from_row,
            request.from_col,
            request.to_row,
            request.to_col,
        )?;
        if let Some(raw) = request.promotion.as_deref() {
            proposal = proposal.with_promotion(parse_piece_choice(raw)?);
        }

        match begin_move(&room.board, proposal, color)? {
            BeginMove::Ready(outcome) => {
                commit(&mut room, color, outcome);
            }
            BeginMove::PendingPromotion(pending) => {
                debug!(room = %room.id, %connection, "promotion choice requested");
                let (from_row, from_col) = square_to_row_col(pending.from);
                let (to_row, to_col) = square_to_row_col(pending.to);
                let seat = room
                    .seat_mut(connection)
                    .ok_or(SessionError::NotASeatedPlayer)?;
                seat.pending_promotion = Some(pending);
                seat.handle.send(ServerMessage::PromotionRequired {
                    from_row,
                    from_col,
                    to_row,
                    to_col,
                });
            }
        }
        Ok(())
    }

    pub fn complete_promotion(&self, connection: ConnectionId, piece: &str) -> SessionResult<()> {
        let room = self.registry.lock().room_for(connection)?;
        let mut room = room.lock();

        if room.status != RoomStatus::InProgress {
            return Err(SessionError::GameNotInProgress);
        }
        let seat = room.seat(connection).ok_or(SessionError::NotASeatedPlayer)?;
        let pending = seat.pending_promotion.ok_or(SessionError::NoPendingPromotion)?;
        let color = seat.color;

        // A bad choice leaves the pending move in place for another try.
        let piece = parse_piece_choice(piece)?;
        let outcome = complete_move(&room.board, pending, piece)?;

        if let Some(seat) = room.seat_mut(connection) {
            seat.pending_promotion = None;
        }
        commit(&mut room, color, outcome);
        Ok(())
    }

    pub fn resign(&self, connection: ConnectionId) -> SessionResult<()> {
        let room = self.registry.lock().room_for(connection)?;
        let mut room = room.lock();

        let seat = room.seat(connection).ok_or(SessionError::NotASeatedPlayer)?;
        let color = seat.color;
        if room.status != RoomStatus::InProgress {
            return Err(SessionError::GameNotInProgress);
        }

        let result = GameResult {
            kind: ResultKind::Resignation,
            winner: Some(color.opposite()),
        };
        room.finish(result);
        info!(room = %room.id, %connection, %color, "resigned");
        room.broadcast(&result.end_message());
        Ok(())
    }

    /// Removes the connection from its room. Safe to call more than once.
    ///
    /// Remaining occupants hear about a seat leaving a game in progress; the
    /// game itself is left running. An empty room is evicted.
    pub fn disconnect(&self, connection: ConnectionId) -> bool {
        let mut registry = self.registry.lock();
        let Some(room_id) = registry.by_connection.remove(&connection) else {
            return false;
        };
        let Some(room) = registry.rooms.get(&room_id).cloned() else {
            return true;
        };

        let mut room = room.lock();
        let departure = room.remove(connection);

        if room.is_empty() {
            registry.rooms.remove(&room_id);
            registry.matchmaking.retain(|queued| queued != &room_id);
            info!(room = %room_id, "room evicted");
            return true;
        }
        drop(registry);

        if let Some(Departure::Seat {
            display_name,
            color,
        }) = departure
        {
            info!(room = %room_id, %connection, %color, "player left");
            if room.status == RoomStatus::InProgress {
                room.broadcast(&ServerMessage::PlayerDisconnected {
                    message: format!("{display_name} ({color}) disconnected."),
                });
            }
        }
        true
    }

    pub fn room_count(&self) -> usize {
        self.registry.lock().rooms.len()
    }

    pub fn room_status(&self, room_id: &str) -> Option<RoomStatus> {
        let room = self.registry.lock().rooms.get(room_id).cloned()?;
        let status = room.lock().status;
        Some(status)
    }

    /// FEN of the room's authoritative board.
    pub fn room_fen(&self, room_id: &str) -> Option<String> {
        let room = self.registry.lock().rooms.get(room_id).cloned()?;
        let fen = room.lock().board.get_fen();
        Some(fen)
    }

    pub fn room_move_count(&self, room_id: &str) -> Option<usize> {
        let room = self.registry.lock().rooms.get(room_id).cloned()?;
        let count = room.lock().board.move_log.len();
        Some(count)
    }
}

/// Stores an accepted move and tells everyone in the room.
fn commit(room: &mut Room, mover: Color, outcome: MoveOutcome) {
    let MoveOutcome {
        board,
        played,
        in_check,
        terminal,
    } = outcome;
    room.board = board;
    let result = terminal.map(GameResult::from);
    if let Some(result) = result {
        room.finish(result);
    }

    debug!(room = %room.id, %mover, from = played.from, to = played.to, in_check, "move accepted");
    trace!(room = %room.id, "\n{}", render_game_state(&room.board));

    room.broadcast(&ServerMessage::MoveUpdate {
        game_state: room.game_state_view(),
        last_move: LastMoveView::from(&played),
        in_check,
        result: result.map(GameResult::view),
    });
    if let Some(result) = result {
        info!(room = %room.id, reason = ?result.kind, winner = ?result.winner, "game finished");
        room.broadcast(&result.end_message());
    }
}

fn parse_piece_choice(raw: &str) -> SessionResult<PieceKind> {
    PieceKind::parse_choice(raw).ok_or_else(|| {
        warn!(choice = raw, "unknown promotion piece");
        SessionError::MalformedMessage(format!("unknown promotion piece '{raw}'"))
    })
}

fn assignment_message(role: SeatRole, display_name: &str) -> String {
    match role {
        SeatRole::White => format!("{display_name}, you play white. Waiting for an opponent."),
        SeatRole::Black => format!("{display_name}, you play black. The game begins."),
        SeatRole::Spectator => format!("{display_name}, you are watching this game."),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::thread;

    use tokio::sync::mpsc::UnboundedReceiver;

    use super::*;
    use crate::session::connection::Outbound;

    struct Client {
        handle: ConnectionHandle,
        inbox: UnboundedReceiver<Outbound>,
    }

    impl Client {
        fn new() -> Self {
            let (handle, inbox) = ConnectionHandle::channel();
            Self { handle, inbox }
        }

        fn id(&self) -> ConnectionId {
            self.handle.id()
        }

        fn drain(&mut self) -> Vec<ServerMessage> {
            let mut out = Vec::new();
            while let Ok(frame) = self.inbox.try_recv() {
                if let Outbound::Message(message) = frame {
                    out.push(message);
                }
            }
            out
        }

        fn kinds(&mut self) -> Vec<&'static str> {
            self.drain().iter().map(ServerMessage::kind).collect()
        }
    }

    fn join(coordinator: &SessionCoordinator, room: &str, client: &Client) -> JoinOutcome {
        coordinator
            .join_room(JoinTarget::parse(room), "tester", client.handle.clone())
            .expect("join should succeed")
    }

    fn mv(from_row: i64, from_col: i64, to_row: i64, to_col: i64) -> MoveRequest {
        MoveRequest {
            from_row,
            from_col,
            to_row,
            to_col,
            promotion: None,
        }
    }

    fn started_room(coordinator: &SessionCoordinator, room: &str) -> (Client, Client) {
        let mut white = Client::new();
        let mut black = Client::new();
        join(coordinator, room, &white);
        join(coordinator, room, &black);
        white.drain();
        black.drain();
        (white, black)
    }

    #[test]
    fn white_black_then_spectator() {
        let coordinator = SessionCoordinator::new();
        let mut white = Client::new();
        let mut black = Client::new();
        let mut watcher = Client::new();

        assert_eq!(join(&coordinator, "room", &white).role, SeatRole::White);
        assert_eq!(white.kinds(), vec!["playerAssigned"]);
        assert_eq!(coordinator.room_status("room"), Some(RoomStatus::WaitingForOpponent));

        assert_eq!(join(&coordinator, "room", &black).role, SeatRole::Black);
        assert_eq!(coordinator.room_status("room"), Some(RoomStatus::InProgress));

        let white_msgs = white.drain();
        assert!(matches!(
            white_msgs.as_slice(),
            [ServerMessage::GameStart { player_color: Color::Light, .. }]
        ));
        let black_msgs = black.drain();
        assert!(matches!(
            black_msgs.as_slice(),
            [
                ServerMessage::PlayerAssigned { color: SeatRole::Black, .. },
                ServerMessage::GameStart { player_color: Color::Dark, .. }
            ]
        ));

        assert_eq!(join(&coordinator, "room", &watcher).role, SeatRole::Spectator);
        assert_eq!(watcher.kinds(), vec!["playerAssigned", "gameSnapshot"]);
        assert!(white.drain().is_empty());
    }

    #[test]
    fn joining_twice_is_rejected() {
        let coordinator = SessionCoordinator::new();
        let client = Client::new();
        join(&coordinator, "room", &client);
        assert_eq!(
            coordinator.join_room(JoinTarget::parse("other"), "again", client.handle.clone()),
            Err(SessionError::AlreadyInRoom)
        );
    }

    #[test]
    fn moves_are_broadcast_and_turns_enforced() {
        let coordinator = SessionCoordinator::new();
        let (mut white, mut black) = started_room(&coordinator, "room");
        let mut watcher = Client::new();
        join(&coordinator, "room", &watcher);
        watcher.drain();

        assert_eq!(
            coordinator.submit_move(black.id(), mv(1, 4, 3, 4)),
            Err(SessionError::OutOfTurn)
        );
        coordinator
            .submit_move(white.id(), mv(6, 4, 4, 4))
            .expect("e4 should be accepted");
        assert_eq!(
            coordinator.submit_move(white.id(), mv(6, 3, 4, 3)),
            Err(SessionError::OutOfTurn)
        );
        assert_eq!(
            coordinator.submit_move(watcher.id(), mv(1, 4, 3, 4)),
            Err(SessionError::NotASeatedPlayer)
        );

        for client in [&mut white, &mut black, &mut watcher] {
            let msgs = client.drain();
            assert_eq!(msgs.len(), 1);
            match &msgs[0] {
                ServerMessage::MoveUpdate {
                    game_state,
                    last_move,
                    in_check,
                    result,
                } => {
                    assert_eq!(game_state.current_player, Color::Dark);
                    assert_eq!(game_state.board[4][4], "♙");
                    assert_eq!((last_move.from_row, last_move.to_row), (6, 4));
                    assert!(!in_check);
                    assert!(result.is_none());
                }
                other => panic!("expected moveUpdate, got {other:?}"),
            }
        }
        assert_eq!(coordinator.room_move_count("room"), Some(1));
        assert_eq!(
            coordinator.room_fen("room").as_deref(),
            Some("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
        );
    }

    #[test]
    fn off_turn_seat_is_rejected_on_every_attempt() {
        let coordinator = SessionCoordinator::new();
        let (mut white, mut black) = started_room(&coordinator, "room");

        for request in [mv(1, 4, 3, 4), mv(1, 3, 3, 3)] {
            assert_eq!(
                coordinator.submit_move(black.id(), request),
                Err(SessionError::OutOfTurn)
            );
        }
        coordinator
            .submit_move(white.id(), mv(6, 4, 4, 4))
            .expect("e4 should be accepted");
        for request in [mv(6, 3, 4, 3), mv(7, 6, 5, 5)] {
            assert_eq!(
                coordinator.submit_move(white.id(), request),
                Err(SessionError::OutOfTurn)
            );
        }

        assert_eq!(coordinator.room_move_count("room"), Some(1));
        assert_eq!(white.kinds(), vec!["moveUpdate"]);
        assert_eq!(black.kinds(), vec!["moveUpdate"]);
    }

    #[test]
    fn illegal_move_changes_nothing() {
        let coordinator = SessionCoordinator::new();
        let (mut white, mut black) = started_room(&coordinator, "room");

        let err = coordinator
            .submit_move(white.id(), mv(7, 0, 5, 0))
            .expect_err("rook is boxed in");
        assert!(matches!(err, SessionError::IllegalMove(_)));
        assert!(!err.is_policy_rejection());

        assert!(white.drain().is_empty());
        assert!(black.drain().is_empty());
        assert_eq!(coordinator.room_move_count("room"), Some(0));
    }

    #[test]
    fn moves_before_the_game_starts_are_rejected() {
        let coordinator = SessionCoordinator::new();
        let white = Client::new();
        join(&coordinator, "room", &white);
        assert_eq!(
            coordinator.submit_move(white.id(), mv(6, 4, 4, 4)),
            Err(SessionError::GameNotInProgress)
        );
        assert_eq!(
            coordinator.submit_move(ConnectionId(u64::MAX), mv(6, 4, 4, 4)),
            Err(SessionError::UnknownConnection)
        );
    }

    #[test]
    fn racing_seats_get_exactly_one_move_per_ply() {
        let coordinator = Arc::new(SessionCoordinator::new());
        let (white, black) = started_room(&coordinator, "race");
        let barrier = Arc::new(Barrier::new(2));

        let attempts = [(white.id(), mv(6, 4, 4, 4)), (black.id(), mv(1, 4, 3, 4))];
        let handles: Vec<_> = attempts
            .into_iter()
            .map(|(id, request)| {
                let coordinator = Arc::clone(&coordinator);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    coordinator.submit_move(id, request)
                })
            })
            .collect();
        let results: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().expect("thread should not panic"))
            .collect();

        // Only white may move first, whichever thread wins the lock.
        assert!(results[0].is_ok());
        assert_eq!(results[1], Err(SessionError::OutOfTurn));
        assert_eq!(coordinator.room_move_count("race"), Some(1));
    }

    #[test]
    fn disconnect_keeps_game_running_until_room_is_empty() {
        let coordinator = SessionCoordinator::new();
        let (white, mut black) = started_room(&coordinator, "room");

        assert!(coordinator.disconnect(white.id()));
        assert!(!coordinator.disconnect(white.id()));
        assert_eq!(coordinator.room_status("room"), Some(RoomStatus::InProgress));
        assert_eq!(black.kinds(), vec!["playerDisconnected"]);

        let mut late = Client::new();
        assert_eq!(join(&coordinator, "room", &late).role, SeatRole::Spectator);
        late.drain();

        coordinator.disconnect(black.id());
        assert_eq!(coordinator.room_count(), 1);
        coordinator.disconnect(late.id());
        assert_eq!(coordinator.room_count(), 0);
        assert_eq!(coordinator.room_status("room"), None);
    }

    #[test]
    fn matchmaking_pairs_two_and_opens_a_new_room_for_the_third() {
        let coordinator = SessionCoordinator::new();
        let first = Client::new();
        let second = Client::new();
        let third = Client::new();

        let a = join(&coordinator, "matchmaking", &first);
        let b = join(&coordinator, "matchmaking", &second);
        let c = join(&coordinator, "matchmaking", &third);

        assert!(a.room_id.starts_with("matchmaking_"));
        assert_eq!(a.room_id, b.room_id);
        assert_eq!((a.role, b.role), (SeatRole::White, SeatRole::Black));
        assert_eq!(coordinator.room_status(&a.room_id), Some(RoomStatus::InProgress));

        assert_ne!(c.room_id, a.room_id);
        assert_eq!(c.role, SeatRole::White);
        assert_eq!(coordinator.room_status(&c.room_id), Some(RoomStatus::WaitingForOpponent));
    }

    #[test]
    fn simultaneous_matchmaking_requests_fill_one_room_and_open_another() {
        let coordinator = Arc::new(SessionCoordinator::new());
        let clients: Vec<Client> = (0..3).map(|_| Client::new()).collect();
        let barrier = Arc::new(Barrier::new(clients.len()));

        let handles: Vec<_> = clients
            .iter()
            .map(|client| {
                let coordinator = Arc::clone(&coordinator);
                let barrier = Arc::clone(&barrier);
                let handle = client.handle.clone();
                thread::spawn(move || {
                    barrier.wait();
                    coordinator.join_room(JoinTarget::Matchmaking, "racer", handle)
                })
            })
            .collect();
        let outcomes: Vec<JoinOutcome> = handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .expect("thread should not panic")
                    .expect("matchmaking join should succeed")
            })
            .collect();

        let mut by_room: HashMap<RoomId, Vec<SeatRole>> = HashMap::new();
        for outcome in outcomes {
            by_room.entry(outcome.room_id).or_default().push(outcome.role);
        }
        assert_eq!(by_room.len(), 2);
        assert_eq!(coordinator.room_count(), 2);

        for (room_id, mut roles) in by_room {
            roles.sort_by_key(|role| role.as_str());
            match roles.as_slice() {
                [SeatRole::Black, SeatRole::White] => assert_eq!(
                    coordinator.room_status(&room_id),
                    Some(RoomStatus::InProgress)
                ),
                [SeatRole::White] => assert_eq!(
                    coordinator.room_status(&room_id),
                    Some(RoomStatus::WaitingForOpponent)
                ),
                other => panic!("unexpected seating {other:?} in {room_id}"),
            }
        }
    }

    #[test]
    fn abandoned_matchmaking_room_is_not_reused() {
        let coordinator = SessionCoordinator::new();
        let quitter = Client::new();
        let first = join(&coordinator, "matchmaking", &quitter);
        coordinator.disconnect(quitter.id());

        let next = Client::new();
        let second = join(&coordinator, "matchmaking", &next);
        assert_ne!(first.room_id, second.room_id);
        assert_eq!(second.role, SeatRole::White);
    }

    #[test]
    fn promotion_waits_for_a_piece_choice() {
        let coordinator = SessionCoordinator::new();
        let (mut white, mut black) = started_room(&coordinator, "promo");

        // Walk the b-pawn through to b7 and take a8.
        let script = [
            (&white, mv(6, 1, 4, 1)),
            (&black, mv(1, 7, 2, 7)),
            (&white, mv(4, 1, 3, 1)),
            (&black, mv(2, 7, 3, 7)),
            (&white, mv(3, 1, 2, 1)),
            (&black, mv(3, 7, 4, 7)),
            (&white, mv(2, 1, 1, 0)),
            (&black, mv(4, 7, 5, 7)),
        ];
        for (client, request) in script {
            coordinator
                .submit_move(client.id(), request)
                .expect("scripted move should be legal");
        }
        white.drain();
        black.drain();

        coordinator
            .submit_move(white.id(), mv(1, 0, 0, 1))
            .expect("bxa7xb8 should be accepted pending a piece");
        assert!(matches!(
            white.drain().as_slice(),
            [ServerMessage::PromotionRequired { from_row: 1, from_col: 0, to_row: 0, to_col: 1 }]
        ));
        assert!(black.drain().is_empty());
        assert_eq!(coordinator.room_move_count("promo"), Some(8));

        assert_eq!(
            coordinator.submit_move(white.id(), mv(6, 4, 4, 4)),
            Err(SessionError::PromotionPending)
        );
        assert_eq!(
            coordinator.submit_move(black.id(), mv(1, 4, 3, 4)),
            Err(SessionError::OutOfTurn)
        );
        assert_eq!(
            coordinator.complete_promotion(black.id(), "queen"),
            Err(SessionError::NoPendingPromotion)
        );
        assert!(matches!(
            coordinator.complete_promotion(white.id(), "dragon"),
            Err(SessionError::MalformedMessage(_))
        ));

        coordinator
            .complete_promotion(white.id(), "♘")
            .expect("knight promotion completes");
        assert_eq!(coordinator.room_move_count("promo"), Some(9));
        let msgs = black.drain();
        match msgs.as_slice() {
            [ServerMessage::MoveUpdate { game_state, last_move, .. }] => {
                assert_eq!(game_state.board[0][1], "♘");
                assert_eq!(last_move.special, "promotion");
                assert_eq!(last_move.promoted_piece.as_deref(), Some("♘"));
            }
            other => panic!("expected one moveUpdate, got {other:?}"),
        }
    }

    #[test]
    fn resignation_finishes_the_game() {
        let coordinator = SessionCoordinator::new();
        let (mut white, mut black) = started_room(&coordinator, "room");

        coordinator.resign(black.id()).expect("black may resign");
        assert_eq!(coordinator.room_status("room"), Some(RoomStatus::Finished));

        for client in [&mut white, &mut black] {
            match client.drain().as_slice() {
                [ServerMessage::GameEnd { winner, reason, .. }] => {
                    assert_eq!(*winner, Some(Color::Light));
                    assert_eq!(*reason, ResultKind::Resignation);
                }
                other => panic!("expected gameEnd, got {other:?}"),
            }
        }

        assert_eq!(coordinator.resign(white.id()), Err(SessionError::GameNotInProgress));
        assert_eq!(
            coordinator.submit_move(white.id(), mv(6, 4, 4, 4)),
            Err(SessionError::GameNotInProgress)
        );
    }

    #[test]
    fn fools_mate_ends_with_checkmate() {
        let coordinator = SessionCoordinator::new();
        let (mut white, black) = started_room(&coordinator, "room");

        for (client, request) in [
            (&white, mv(6, 5, 5, 5)),
            (&black, mv(1, 4, 3, 4)),
            (&white, mv(6, 6, 4, 6)),
            (&black, mv(0, 3, 4, 7)),
        ] {
            coordinator
                .submit_move(client.id(), request)
                .expect("scripted move should be legal");
        }

        assert_eq!(coordinator.room_status("room"), Some(RoomStatus::Finished));
        let msgs = white.drain();
        match msgs.as_slice() {
            [.., ServerMessage::MoveUpdate { in_check, result, .. }, ServerMessage::GameEnd { winner, reason, .. }] =>
            {
                assert!(*in_check);
                assert_eq!(result.map(|r| r.reason), Some(ResultKind::Checkmate));
                assert_eq!(*winner, Some(Color::Dark));
                assert_eq!(*reason, ResultKind::Checkmate);
            }
            other => panic!("expected moveUpdate then gameEnd, got {other:?}"),
        }
    }

    #[test]
    fn preview_does_not_take_a_seat() {
        let coordinator = SessionCoordinator::new();
        let target = JoinTarget::parse("lobby");
        assert_eq!(coordinator.preview_join(&target).0, SeatRole::White);

        let first = Client::new();
        join(&coordinator, "lobby", &first);
        assert_eq!(coordinator.preview_join(&target).0, SeatRole::Black);
        assert_eq!(coordinator.preview_join(&target).0, SeatRole::Black);
        assert_eq!(coordinator.room_status("lobby"), Some(RoomStatus::WaitingForOpponent));
    }
}
