//! Crate root for the chess rooms server.
//!
//! Board model and rules (`game_state`, `moves`, `move_generation`), room and
//! connection management (`session`), the JSON wire format (`protocol`), and
//! the HTTP/WebSocket front end (`server`).

pub mod game_state {
    pub mod chess_move;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
}

pub mod moves {
    pub mod leaper_moves;
    pub mod move_descriptions;
    pub mod pawn_moves;
    pub mod slider_moves;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_moves_king;
    pub mod legal_moves_pawn;
    pub mod legal_moves_pieces;
    pub mod move_generator;
    pub mod move_validation;
    pub mod perft;
    pub mod rule_engine;
    pub mod rule_errors;
}

pub mod session {
    pub mod connection;
    pub mod connection_monitor;
    pub mod coordinator;
    pub mod room;
    pub mod room_id;
    pub mod session_errors;
}

pub mod protocol {
    pub mod codec;
    pub mod game_state_view;
    pub mod messages;
}

pub mod server {
    pub mod app;
    pub mod config;
    pub mod http_api;
    pub mod websocket;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod render_game_state;
}
