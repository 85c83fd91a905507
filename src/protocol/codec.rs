//! Text frame encoding and decoding.

use crate::protocol::messages::{ClientMessage, ServerMessage};
use crate::session::session_errors::{SessionError, SessionResult};

pub fn decode_client_message(text: &str) -> SessionResult<ClientMessage> {
    serde_json::from_str(text).map_err(|err| SessionError::MalformedMessage(err.to_string()))
}

pub fn encode_server_message(message: &ServerMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(message)
}
