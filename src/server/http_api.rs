//! One-shot HTTP join for clients without a persistent connection.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use crate::protocol::messages::{SeatRole, ServerMessage};
use crate::server::app::AppState;
use crate::session::room_id::JoinTarget;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectRequest {
    room_id: String,
    #[serde(default = "default_player_name")]
    player_name: String,
}

pub fn default_player_name() -> String {
    "Player".to_owned()
}

/// `POST /api/connect`: reports what joining would give, without joining.
pub async fn connect(State(state): State<AppState>, body: Bytes) -> Response {
    let request: ConnectRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            debug!(%err, "rejecting /api/connect body");
            return (StatusCode::BAD_REQUEST, Json(ServerMessage::error("Invalid JSON")))
                .into_response();
        }
    };

    let target = JoinTarget::parse(&request.room_id);
    let (role, game_state) = state.coordinator.preview_join(&target);
    let reply = match role.color() {
        Some(color) if role == SeatRole::Black => ServerMessage::GameStart {
            game_state,
            player_color: color,
        },
        _ => ServerMessage::PlayerAssigned {
            color: role,
            message: format!("{} would join as {}.", request.player_name, role.as_str()),
        },
    };
    Json(reply).into_response()
}

/// Any other `/api/*` path.
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(ServerMessage::error("API not found"))).into_response()
}
