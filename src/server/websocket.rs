//! Persistent connection: one WebSocket per player or spectator.
//!
//! A writer task drains the connection's outbound queue onto the socket while
//! a reader task decodes frames and hands them to the coordinator. When either
//! side ends, the other is stopped and the connection leaves its room.

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::protocol::codec::{decode_client_message, encode_server_message};
use crate::protocol::messages::ServerMessage;
use crate::server::app::AppState;
use crate::server::http_api::default_player_name;
use crate::session::connection::{ConnectionHandle, Outbound};
use crate::session::room_id::JoinTarget;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinParams {
    room_id: Option<String>,
    player_name: Option<String>,
}

pub async fn upgrade(
    ws: WebSocketUpgrade,
    Query(params): Query<JoinParams>,
    State(state): State<AppState>,
) -> Response {
    let Some(room_id) = params.room_id.filter(|id| !id.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ServerMessage::error("roomId is required")),
        )
            .into_response();
    };
    let player_name = params
        .player_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(default_player_name);

    ws.on_upgrade(move |socket| serve_socket(socket, state, room_id, player_name))
}

async fn serve_socket(socket: WebSocket, state: AppState, room_id: String, player_name: String) {
    let (handle, mut outbound) = ConnectionHandle::channel();
    let connection = handle.id();
    let (mut sink, mut stream) = socket.split();
    info!(%connection, room = %room_id, player = %player_name, "connection opened");

    state.monitor.register(handle.clone());

    let mut writer = tokio::spawn(async move {
        while let Some(frame) = outbound.recv().await {
            let sent = match frame {
                Outbound::Message(message) => match encode_server_message(&message) {
                    Ok(text) => sink.send(Message::Text(text.into())).await,
                    Err(err) => {
                        warn!(%err, kind = message.kind(), "failed to encode message");
                        continue;
                    }
                },
                Outbound::Ping => sink.send(Message::Ping(Bytes::new())).await,
                Outbound::Close => {
                    let _ = sink.send(Message::Close(None)).await;
                    break;
                }
            };
            if sent.is_err() {
                break;
            }
        }
    });

    if let Err(err) =
        state
            .coordinator
            .join_room(JoinTarget::parse(&room_id), &player_name, handle.clone())
    {
        handle.send(ServerMessage::error(err.to_string()));
    }

    let reader_state = state.clone();
    let mut reader = tokio::spawn(async move {
        while let Some(Ok(frame)) = stream.next().await {
            match frame {
                Message::Text(text) => handle_text(&reader_state, &handle, text.as_str()),
                Message::Pong(_) => reader_state.monitor.record_pong(handle.id()),
                Message::Close(_) => break,
                Message::Binary(_) | Message::Ping(_) => {}
            }
        }
    });

    tokio::select! {
        _ = &mut writer => reader.abort(),
        _ = &mut reader => writer.abort(),
    }

    state.monitor.unregister(connection);
    state.coordinator.disconnect(connection);
    info!(%connection, "connection closed");
}

fn handle_text(state: &AppState, handle: &ConnectionHandle, text: &str) {
    let connection = handle.id();
    let result = decode_client_message(text).and_then(|message| {
        debug!(%connection, ?message, "dispatching");
        state.coordinator.dispatch(connection, message)
    });

    if let Err(err) = result {
        if err.is_policy_rejection() {
            warn!(%connection, %err, "request refused by room policy");
        } else {
            warn!(%connection, %err, "request rejected");
        }
        handle.send(ServerMessage::error(err.to_string()));
    }
}
