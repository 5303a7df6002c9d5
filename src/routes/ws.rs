//! WebSocket handler — bridges one socket to one room actor.
//!
//! DESIGN
//! ======
//! On upgrade, assigns a session id, joins the room (creating it on first
//! join) and enters a `select!` loop:
//! - Incoming client text → decode → forward to the room actor
//! - Messages from the room's outbox → encode → send to the client
//!
//! The socket layer never touches room state. Decoding failures are dropped
//! here; gating and routing happen inside the actor.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → join → room sends `state` snapshot and chat backlog
//! 2. Client text → `ClientMessage::decode` → `RoomHandle::send`
//! 3. Room terminates → outbox closes → close frame → exit
//! 4. Client closes first → `RoomHandle::leave`

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::room::{ClientMessage, RoomHandle, ServerMessage};
use crate::services::rooms::{self, CreateOptions};
use crate::state::AppState;

/// Query parameters accepted on upgrade. `expiration` and `mode` only apply
/// when this join creates the room.
#[derive(Debug, Default, Deserialize)]
pub struct JoinParams {
    pub name: Option<String>,
    pub expiration: Option<u32>,
    pub mode: Option<String>,
}

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Query(params): Query<JoinParams>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state, room_id, params))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState, room_id: String, params: JoinParams) {
    let session_id = Uuid::new_v4().to_string();
    let (outbox, mut inbox) = mpsc::channel::<ServerMessage>(state.config.outbox_capacity);
    let options = CreateOptions { expiration: params.expiration, mode: params.mode };

    let handle = match rooms::join_room(&state, &room_id, &options, session_id.clone(), params.name, outbox).await {
        Ok((handle, _view)) => handle,
        Err(e) => {
            warn!(%room_id, %session_id, error = %e, "ws: admission failed");
            let _ = send_message(&mut socket, &ServerMessage::Error(e.to_string())).await;
            let _ = socket.send(Message::Close(None)).await;
            return;
        }
    };

    info!(%room_id, %session_id, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        if forward_text(&handle, &session_id, text.as_str()).await.is_err() {
                            break;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            outbound = inbox.recv() => {
                // The room dropped our outbox: it has terminated.
                let Some(message) = outbound else {
                    let _ = socket.send(Message::Close(None)).await;
                    break;
                };
                if send_message(&mut socket, &message).await.is_err() {
                    break;
                }
            }
        }
    }

    handle.leave(session_id.clone()).await;
    info!(%room_id, %session_id, "ws: client disconnected");
}

/// Decode one text frame and hand it to the room. Undecodable input is
/// logged and dropped; only a closed room is an error.
async fn forward_text(handle: &RoomHandle, session_id: &str, text: &str) -> Result<(), ()> {
    let message = match ClientMessage::decode(text) {
        Ok(message) => message,
        Err(e) => {
            debug!(room_id = %handle.id(), %session_id, error = %e, "ws: ignoring undecodable message");
            return Ok(());
        }
    };
    handle.send(session_id.to_owned(), message).await.map_err(|_| ())
}

async fn send_message(socket: &mut WebSocket, message: &ServerMessage) -> Result<(), ()> {
    socket
        .send(Message::Text(message.encode().into()))
        .await
        .map_err(|_| ())
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
