//! Room service — creation, lookup, listing, and admission.
//!
//! DESIGN
//! ======
//! The registry maps room ids to actor handles. Rooms are created either
//! explicitly (`create_room`, fresh id) or implicitly by the first join to
//! an unknown id. A room removes itself from the registry when it
//! terminates; a handle that is already closed counts as absent, so a later
//! join to the same id starts a fresh room.
//!
//! LOCKING
//! =======
//! The registry lock is never held across an await on a room actor. The
//! actor takes the write lock while unregistering, so waiting on it with the
//! lock held would deadlock teardown.

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::room::protocol::PlayerView;
use crate::room::{Outbox, Room, RoomError, RoomHandle, RoomRuntime, RoomSummary, spawn_room};
use crate::state::AppState;

/// Options accepted when a room is created.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateOptions {
    /// Countdown in seconds. Defaults and clamping come from `RoomConfig`.
    pub expiration: Option<u32>,
    pub mode: Option<String>,
}

fn runtime(state: &AppState) -> RoomRuntime {
    RoomRuntime {
        tick: state.config.tick,
        grace: state.config.tick * state.config.grace_ticks,
        registry: state.rooms.clone(),
        store: state.store.clone(),
    }
}

fn build_room(state: &AppState, room_id: &str, options: &CreateOptions) -> Room {
    Room::new(
        room_id,
        state.config.mode(options.mode.as_deref()),
        state.config.expiration(options.expiration),
        state.config.chat_history,
    )
}

// =============================================================================
// CREATE / LOOKUP
// =============================================================================

/// Create a room under a fresh id.
pub async fn create_room(state: &AppState, options: &CreateOptions) -> RoomHandle {
    let room_id = Uuid::new_v4().simple().to_string();
    let room = build_room(state, &room_id, options);
    info!(%room_id, expiration = state.config.expiration(options.expiration), "room created");

    let (handle, _task) = spawn_room(room, runtime(state));
    state.rooms.write().await.insert(room_id, handle.clone());
    handle
}

/// Return the live room for `room_id`, spawning one with `options` if none
/// is running.
pub async fn get_or_create_room(state: &AppState, room_id: &str, options: &CreateOptions) -> RoomHandle {
    let mut rooms = state.rooms.write().await;
    if let Some(handle) = rooms.get(room_id).filter(|h| !h.is_closed()) {
        return handle.clone();
    }

    let room = build_room(state, room_id, options);
    info!(%room_id, expiration = state.config.expiration(options.expiration), "room created on first join");
    let (handle, _task) = spawn_room(room, runtime(state));
    rooms.insert(room_id.to_owned(), handle.clone());
    handle
}

/// Look up a live room.
pub async fn find_room(state: &AppState, room_id: &str) -> Option<RoomHandle> {
    let rooms = state.rooms.read().await;
    rooms.get(room_id).filter(|h| !h.is_closed()).cloned()
}

// =============================================================================
// ADMISSION
// =============================================================================

/// Join `room_id`, creating it if needed.
///
/// # Errors
///
/// Returns `RoomError::Closed` if the room terminated between lookup and
/// admission.
pub async fn join_room(
    state: &AppState,
    room_id: &str,
    options: &CreateOptions,
    session_id: String,
    name: Option<String>,
    outbox: Outbox,
) -> Result<(RoomHandle, PlayerView), RoomError> {
    let handle = get_or_create_room(state, room_id, options).await;
    let view = handle.join(session_id, name, outbox).await?;
    Ok((handle, view))
}

// =============================================================================
// QUERIES
// =============================================================================

/// Summary of one live room.
///
/// # Errors
///
/// Returns `RoomError::NotFound` if no live room has this id.
pub async fn room_summary(state: &AppState, room_id: &str) -> Result<RoomSummary, RoomError> {
    let Some(handle) = find_room(state, room_id).await else {
        return Err(RoomError::NotFound(room_id.to_owned()));
    };
    handle
        .summary()
        .await
        .map_err(|_| RoomError::NotFound(room_id.to_owned()))
}

/// Summaries of every live room, ordered by id. Rooms that terminate while
/// being listed are skipped.
pub async fn list_rooms(state: &AppState) -> Vec<RoomSummary> {
    let handles: Vec<RoomHandle> = state.rooms.read().await.values().cloned().collect();

    let mut summaries = Vec::with_capacity(handles.len());
    for handle in handles {
        if let Ok(summary) = handle.summary().await {
            summaries.push(summary);
        }
    }
    summaries.sort_by(|a, b| a.id.cmp(&b.id));
    summaries
}

#[cfg(test)]
#[path = "rooms_test.rs"]
mod tests;
