//! Room discovery routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;

use crate::room::{RoomError, RoomSummary};
use crate::services::rooms::{self, CreateOptions};
use crate::state::AppState;

/// `GET /api/rooms` — list live rooms.
pub async fn list_rooms(State(state): State<AppState>) -> Json<Vec<RoomSummary>> {
    Json(rooms::list_rooms(&state).await)
}

/// `POST /api/rooms` — create a room with `{expiration?, mode?}`.
pub async fn create_room(
    State(state): State<AppState>,
    Json(body): Json<CreateOptions>,
) -> Result<(StatusCode, Json<RoomSummary>), StatusCode> {
    let handle = rooms::create_room(&state, &body).await;
    let summary = handle.summary().await.map_err(room_error_to_status)?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// `GET /api/rooms/:id` — summary of one live room.
pub async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomSummary>, StatusCode> {
    rooms::room_summary(&state, &room_id)
        .await
        .map(Json)
        .map_err(room_error_to_status)
}

pub(crate) fn room_error_to_status(err: RoomError) -> StatusCode {
    match err {
        RoomError::NotFound(_) => StatusCode::NOT_FOUND,
        RoomError::Closed(_) => StatusCode::GONE,
    }
}
