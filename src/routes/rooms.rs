//! Room API: create a room around a background image, look it up by id.

#[cfg(test)]
#[path = "rooms_test.rs"]
mod rooms_test;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::rooms;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateRoomBody {
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub image: String,
    pub size: u32,
    /// Always empty; positions are not stored server side.
    pub positions: Vec<serde_json::Value>,
}

/// Path of the room record for `room_id`.
#[must_use]
pub fn room_path(room_id: Uuid) -> String {
    format!("/api/v1/room/{room_id}")
}

/// `POST /api/v1/room/`: create a room and redirect (303) to it.
pub async fn create_room(State(state): State<AppState>, Json(body): Json<CreateRoomBody>) -> Response {
    let Some(image) = body.image else {
        return (StatusCode::BAD_REQUEST, "missing image parameter").into_response();
    };

    let room_id = rooms::create_room(&state, image).await;
    Redirect::to(&room_path(room_id)).into_response()
}

/// `GET /api/v1/room/{room}`: room record, 404 when the id is unknown or malformed.
pub async fn get_room(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Result<Json<RoomResponse>, StatusCode> {
    let Ok(room_id) = room.parse::<Uuid>() else {
        return Err(StatusCode::NOT_FOUND);
    };
    let meta = rooms::get_room(&state, room_id).await.ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(RoomResponse { image: meta.image, size: meta.size, positions: Vec::new() }))
}
