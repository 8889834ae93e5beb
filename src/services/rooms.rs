//! Room records: background image and icon size per room.
//!
//! Records are created with a fresh v4 id and never modified. Positions are
//! not stored; viewers learn them from live move frames.

#[cfg(test)]
#[path = "rooms_test.rs"]
mod rooms_test;

use tracing::info;
use uuid::Uuid;

use crate::state::{AppState, DEFAULT_ICON_SIZE, RoomMeta};

/// Store a new room record and return its id.
pub async fn create_room(state: &AppState, image: String) -> Uuid {
    let room_id = Uuid::new_v4();
    let meta = RoomMeta { image, size: DEFAULT_ICON_SIZE };
    state.room_meta.write().await.insert(room_id, meta);
    info!(%room_id, "room created");
    room_id
}

pub async fn get_room(state: &AppState, room_id: Uuid) -> Option<RoomMeta> {
    state.room_meta.read().await.get(&room_id).cloned()
}
