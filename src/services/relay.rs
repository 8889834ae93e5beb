//! Room membership and fan-out.
//!
//! DESIGN
//! ======
//! Rooms are created on first join and evicted when their last connection
//! parts. Fan-out walks the room's clients under the read lock and enqueues
//! the frame with `try_send`; every connection whose session tag equals the
//! sender's is skipped, which is how a viewer's own moves are kept from
//! echoing back to it (including from a second socket of the same session).
//!
//! ERROR HANDLING
//! ==============
//! Delivery is best effort. A full queue drops the frame for that one client;
//! a closed queue is left for `part_room` to clean up when its socket loop
//! exits. Both are logged at debug level and never surface to the sender.

#[cfg(test)]
#[path = "relay_test.rs"]
mod relay_test;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info};
use uuid::Uuid;

use crate::state::{AppState, ConnectedClient};

/// Add a connection to `room`, creating the room if needed.
pub async fn join_room(state: &AppState, room: &str, client_id: Uuid, sid: u32, tx: mpsc::Sender<String>) {
    let mut rooms = state.rooms.write().await;
    let room_state = rooms.entry(room.to_owned()).or_default();
    room_state.clients.insert(client_id, ConnectedClient { sid, tx });
    info!(room, %client_id, sid, clients = room_state.clients.len(), "client joined room");
}

/// Remove a connection from `room`; the room is evicted once empty.
pub async fn part_room(state: &AppState, room: &str, client_id: Uuid) {
    let mut rooms = state.rooms.write().await;
    let Some(room_state) = rooms.get_mut(room) else {
        return;
    };

    room_state.clients.remove(&client_id);
    info!(room, %client_id, remaining = room_state.clients.len(), "client left room");

    if room_state.clients.is_empty() {
        rooms.remove(room);
        info!(room, "evicted empty room");
    }
}

/// Enqueue `frame` for every client in `room` whose sid differs from
/// `sender_sid`. Returns the number of clients the frame was queued for.
pub async fn broadcast(state: &AppState, room: &str, frame: &str, sender_sid: u32) -> usize {
    let rooms = state.rooms.read().await;
    let Some(room_state) = rooms.get(room) else {
        return 0;
    };

    let mut delivered = 0;
    for (client_id, client) in &room_state.clients {
        if client.sid == sender_sid {
            continue;
        }
        match client.tx.try_send(frame.to_owned()) {
            Ok(()) => delivered += 1,
            Err(TrySendError::Full(_)) => debug!(room, %client_id, "outbound queue full; frame dropped"),
            Err(TrySendError::Closed(_)) => debug!(room, %client_id, "outbound queue closed"),
        }
    }
    delivered
}
