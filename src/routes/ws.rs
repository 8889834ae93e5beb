//! WebSocket handler: move-frame relay.
//!
//! DESIGN
//! ======
//! On upgrade, generates a connection id, joins the configured room and
//! enters a `select!` loop:
//! - Incoming client text → decode, re-encode canonically, fan out to peers
//! - Frames queued by peers → forward to this client
//!
//! The session tag arrives only as the `sid` query parameter. Frames carry no
//! tag of their own; any `sid` field a legacy sender attaches is ignored by
//! the decoder and stripped by re-encoding.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade (400 `missing SID` when `sid` is absent or not an integer)
//! 2. Join room
//! 3. Relay until the socket closes or errors, or the server shuts down
//!    (the client then gets a 1001 going-away close frame)
//! 4. Part room (evicting it when empty)

#[cfg(test)]
#[path = "ws_test.rs"]
mod ws_test;

use std::collections::HashMap;

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::services;
use crate::state::AppState;

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Response {
    let Some(sid) = parse_sid(&params) else {
        return (StatusCode::BAD_REQUEST, "missing SID").into_response();
    };

    ws.on_upgrade(move |socket| run_ws(socket, state, sid))
}

fn parse_sid(params: &HashMap<String, String>) -> Option<u32> {
    let raw = params.get("sid")?;
    match raw.trim().parse() {
        Ok(sid) => Some(sid),
        Err(_) => None,
    }
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState, sid: u32) {
    let client_id = Uuid::new_v4();
    let room = state.room().to_owned();

    // Per-connection queue for frames fanned out by peers.
    let (client_tx, mut client_rx) = mpsc::channel::<String>(state.config.client_buffer);
    let mut shutdown = state.shutdown_signal();
    services::relay::join_room(&state, &room, client_id, sid, client_tx).await;

    let mut stopping = *shutdown.borrow_and_update();
    while !stopping {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let msg = match msg {
                    Ok(msg) => msg,
                    Err(e) => {
                        debug!(%client_id, error = %e, "ws: receive failed");
                        break;
                    }
                };
                match msg {
                    Message::Text(text) => {
                        relay_text(&state, &room, client_id, sid, text.as_str()).await;
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(frame) = client_rx.recv() => {
                if let Err(e) = socket.send(Message::Text(frame.into())).await {
                    debug!(%client_id, error = %e, "ws: send failed");
                    break;
                }
            }
            changed = shutdown.changed() => {
                // A dropped sender means the state is gone too; close either way.
                stopping = changed.is_err() || *shutdown.borrow_and_update();
            }
        }
    }

    if stopping {
        close_going_away(&mut socket, client_id).await;
    }

    services::relay::part_room(&state, &room, client_id).await;
    info!(%client_id, sid, "ws: client disconnected");
}

async fn close_going_away(socket: &mut WebSocket, client_id: Uuid) {
    let frame = CloseFrame { code: close_code::AWAY, reason: String::from("server-shutdown").into() };
    if let Err(e) = socket.send(Message::Close(Some(frame))).await {
        debug!(%client_id, error = %e, "ws: close on shutdown failed");
    }
}

// =============================================================================
// FRAME RELAY
// =============================================================================

/// Validate one inbound frame and fan it out. Returns how many peers it was
/// queued for; malformed frames are logged and reach nobody.
async fn relay_text(state: &AppState, room: &str, client_id: Uuid, sid: u32, text: &str) -> usize {
    let frame = match frames::decode(text) {
        Ok(frame) => frame,
        Err(e) => {
            warn!(%client_id, sid, error = %e, "ws: dropping malformed frame");
            return 0;
        }
    };
    let canonical = match frames::encode(&frame) {
        Ok(canonical) => canonical,
        Err(e) => {
            warn!(%client_id, sid, id = %frame.id, error = %e, "ws: frame failed to re-encode");
            return 0;
        }
    };

    let delivered = services::relay::broadcast(state, room, &canonical, sid).await;
    debug!(%client_id, sid, id = %frame.id, delivered, "ws: relayed move");
    delivered
}
