//! Shared relay state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the relay configuration and a map of live rooms. A room exists only
//! while at least one connection is in it; each connection is stored with its
//! session tag and the sending half of its outbound queue.
//!
//! Room records created through the HTTP API (background image and icon
//! size) live in a separate map keyed by room id. They are kept in memory
//! only and are lost on restart.
//!
//! A `watch` flag tells every open socket loop that the server is shutting
//! down, so each one can send a going-away close frame before it exits.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{RwLock, mpsc, watch};
use uuid::Uuid;

use crate::config::RelayConfig;

// =============================================================================
// ROOM STATE
// =============================================================================

/// One live websocket connection.
#[derive(Debug, Clone)]
pub struct ConnectedClient {
    /// Session tag from the `sid` query parameter.
    pub sid: u32,
    pub tx: mpsc::Sender<String>,
}

/// Connections currently joined to one room, keyed by connection id.
#[derive(Debug, Default)]
pub struct RoomState {
    pub clients: HashMap<Uuid, ConnectedClient>,
}

/// Icon size, in pixels, given to rooms created without one.
pub const DEFAULT_ICON_SIZE: u32 = 128;

/// Room record returned by `GET /api/v1/room/{room}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomMeta {
    /// Background image URL.
    pub image: String,
    /// Icon size in pixels.
    pub size: u32,
}

// =============================================================================
// APP STATE
// =============================================================================

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub rooms: Arc<RwLock<HashMap<String, RoomState>>>,
    pub room_meta: Arc<RwLock<HashMap<Uuid, RoomMeta>>>,
    shutdown: Arc<watch::Sender<bool>>,
}

impl AppState {
    #[must_use]
    pub fn new(config: RelayConfig) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            config: Arc::new(config),
            rooms: Arc::new(RwLock::new(HashMap::new())),
            room_meta: Arc::new(RwLock::new(HashMap::new())),
            shutdown: Arc::new(shutdown),
        }
    }

    /// Tell every open socket loop to close. Idempotent.
    pub fn begin_shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    /// Receiver that observes [`AppState::begin_shutdown`].
    #[must_use]
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    /// Room every new connection joins.
    #[must_use]
    pub fn room(&self) -> &str {
        &self.config.room
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
