//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The relay exposes the websocket upgrade at `/ws`, the room API under
//! `/api/v1/room/` and a liveness probe at `/healthz`. All of them share the
//! room maps carried in `AppState`.

pub mod rooms;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full relay router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws::handle_ws))
        .route("/api/v1/room/", post(rooms::create_room))
        .route("/api/v1/room/{room}", get(rooms::get_room))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
