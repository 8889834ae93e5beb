//! Position-synchronization client for the shared avatar field.
//!
//! Several viewers see the same set of labeled icons over one background;
//! each viewer's drags are replicated to everyone else through the relay.
//!
//! SYSTEM CONTEXT
//! ==============
//! - [`state::store`]: ordered, copy-on-write member store (render source of truth)
//! - [`sync::controller`]: local drag -> optimistic upsert + outbound frame
//! - [`net::connection`]: lifecycle state machine and the `locked` gate
//! - [`sync::applier`]: inbound frame -> upsert
//! - [`net::socket`] / [`net::session`]: tokio runtime around the engine
//!
//! Presentation layers consume [`View`]: the store's entries, a render order,
//! and the locked flag. Everything else (drawing, pointer capture, menus) is
//! outside this crate.
//!
//! ERROR HANDLING
//! ==============
//! Connection faults, undecodable frames, unknown members and failed sends
//! are all logged and absorbed. The worst case is a locked, read-only view.

pub mod config;
pub mod net;
pub mod state;
pub mod sync;

pub use config::{Backoff, ClientConfig, SessionTag};
pub use frames::{MoveFrame, Position};
pub use net::connection::{ConnectionManager, ConnectionState, SendError, Transport, TransportEvent};
pub use net::session::{Command, SessionError, SessionHandle, spawn_session};
pub use state::render_order::RenderOrder;
pub use state::roster::{RosterError, load_roster, parse_roster};
pub use state::store::{Identity, Member, MemberStore, StoreError};
pub use sync::engine::{SyncEngine, View};
