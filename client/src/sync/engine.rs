//! Sync engine: the one owner of the member store.
//!
//! DESIGN
//! ======
//! Every mutation (local move, remote frame, lifecycle event) goes through
//! `&mut self`, so whoever holds the engine is the single writer. The async
//! session loop owns it and feeds it one event at a time; tests drive it
//! directly with a recording transport.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use frames::Position;

use crate::net::connection::{ConnectionManager, ConnectionState, Transport, TransportEvent};
use crate::state::render_order::RenderOrder;
use crate::state::store::MemberStore;
use crate::sync::{applier, controller};

/// Everything a presentation layer needs to draw one frame.
#[derive(Clone, Debug, Default)]
pub struct View {
    pub store: MemberStore,
    pub render_order: RenderOrder,
    pub state: ConnectionState,
}

impl View {
    /// True while dragging must be disabled.
    #[must_use]
    pub fn locked(&self) -> bool {
        self.state.is_locked()
    }

    /// Cheap change check: snapshot identity for the store, value equality for the rest.
    #[must_use]
    pub fn is_same(&self, other: &Self) -> bool {
        self.store.ptr_eq(&other.store) && self.state == other.state && self.render_order == other.render_order
    }
}

pub struct SyncEngine<T> {
    store: MemberStore,
    render_order: RenderOrder,
    connection: ConnectionManager<T>,
}

impl<T: Transport> SyncEngine<T> {
    pub fn new(store: MemberStore, transport: T) -> Self {
        let render_order = RenderOrder::from_store(&store);
        Self { store, render_order, connection: ConnectionManager::new(transport) }
    }

    /// System start.
    pub fn mount(&mut self) -> bool {
        self.connection.mount()
    }

    /// Local drag sample for member `id`, already resolved to an absolute position.
    pub fn move_member(&mut self, id: &str, position: Position) {
        self.store = controller::apply_local_move(&self.store, &mut self.connection, id, position);
    }

    /// A drag started on `id`: draw it above everyone else.
    pub fn begin_drag(&mut self, id: &str) -> bool {
        self.render_order.raise(id)
    }

    /// Apply one transport event: lifecycle changes go to the connection
    /// manager, inbound frames to the applier.
    pub fn handle_event(&mut self, event: TransportEvent) {
        if let TransportEvent::Message(text) = &event {
            self.store = applier::apply_remote_frame(&self.store, text);
        } else {
            self.connection.handle(&event);
        }
    }

    #[must_use]
    pub fn store(&self) -> &MemberStore {
        &self.store
    }

    #[must_use]
    pub fn render_order(&self) -> &RenderOrder {
        &self.render_order
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    #[must_use]
    pub fn locked(&self) -> bool {
        self.connection.locked()
    }

    #[must_use]
    pub fn view(&self) -> View {
        View { store: self.store.clone(), render_order: self.render_order.clone(), state: self.state() }
    }
}
