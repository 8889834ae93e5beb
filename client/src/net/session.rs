//! Session runtime: one task that owns the sync engine.
//!
//! DESIGN
//! ======
//! The session loop `select!`s over UI commands and transport events and
//! handles each one to completion before the next, which makes it the
//! single writer of the member store. After every step it publishes a
//! [`View`] on a `watch` channel if anything changed.
//!
//! LIFECYCLE
//! =========
//! 1. spawn: start socket driver, build engine, publish initial view
//! 2. mount: `Disconnected -> Connecting`
//! 3. loop: commands and transport events until shutdown
//! 4. teardown: abort the socket driver; nothing is flushed

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use frames::Position;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::{ClientConfig, SessionTag};
use crate::net::connection::{Transport, TransportEvent};
use crate::net::socket::spawn_socket;
use crate::state::store::MemberStore;
use crate::sync::engine::{SyncEngine, View};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session has shut down")]
    Closed,
}

/// Input from the presentation layer.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Drag sample: member `id` is now at `position`.
    Move { id: String, position: Position },
    /// A drag started on member `id`.
    BeginDrag { id: String },
    Shutdown,
}

/// Handle to a running session.
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<View>,
    session_tag: SessionTag,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Forward one drag sample.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] once the session loop has stopped.
    pub fn move_member(&self, id: impl Into<String>, position: Position) -> Result<(), SessionError> {
        self.command(Command::Move { id: id.into(), position })
    }

    /// Signal the start of a drag on `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] once the session loop has stopped.
    pub fn begin_drag(&self, id: impl Into<String>) -> Result<(), SessionError> {
        self.command(Command::BeginDrag { id: id.into() })
    }

    /// Latest published view.
    #[must_use]
    pub fn view(&self) -> View {
        self.view.borrow().clone()
    }

    /// A receiver that wakes on every published view.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<View> {
        self.view.clone()
    }

    #[must_use]
    pub fn session_tag(&self) -> SessionTag {
        self.session_tag
    }

    /// Wait until dragging is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session stops first.
    pub async fn wait_until_unlocked(&mut self) -> Result<View, SessionError> {
        let view = self.view.wait_for(|v| !v.locked()).await.map_err(|_| SessionError::Closed)?;
        Ok(view.clone())
    }

    /// Stop the session and wait for the loop to exit.
    pub async fn shutdown(self) {
        if self.commands.send(Command::Shutdown).is_err() {
            info!("session: already stopped");
        }
        if let Err(e) = self.task.await {
            warn!(error = %e, "session: task ended abnormally");
        }
    }

    fn command(&self, command: Command) -> Result<(), SessionError> {
        self.commands.send(command).map_err(|_| SessionError::Closed)
    }
}

/// Start a session against `config.endpoint()` with the seeded `store`.
///
/// Must be called from within a tokio runtime.
#[must_use]
pub fn spawn_session(config: &ClientConfig, store: MemberStore) -> SessionHandle {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (transport, socket_task) = spawn_socket(config.endpoint(), config.reconnect, event_tx);
    let engine = SyncEngine::new(store, transport);
    let (view_tx, view_rx) = watch::channel(engine.view());
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    info!(endpoint = %config.endpoint(), members = engine.store().len(), "session: starting");
    let task = tokio::spawn(run_session(engine, command_rx, event_rx, view_tx, socket_task));

    SessionHandle { commands: command_tx, view: view_rx, session_tag: config.session_tag, task }
}

async fn run_session<T: Transport>(
    mut engine: SyncEngine<T>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    mut events: mpsc::UnboundedReceiver<TransportEvent>,
    view_tx: watch::Sender<View>,
    socket_task: JoinHandle<()>,
) {
    engine.mount();
    publish(&view_tx, &engine);

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Move { id, position }) => engine.move_member(&id, position),
                Some(Command::BeginDrag { id }) => {
                    engine.begin_drag(&id);
                }
                Some(Command::Shutdown) | None => break,
            },
            event = events.recv() => match event {
                Some(event) => engine.handle_event(event),
                None => {
                    warn!("session: transport stopped");
                    break;
                }
            },
        }
        publish(&view_tx, &engine);
    }

    socket_task.abort();
    info!("session: stopped");
}

fn publish<T: Transport>(view_tx: &watch::Sender<View>, engine: &SyncEngine<T>) {
    view_tx.send_if_modified(|current| {
        let next = engine.view();
        if current.is_same(&next) {
            return false;
        }
        *current = next;
        true
    });
}
