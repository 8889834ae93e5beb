//! Transport connection manager: lifecycle state machine and send gate.
//!
//! SYSTEM CONTEXT
//! ==============
//! One persistent duplex connection per session. The transport collaborator
//! (see `net::socket`) owns the socket, retries, and reports lifecycle
//! events; this module only tracks where the connection is and derives the
//! `locked` flag renderers use to disable dragging.
//!
//! ```text
//! Disconnected --mount/Connecting--> Connecting --Open--> Connected
//! Connected --Close--> Disconnected
//! Connecting | Connected --Error--> Faulted --Connecting--> Connecting
//! ```
//!
//! ERROR HANDLING
//! ==============
//! Transport errors are logged and folded into `Faulted`; nothing is raised
//! to callers. Sends outside `Connected` are refused, never queued.

#[cfg(test)]
#[path = "connection_test.rs"]
mod connection_test;

#[cfg(test)]
#[path = "transport_helpers_test.rs"]
pub(crate) mod test_helpers;

use tracing::{debug, info, warn};

/// Connection lifecycle state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// No socket; initial state and state after a clean close.
    #[default]
    Disconnected,
    /// Handshake in progress.
    Connecting,
    /// Socket open; the only state where dragging is enabled.
    Connected,
    /// Transport reported an error; waiting for the collaborator to retry.
    Faulted,
}

impl ConnectionState {
    /// Interactivity gate: true in every state except `Connected`.
    #[must_use]
    pub fn is_locked(self) -> bool {
        self != Self::Connected
    }
}

/// Event reported by the transport collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent {
    /// A connection attempt has started.
    Connecting,
    /// The socket is open.
    Open,
    /// The socket closed.
    Close,
    /// The transport failed; the reason is for logging only.
    Error(String),
    /// One inbound text frame.
    Message(String),
}

/// Error returned by [`Transport::send`] and [`ConnectionManager::send`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SendError {
    /// The connection is not in the `Connected` state.
    #[error("connection is not open (state: {0:?})")]
    NotConnected(ConnectionState),
    /// The transport has shut down.
    #[error("transport closed")]
    Closed,
}

/// Send capability of the transport collaborator.
pub trait Transport: Send {
    /// Hand one JSON text frame to the transport. Best effort, no acknowledgment.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Closed`] when the transport can no longer accept frames.
    fn send(&mut self, text: String) -> Result<(), SendError>;
}

/// Owns the transport and the lifecycle state.
pub struct ConnectionManager<T> {
    state: ConnectionState,
    transport: T,
}

impl<T: Transport> ConnectionManager<T> {
    pub fn new(transport: T) -> Self {
        Self { state: ConnectionState::Disconnected, transport }
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    #[must_use]
    pub fn locked(&self) -> bool {
        self.state.is_locked()
    }

    /// System start: `Disconnected -> Connecting`. Other states are left alone.
    pub fn mount(&mut self) -> bool {
        if self.state != ConnectionState::Disconnected {
            return false;
        }
        self.transition(ConnectionState::Connecting)
    }

    /// Apply a lifecycle event. Returns true if the state changed.
    ///
    /// `Message` events carry no lifecycle meaning and are ignored here.
    pub fn handle(&mut self, event: &TransportEvent) -> bool {
        match event {
            TransportEvent::Connecting => self.transition(ConnectionState::Connecting),
            TransportEvent::Open => self.transition(ConnectionState::Connected),
            TransportEvent::Close => {
                // A close that follows an error keeps the fault visible until the retry starts.
                if self.state == ConnectionState::Faulted {
                    return false;
                }
                self.transition(ConnectionState::Disconnected)
            }
            TransportEvent::Error(reason) => {
                warn!(state = ?self.state, %reason, "connection: transport error");
                self.transition(ConnectionState::Faulted)
            }
            TransportEvent::Message(_) => false,
        }
    }

    /// Send one frame if connected.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::NotConnected`] outside `Connected`, or whatever
    /// the transport reports. Callers log and drop; there is no retry.
    pub fn send(&mut self, text: String) -> Result<(), SendError> {
        if self.state != ConnectionState::Connected {
            return Err(SendError::NotConnected(self.state));
        }
        self.transport.send(text)
    }

    fn transition(&mut self, next: ConnectionState) -> bool {
        if self.state == next {
            return false;
        }
        let prev = std::mem::replace(&mut self.state, next);
        if next.is_locked() == prev.is_locked() {
            debug!(from = ?prev, to = ?next, "connection: state change");
        } else {
            info!(from = ?prev, to = ?next, locked = next.is_locked(), "connection: state change");
        }
        true
    }
}
