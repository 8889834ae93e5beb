//! Socket driver: the reconnecting transport collaborator.
//!
//! Owns the tokio-tungstenite socket, reconnects with capped exponential
//! backoff, and reports lifecycle events and inbound text frames on a
//! channel. The engine never sees the socket; it only gets a
//! [`SocketTransport`] to hand outbound frames to.
//!
//! Outbound frames queued while no socket is open are discarded right
//! before a new connection is announced, so nothing leaks across a reconnect.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use crate::config::Backoff;
use crate::net::connection::{SendError, Transport, TransportEvent};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Outbound half handed to the engine.
#[derive(Clone, Debug)]
pub struct SocketTransport {
    tx: mpsc::UnboundedSender<String>,
}

impl Transport for SocketTransport {
    fn send(&mut self, text: String) -> Result<(), SendError> {
        self.tx.send(text).map_err(|_| SendError::Closed)
    }
}

/// How one connection ended.
enum Exit {
    /// Peer closed or the stream ended.
    Closed,
    /// Read or write failed.
    Failed(String),
    /// The engine dropped its transport; stop reconnecting.
    Shutdown,
}

/// Spawn the socket driver for `url`.
///
/// Returns the outbound transport and the driver task. The task stops when
/// the event receiver or every [`SocketTransport`] clone is dropped.
pub fn spawn_socket(
    url: String,
    backoff: Backoff,
    events: mpsc::UnboundedSender<TransportEvent>,
) -> (SocketTransport, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel::<String>();
    let task = tokio::spawn(run_socket(url, backoff, events, rx));
    (SocketTransport { tx }, task)
}

async fn run_socket(
    url: String,
    backoff: Backoff,
    events: mpsc::UnboundedSender<TransportEvent>,
    mut outbound: mpsc::UnboundedReceiver<String>,
) {
    let mut delay = backoff.min;

    loop {
        if events.send(TransportEvent::Connecting).is_err() {
            return;
        }

        match connect_async(url.as_str()).await {
            Ok((stream, _response)) => {
                delay = backoff.min;
                if discard_stale(&mut outbound) {
                    return;
                }
                info!(%url, "socket: connected");
                if events.send(TransportEvent::Open).is_err() {
                    return;
                }

                let exit = pump(stream, &events, &mut outbound).await;
                let report = match exit {
                    Exit::Closed => events.send(TransportEvent::Close),
                    Exit::Failed(reason) => events
                        .send(TransportEvent::Error(reason))
                        .and_then(|()| events.send(TransportEvent::Close)),
                    Exit::Shutdown => return,
                };
                if report.is_err() {
                    return;
                }
            }
            Err(e) => {
                warn!(%url, error = %e, "socket: connect failed");
                if events.send(TransportEvent::Error(e.to_string())).is_err() {
                    return;
                }
            }
        }

        debug!(delay_ms = delay.as_millis(), "socket: reconnecting after backoff");
        if sleep_or_shutdown(delay, &events).await {
            return;
        }
        delay = backoff.next(delay);
    }
}

/// Drain frames queued while disconnected. Returns true if the engine is gone.
fn discard_stale(outbound: &mut mpsc::UnboundedReceiver<String>) -> bool {
    let mut dropped = 0_usize;
    loop {
        match outbound.try_recv() {
            Ok(_) => dropped += 1,
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => return true,
        }
    }
    if dropped > 0 {
        debug!(dropped, "socket: discarded frames queued while disconnected");
    }
    false
}

/// Wait out the backoff, returning early (true) if the engine goes away.
async fn sleep_or_shutdown(delay: Duration, events: &mpsc::UnboundedSender<TransportEvent>) -> bool {
    tokio::select! {
        () = tokio::time::sleep(delay) => false,
        () = events.closed() => true,
    }
}

/// Move frames both ways until the connection ends.
async fn pump(
    stream: Socket,
    events: &mpsc::UnboundedSender<TransportEvent>,
    outbound: &mut mpsc::UnboundedReceiver<String>,
) -> Exit {
    let (mut write, mut read) = stream.split();

    loop {
        tokio::select! {
            msg = read.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    if events.send(TransportEvent::Message(text.as_str().to_owned())).is_err() {
                        return Exit::Shutdown;
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    debug!(?frame, "socket: peer closed");
                    return Exit::Closed;
                }
                Some(Ok(Message::Binary(bytes))) => {
                    debug!(len = bytes.len(), "socket: ignoring binary frame");
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Exit::Failed(e.to_string()),
                None => return Exit::Closed,
            },
            text = outbound.recv() => match text {
                Some(text) => {
                    if let Err(e) = write.send(Message::Text(text.into())).await {
                        return Exit::Failed(e.to_string());
                    }
                }
                None => {
                    if let Err(e) = write.send(Message::Close(None)).await {
                        debug!(error = %e, "socket: close on shutdown failed");
                    }
                    return Exit::Shutdown;
                }
            },
        }
    }
}
