use super::test_helpers::RecordingTransport;
use super::*;

fn manager() -> (ConnectionManager<RecordingTransport>, RecordingTransport) {
    let transport = RecordingTransport::default();
    (ConnectionManager::new(transport.clone()), transport)
}

fn connected() -> (ConnectionManager<RecordingTransport>, RecordingTransport) {
    let (mut conn, transport) = manager();
    conn.mount();
    conn.handle(&TransportEvent::Open);
    (conn, transport)
}

// =============================================================
// Lifecycle
// =============================================================

#[test]
fn starts_disconnected_and_locked() {
    let (conn, _) = manager();
    assert_eq!(conn.state(), ConnectionState::Disconnected);
    assert!(conn.locked());
}

#[test]
fn mount_enters_connecting() {
    let (mut conn, _) = manager();
    assert!(conn.mount());
    assert_eq!(conn.state(), ConnectionState::Connecting);
    assert!(conn.locked());
    assert!(!conn.mount());
}

#[test]
fn open_unlocks() {
    let (conn, _) = connected();
    assert_eq!(conn.state(), ConnectionState::Connected);
    assert!(!conn.locked());
}

#[test]
fn close_locks_and_disconnects() {
    let (mut conn, _) = connected();
    assert!(conn.handle(&TransportEvent::Close));
    assert_eq!(conn.state(), ConnectionState::Disconnected);
    assert!(conn.locked());
}

#[test]
fn error_faults_from_connecting_and_connected() {
    let (mut conn, _) = manager();
    conn.mount();
    assert!(conn.handle(&TransportEvent::Error("refused".into())));
    assert_eq!(conn.state(), ConnectionState::Faulted);

    let (mut conn, _) = connected();
    assert!(conn.handle(&TransportEvent::Error("reset".into())));
    assert_eq!(conn.state(), ConnectionState::Faulted);
    assert!(conn.locked());
}

#[test]
fn close_after_error_stays_faulted() {
    let (mut conn, _) = connected();
    conn.handle(&TransportEvent::Error("reset".into()));
    assert!(!conn.handle(&TransportEvent::Close));
    assert_eq!(conn.state(), ConnectionState::Faulted);
}

#[test]
fn reconnect_after_fault() {
    let (mut conn, _) = connected();
    conn.handle(&TransportEvent::Error("reset".into()));
    assert!(conn.handle(&TransportEvent::Connecting));
    assert_eq!(conn.state(), ConnectionState::Connecting);
    assert!(conn.handle(&TransportEvent::Open));
    assert!(!conn.locked());
}

#[test]
fn message_events_do_not_change_state() {
    let (mut conn, _) = connected();
    assert!(!conn.handle(&TransportEvent::Message("{}".into())));
    assert_eq!(conn.state(), ConnectionState::Connected);
}

#[test]
fn locked_iff_not_connected_for_all_event_sequences() {
    let events = [
        TransportEvent::Connecting,
        TransportEvent::Open,
        TransportEvent::Close,
        TransportEvent::Error("x".into()),
        TransportEvent::Message("m".into()),
    ];
    // Every sequence of length 4 over the event alphabet.
    for a in &events {
        for b in &events {
            for c in &events {
                for d in &events {
                    let (mut conn, _) = manager();
                    conn.mount();
                    for event in [a, b, c, d] {
                        conn.handle(event);
                        assert_eq!(conn.locked(), conn.state() != ConnectionState::Connected);
                    }
                }
            }
        }
    }
}

// =============================================================
// Send gate
// =============================================================

#[test]
fn send_while_connected_reaches_transport() {
    let (mut conn, transport) = connected();
    conn.send("hello".into()).expect("send");
    assert_eq!(transport.sent(), ["hello"]);
}

#[test]
fn send_while_not_connected_is_dropped() {
    let (mut conn, transport) = manager();
    conn.mount();
    let err = conn.send("early".into()).expect_err("not connected");
    assert_eq!(err, SendError::NotConnected(ConnectionState::Connecting));

    conn.handle(&TransportEvent::Open);
    conn.handle(&TransportEvent::Close);
    assert!(conn.send("late".into()).is_err());
    assert!(transport.sent().is_empty());
}

#[test]
fn send_failure_from_transport_is_reported() {
    let mut conn = ConnectionManager::new(RecordingTransport::closed());
    conn.mount();
    conn.handle(&TransportEvent::Open);
    assert_eq!(conn.send("x".into()), Err(SendError::Closed));
}
