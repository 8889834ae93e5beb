//! Position update controller: local drag samples, applied optimistically.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use frames::{MoveFrame, Position};
use tracing::{debug, warn};

use crate::net::connection::{ConnectionManager, Transport};
use crate::state::store::MemberStore;

/// Apply a local move and propagate it.
///
/// The store update happens first, so the local view never lags its own
/// edit. The outbound frame is fire-and-forget: a refused or failed send is
/// logged and dropped. No locking check happens here; renderers disable
/// dragging while the connection is locked.
pub fn apply_local_move<T: Transport>(
    store: &MemberStore,
    connection: &mut ConnectionManager<T>,
    id: &str,
    position: Position,
) -> MemberStore {
    let next = store.upsert(id, position);

    let frame = MoveFrame::new(id, position);
    match frames::encode(&frame) {
        Ok(text) => {
            if let Err(e) = connection.send(text) {
                debug!(%id, error = %e, "move: outbound frame dropped");
            }
        }
        Err(e) => warn!(%id, error = %e, "move: failed to encode frame"),
    }

    next
}
