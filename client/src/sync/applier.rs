//! Remote update applier: inbound text frames merged into the store.
//!
//! Decode failures are dropped and logged. Unknown members fall through to
//! the store's no-op policy. Nothing received here is ever re-sent.

#[cfg(test)]
#[path = "applier_test.rs"]
mod applier_test;

use tracing::{debug, warn};

use crate::state::store::MemberStore;

/// Longest slice of a rejected frame written to the log.
const LOG_PREVIEW_CHARS: usize = 120;

/// Decode one inbound frame and apply it.
#[must_use]
pub fn apply_remote_frame(store: &MemberStore, text: &str) -> MemberStore {
    let frame = match frames::decode(text) {
        Ok(frame) => frame,
        Err(e) => {
            warn!(error = %e, frame = %preview(text), "remote: dropping undecodable frame");
            return store.clone();
        }
    };

    if !store.contains(&frame.id) {
        debug!(id = %frame.id, "remote: ignoring move for unknown member");
    }
    store.upsert(&frame.id, frame.position)
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(LOG_PREVIEW_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
