//! Initial roster loading.
//!
//! The roster is a JSON array of member records. Two entry shapes are
//! accepted: the canonical `{id, identity: {username, avatar_ref}, position}`
//! and the older `{user: {id, username, avatar}, position}` export.

#[cfg(test)]
#[path = "roster_test.rs"]
mod roster_test;

use std::path::Path;

use frames::Position;
use serde::Deserialize;

use crate::state::store::{Identity, Member, MemberStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to read roster {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("invalid roster json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RosterEntry {
    Member(Member),
    Legacy { user: LegacyUser, position: Position },
}

#[derive(Deserialize)]
struct LegacyUser {
    id: String,
    username: String,
    #[serde(default)]
    avatar: String,
}

impl From<RosterEntry> for Member {
    fn from(entry: RosterEntry) -> Self {
        match entry {
            RosterEntry::Member(member) => member,
            RosterEntry::Legacy { user, position } => Member::new(
                user.id,
                Identity { username: user.username, avatar_ref: user.avatar },
                position,
            ),
        }
    }
}

/// Parse roster JSON and seed a store.
///
/// # Errors
///
/// Returns [`RosterError::Json`] for malformed input (including entries with
/// no position) and [`RosterError::Store`] for duplicate ids.
pub fn parse_roster(text: &str) -> Result<MemberStore, RosterError> {
    let entries: Vec<RosterEntry> = serde_json::from_str(text)?;
    Ok(MemberStore::from_roster(entries.into_iter().map(Member::from))?)
}

/// Read a roster file and seed a store.
///
/// # Errors
///
/// Returns [`RosterError::Io`] if the file cannot be read, otherwise the same
/// errors as [`parse_roster`].
pub fn load_roster(path: &Path) -> Result<MemberStore, RosterError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| RosterError::Io { path: path.display().to_string(), source })?;
    parse_roster(&text)
}
