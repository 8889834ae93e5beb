//! Member state store: the local projection of every draggable icon.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store is the single source of truth for rendering. It is seeded once
//! from the initial roster and afterwards only changes through [`MemberStore::upsert`],
//! driven either by a local drag or by a decoded remote frame.
//!
//! DESIGN
//! ======
//! Snapshots are persistent: `upsert` returns a new store and never touches
//! the old one. Members are held behind `Arc`, so an update copies one pointer
//! vector and allocates one new member; every other entry is shared by
//! reference with the previous snapshot. Renderers can detect change with
//! [`MemberStore::ptr_eq`] and fall back to `==` for structural comparison.
//!
//! The roster is closed: `upsert` on an unknown id returns the same snapshot.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;
use std::sync::Arc;

use frames::Position;
use serde::{Deserialize, Serialize};

/// Error returned when seeding a store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Two roster entries share an id.
    #[error("duplicate member id in roster: {0}")]
    DuplicateMember(String),
}

/// Display identity of a member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    /// Opaque avatar image reference, resolved by the image CDN.
    #[serde(alias = "avatar")]
    pub avatar_ref: String,
}

/// Largest power of two representable as `u32`.
const MAX_AVATAR_SIZE: u32 = 1 << 31;

/// One draggable icon: stable id, identity, canonical position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub identity: Identity,
    pub position: Position,
}

impl Member {
    pub fn new(id: impl Into<String>, identity: Identity, position: Position) -> Self {
        Self { id: id.into(), identity, position }
    }

    /// Avatar image URL for this member at (at least) `size` pixels.
    ///
    /// The CDN only serves power-of-two sizes, so the requested size is rounded up.
    /// Sizes above the largest `u32` power of two are clamped to it.
    #[must_use]
    pub fn avatar_url(&self, base_url: &str, size: u32) -> String {
        let size = size.max(1).checked_next_power_of_two().unwrap_or(MAX_AVATAR_SIZE);
        format!("{base_url}{}/{}.png?size={size}", self.id, self.identity.avatar_ref)
    }
}

/// Ordered, keyed, copy-on-write container of members.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemberStore {
    /// Members in roster order. Never reordered.
    members: Arc<Vec<Arc<Member>>>,
    /// Member id -> index into `members`. Shared by every snapshot of one roster.
    index: Arc<HashMap<String, usize>>,
}

impl MemberStore {
    /// Seed a store from the initial roster, keeping roster order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateMember`] if two entries share an id.
    pub fn from_roster(roster: impl IntoIterator<Item = Member>) -> Result<Self, StoreError> {
        let mut members = Vec::new();
        let mut index = HashMap::new();
        for member in roster {
            if index.contains_key(&member.id) {
                return Err(StoreError::DuplicateMember(member.id));
            }
            index.insert(member.id.clone(), members.len());
            members.push(Arc::new(member));
        }
        Ok(Self { members: Arc::new(members), index: Arc::new(index) })
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Member> {
        let idx = *self.index.get(id)?;
        self.members.get(idx).map(Arc::as_ref)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Return a snapshot where member `id` has `position`.
    ///
    /// The position is replaced wholesale. Unknown ids are a no-op: the
    /// returned snapshot is the same one (`ptr_eq` holds).
    #[must_use]
    pub fn upsert(&self, id: &str, position: Position) -> Self {
        let Some(&idx) = self.index.get(id) else {
            return self.clone();
        };

        let mut members = self.members.as_ref().clone();
        let mut member = members[idx].as_ref().clone();
        member.position = position;
        members[idx] = Arc::new(member);

        Self { members: Arc::new(members), index: Arc::clone(&self.index) }
    }

    /// Members in roster order. Call again to restart.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Member)> + '_ {
        self.members.iter().map(|m| (m.id.as_str(), m.as_ref()))
    }

    /// True when both values are the same snapshot.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.members, &other.members)
    }

    /// True when both snapshots hold the same allocation for member `id`.
    #[must_use]
    pub fn shares_member(&self, other: &Self, id: &str) -> bool {
        let (Some(&a), Some(&b)) = (self.index.get(id), other.index.get(id)) else {
            return false;
        };
        match (self.members.get(a), other.members.get(b)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
