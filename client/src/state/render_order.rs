//! Render order: transient bring-to-front stacking, kept apart from the store.
//!
//! The store's key order is fixed at roster order. When a member is picked up
//! it should draw above its neighbours; that is a presentation concern, so it
//! lives here as a separate list of ids that renderers walk bottom to top.

#[cfg(test)]
#[path = "render_order_test.rs"]
mod render_order_test;

use crate::state::store::MemberStore;

/// Bottom-to-top drawing order of member ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderOrder {
    ids: Vec<String>,
}

impl RenderOrder {
    /// Initial order: roster order, first member at the bottom.
    #[must_use]
    pub fn from_store(store: &MemberStore) -> Self {
        Self { ids: store.entries().map(|(id, _)| id.to_owned()).collect() }
    }

    /// Move `id` to the top. Returns false for unknown ids or when it is already on top.
    pub fn raise(&mut self, id: &str) -> bool {
        let Some(pos) = self.ids.iter().position(|existing| existing == id) else {
            return false;
        };
        if pos + 1 == self.ids.len() {
            return false;
        }
        let raised = self.ids.remove(pos);
        self.ids.push(raised);
        true
    }

    /// Ids from bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.ids.iter().map(String::as_str)
    }

    #[must_use]
    pub fn top(&self) -> Option<&str> {
        self.ids.last().map(String::as_str)
    }
}
