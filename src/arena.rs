//! Stable [`NodeId`] handles for host-owned objects.
//!
//! Handles are never reused: once an entry is released its id stays unknown,
//! so a stale handle (say, a notification removal that fires late) can never
//! address a newer element. Storage only holds live entries.

#[cfg(test)]
#[path = "arena_test.rs"]
mod arena_test;

use std::collections::HashMap;

use crate::markup::NodeId;

pub struct Arena<T> {
    live: HashMap<NodeId, T>,
    next: u32,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { live: HashMap::new(), next: 0 }
    }

    /// Handle for `item`, reusing the id of a live entry that `same` matches.
    pub fn intern(&mut self, item: T, same: impl Fn(&T, &T) -> bool) -> NodeId {
        if let Some(id) = self.live.iter().find_map(|(id, known)| same(known, &item).then_some(*id)) {
            return id;
        }
        let id = NodeId(self.next);
        self.next = self.next.wrapping_add(1);
        self.live.insert(id, item);
        id
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.live.get(&id)
    }

    /// Forget `id`. Later lookups of it fail.
    pub fn release(&mut self, id: NodeId) -> Option<T> {
        self.live.remove(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
