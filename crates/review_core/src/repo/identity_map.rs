//! Repository-owned identity map.
//!
//! # Invariants
//! - At most one canonical value per row id.
//! - Only ids handed out by a successful insert are registered.
//! - The map is never reconciled with writes made outside its repository.

use std::collections::HashMap;

/// Mapping from persisted row id to the canonical in-memory value.
#[derive(Debug, Clone)]
pub struct IdentityMap<T> {
    entries: HashMap<i64, T>,
}

impl<T> Default for IdentityMap<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> IdentityMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `value` as canonical for `id`, returning the replaced value.
    pub fn register(&mut self, id: i64, value: T) -> Option<T> {
        self.entries.insert(id, value)
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut T> {
        self.entries.get_mut(&id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.entries.contains_key(&id)
    }

    /// Removes and returns the canonical value for `id`.
    pub fn evict(&mut self, id: i64) -> Option<T> {
        self.entries.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.entries.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
