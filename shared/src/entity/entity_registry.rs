use std::collections::{hash_map, HashMap};

use crate::EntityId;

/// Arena of live actors keyed by [`EntityId`].
///
/// Ids come from a monotonically increasing counter, so removing an entry
/// never lets a later insert alias it.
pub struct EntityRegistry<T> {
    current_index: u64,
    inner: HashMap<EntityId, T>,
}

impl<T> Default for EntityRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EntityRegistry<T> {
    pub fn new() -> Self {
        Self {
            current_index: 0,
            inner: HashMap::new(),
        }
    }

    pub fn insert(&mut self, value: T) -> EntityId {
        self.current_index = self.current_index.wrapping_add(1);
        let id = EntityId::from_u64(self.current_index);
        self.inner.insert(id, value);
        id
    }

    pub fn get(&self, id: &EntityId) -> Option<&T> {
        self.inner.get(id)
    }

    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut T> {
        self.inner.get_mut(id)
    }

    pub fn remove(&mut self, id: &EntityId) -> Option<T> {
        self.inner.remove(id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.inner.contains_key(id)
    }

    pub fn iter(&self) -> hash_map::Iter<'_, EntityId, T> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
