use std::collections::BTreeMap;

use event_bus::Event;

use super::EntityId;

/// One component type keyed by entity, with attach/detach notifications.
///
/// `on_construct` fires after the value is stored. `on_destroy` fires while
/// the value is still present so listeners can inspect it one last time.
pub struct Storage<T> {
    items: BTreeMap<EntityId, T>,
    on_construct: Event<EntityId>,
    on_destroy: Event<EntityId>,
}

impl<T> Storage<T> {
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
            on_construct: Event::new(),
            on_destroy: Event::new(),
        }
    }

    /// Attaches `value`, replacing (and destroying) any previous one.
    pub fn insert(&mut self, entity: EntityId, value: T) -> Option<T> {
        let previous = self.remove(entity);
        self.items.insert(entity, value);
        self.on_construct.publish(&entity);
        previous
    }

    pub fn remove(&mut self, entity: EntityId) -> Option<T> {
        if !self.items.contains_key(&entity) {
            return None;
        }
        self.on_destroy.publish(&entity);
        self.items.remove(&entity)
    }

    pub fn get(&self, entity: EntityId) -> Option<&T> {
        self.items.get(&entity)
    }

    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut T> {
        self.items.get_mut(&entity)
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.items.contains_key(&entity)
    }

    /// Entity ids in ascending order.
    pub fn entities(&self) -> Vec<EntityId> {
        self.items.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.items.iter().map(|(id, value)| (*id, value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.items.iter_mut().map(|(id, value)| (*id, value))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn on_construct(&self) -> &Event<EntityId> {
        &self.on_construct
    }

    pub fn on_destroy(&self) -> &Event<EntityId> {
        &self.on_destroy
    }
}

impl<T> Default for Storage<T> {
    fn default() -> Self {
        Self::new()
    }
}
