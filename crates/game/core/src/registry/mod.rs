//! Entity-component store.
//!
//! # Architecture
//!
//! - [`EntityId`]: opaque handle, never reused within one registry
//! - [`Storage`]: one component type, with construct/destroy notifications
//! - [`Registry`]: every storage the game uses, plus deferred destruction
//!
//! State components are removed first when an entity is destroyed, so the
//! subscriptions they own are revoked before the components those
//! subscriptions point at disappear.
mod storage;

use std::collections::BTreeSet;
use std::fmt;

use state_machine::StateComponent;
use tracing::debug;

pub use storage::Storage;

use crate::components::{
    Ability, AbilityBar, Animation, Combatant, Equipment, Inventory, ItemData, MoveableActor,
    Transform,
};
use crate::machines::{
    AbilityState, DestinationUnreachableData, GameState, PartyMemberState, WavemobState,
};

/// Unique identifier for an entity in the game world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Default)]
pub struct Registry {
    next_id: u32,
    alive: BTreeSet<EntityId>,
    pending_destroy: BTreeSet<EntityId>,

    pub transforms: Storage<Transform>,
    pub movers: Storage<MoveableActor>,
    pub animations: Storage<Animation>,
    pub combatants: Storage<Combatant>,
    pub inventories: Storage<Inventory>,
    pub equipment: Storage<Equipment>,
    pub items: Storage<ItemData>,
    pub abilities: Storage<Ability>,
    pub ability_bars: Storage<AbilityBar>,
    pub unreachable: Storage<DestinationUnreachableData>,

    pub party_states: Storage<StateComponent<PartyMemberState>>,
    pub wavemob_states: Storage<StateComponent<WavemobState>>,
    pub ability_states: Storage<StateComponent<AbilityState>>,
    pub game_states: Storage<StateComponent<GameState>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.alive.insert(id);
        id
    }

    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.alive.contains(&entity)
    }

    pub fn entity_count(&self) -> usize {
        self.alive.len()
    }

    /// Queues `entity` for destruction at the end of the frame.
    pub fn mark_for_destroy(&mut self, entity: EntityId) {
        if self.is_alive(entity) {
            self.pending_destroy.insert(entity);
        }
    }

    pub fn is_pending_destroy(&self, entity: EntityId) -> bool {
        self.pending_destroy.contains(&entity)
    }

    /// Destroys everything queued by [`mark_for_destroy`](Self::mark_for_destroy).
    pub fn flush_destroyed(&mut self) -> Vec<EntityId> {
        let pending: Vec<_> = std::mem::take(&mut self.pending_destroy).into_iter().collect();
        for &entity in &pending {
            self.destroy(entity);
        }
        pending
    }

    /// Detaches every component of `entity` and retires the id.
    pub fn destroy(&mut self, entity: EntityId) {
        if !self.alive.remove(&entity) {
            return;
        }
        self.pending_destroy.remove(&entity);

        self.party_states.remove(entity);
        self.wavemob_states.remove(entity);
        self.ability_states.remove(entity);
        self.game_states.remove(entity);

        self.unreachable.remove(entity);
        self.ability_bars.remove(entity);
        self.abilities.remove(entity);
        self.items.remove(entity);
        self.equipment.remove(entity);
        self.inventories.remove(entity);
        self.combatants.remove(entity);
        self.animations.remove(entity);
        self.movers.remove(entity);
        self.transforms.remove(entity);

        debug!(target: "game::registry", %entity, "entity destroyed");
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("alive", &self.alive.len())
            .field("pending_destroy", &self.pending_destroy.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    #[test]
    fn destroy_detaches_all_components() {
        let mut registry = Registry::new();
        let entity = registry.create();
        registry.transforms.insert(entity, Transform::at(Vec3::ZERO));
        registry.movers.insert(entity, MoveableActor::new(5.0));

        registry.mark_for_destroy(entity);
        assert!(registry.is_alive(entity));

        assert_eq!(registry.flush_destroyed(), vec![entity]);
        assert!(!registry.is_alive(entity));
        assert!(registry.transforms.get(entity).is_none());
        assert!(registry.movers.get(entity).is_none());
    }

    #[test]
    fn ids_are_not_reused() {
        let mut registry = Registry::new();
        let first = registry.create();
        registry.destroy(first);
        assert_ne!(registry.create(), first);
    }
}
