//! The world the state machines run against.

use tracing::debug;

use crate::components::{
    AnimationKind, AttackData, EquipmentError, EquipmentSlotName, InventoryError,
};
use crate::config::GameConfig;
use crate::math::Vec3;
use crate::registry::{EntityId, Registry};
use crate::systems::{MovementError, Systems};

/// Entity store plus world-level services.
///
/// Helpers here split-borrow the two halves so that state handlers, which
/// only receive `&mut GameWorld`, can drive systems that mutate the registry.
#[derive(Default)]
pub struct GameWorld {
    pub registry: Registry,
    pub systems: Systems,
}

impl GameWorld {
    pub fn new(config: GameConfig) -> Self {
        Self {
            registry: Registry::new(),
            systems: Systems::new(config),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.systems.config
    }

    pub fn now(&self) -> f64 {
        self.systems.clock.now()
    }

    /// Advances the clock, movement and animations. State machines run after.
    pub fn tick(&mut self, dt: f32) {
        self.systems.clock.advance(dt);
        self.systems.movement.update(&mut self.registry, dt);
        self.systems.update_animations(&mut self.registry);
    }

    pub fn position(&self, entity: EntityId) -> Option<Vec3> {
        self.registry.transforms.get(entity).map(|t| t.position)
    }

    pub fn distance(&self, a: EntityId, b: EntityId) -> Option<f32> {
        Some(self.position(a)?.distance(self.position(b)?))
    }

    pub fn is_moving(&self, entity: EntityId) -> bool {
        self.registry
            .movers
            .get(entity)
            .is_some_and(|mover| mover.is_moving())
    }

    pub fn pathfind_to_location(
        &mut self,
        entity: EntityId,
        destination: Vec3,
    ) -> Result<(), MovementError> {
        self.systems
            .movement
            .pathfind_to_location(&mut self.registry, entity, destination)
    }

    pub fn try_pathfind_to_location(&mut self, entity: EntityId, destination: Vec3) -> bool {
        self.systems
            .movement
            .try_pathfind_to_location(&mut self.registry, entity, destination)
    }

    pub fn cancel_movement(&mut self, entity: EntityId) {
        self.systems.movement.cancel_movement(&mut self.registry, entity);
    }

    pub fn set_animation(&mut self, entity: EntityId, kind: AnimationKind) {
        if let Some(animation) = self.registry.animations.get_mut(entity) {
            animation.change(kind);
        }
    }

    pub fn set_actor_target(&mut self, entity: EntityId, target: Option<EntityId>) {
        if let Some(mover) = self.registry.movers.get_mut(entity) {
            mover.actor_target = target;
        }
    }

    pub fn actor_target(&self, entity: EntityId) -> Option<EntityId> {
        self.registry.movers.get(entity)?.actor_target
    }

    pub fn has_line_of_sight(&self, from: EntityId, to: EntityId) -> bool {
        match (self.position(from), self.position(to)) {
            (Some(a), Some(b)) => self.systems.sight.has_line_of_sight(a, b),
            _ => false,
        }
    }

    /// Applies damage and publishes `on_hit`, then `on_death` for the killing
    /// blow. Hits on dying or missing combatants are ignored.
    pub fn apply_attack(&mut self, attack: AttackData) {
        let Some(target) = self.registry.combatants.get_mut(attack.hit) else {
            return;
        };
        if target.dying {
            return;
        }
        let killed = target.take_damage(attack.damage);
        debug!(
            target: "game::combat",
            attacker = %attack.attacker,
            hit = %attack.hit,
            damage = attack.damage,
            hp = target.hp,
            "attack resolved"
        );
        target.on_hit.publish(&attack);
        if killed {
            target.on_death.publish(&attack.hit);
        }
    }

    /// Places `item` on the ground at `point` if it is within drop range of
    /// `owner`, taking it out of the owner's inventory slot.
    pub fn drop_item_in_world(
        &mut self,
        owner: EntityId,
        slot: (usize, usize),
        point: Vec3,
    ) -> Result<EntityId, MovementError> {
        self.check_drop_range(owner, point)?;
        let item = self
            .registry
            .inventories
            .get_mut(owner)
            .and_then(|inventory| inventory.remove(slot.0, slot.1).ok().flatten())
            .ok_or(MovementError::NotMoveable { entity: owner })?;
        self.registry
            .transforms
            .insert(item, crate::components::Transform::at(point));
        if let Some(inventory) = self.registry.inventories.get(owner) {
            inventory.on_updated.publish(&owner);
        }
        debug!(target: "game::items", %owner, %item, ?point, "item dropped in world");
        Ok(item)
    }

    /// Places the item `owner` wears at `slot` on the ground at `point`.
    pub fn drop_worn_item_in_world(
        &mut self,
        owner: EntityId,
        slot: EquipmentSlotName,
        point: Vec3,
    ) -> Result<EntityId, MovementError> {
        self.check_drop_range(owner, point)?;
        let equipment = self
            .registry
            .equipment
            .get_mut(owner)
            .ok_or(MovementError::NotMoveable { entity: owner })?;
        let item = equipment
            .clear(slot)
            .ok_or(MovementError::NotMoveable { entity: owner })?;
        equipment.on_updated.publish(&owner);
        self.registry
            .transforms
            .insert(item, crate::components::Transform::at(point));
        debug!(target: "game::items", %owner, %item, ?point, "worn item dropped in world");
        Ok(item)
    }

    fn check_drop_range(&self, owner: EntityId, point: Vec3) -> Result<(), MovementError> {
        let origin = self
            .position(owner)
            .ok_or(MovementError::NotMoveable { entity: owner })?;
        let distance = origin.distance(point);
        let range = self.config().item_drop_range;
        if distance > range {
            return Err(MovementError::OutOfRange { distance, range });
        }
        Ok(())
    }

    /// Moves an inventory item of `from` into the first free slot of `to`.
    pub fn transfer_item(
        &mut self,
        from: EntityId,
        slot: (usize, usize),
        to: EntityId,
    ) -> Result<(usize, usize), InventoryError> {
        let item = self
            .registry
            .inventories
            .get(from)
            .ok_or(InventoryError::MissingInventory(from))?
            .get(slot.0, slot.1)?;
        let Some(item) = item else {
            return Err(InventoryError::EmptySlot {
                row: slot.0,
                col: slot.1,
            });
        };
        let target = self
            .registry
            .inventories
            .get_mut(to)
            .ok_or(InventoryError::MissingInventory(to))?;
        let placed = match target.add_item(item) {
            Ok(placed) => placed,
            Err(err) => {
                target.on_inventory_full.publish(&to);
                return Err(err);
            }
        };
        target.on_updated.publish(&to);
        if let Some(source) = self.registry.inventories.get_mut(from) {
            source.remove(slot.0, slot.1)?;
            source.on_updated.publish(&from);
        }
        Ok(placed)
    }

    /// Wears the item in inventory `slot` of `actor` at `target`. Whatever was
    /// worn there takes the item's place in the inventory.
    pub fn equip_from_inventory(
        &mut self,
        actor: EntityId,
        slot: (usize, usize),
        target: EquipmentSlotName,
    ) -> Result<(), EquipmentError> {
        let inventory = self
            .registry
            .inventories
            .get(actor)
            .ok_or(InventoryError::MissingInventory(actor))?;
        let item = inventory.get(slot.0, slot.1)?.ok_or(InventoryError::EmptySlot {
            row: slot.0,
            col: slot.1,
        })?;
        self.check_wearable(item, target)?;
        let equipment = self
            .registry
            .equipment
            .get_mut(actor)
            .ok_or(EquipmentError::MissingEquipment(actor))?;
        let previous = equipment.set(target, item);
        equipment.on_updated.publish(&actor);
        if let Some(inventory) = self.registry.inventories.get_mut(actor) {
            inventory.set(slot.0, slot.1, previous)?;
            inventory.on_updated.publish(&actor);
        }
        debug!(target: "game::items", %actor, %item, slot = %target, "item equipped");
        Ok(())
    }

    /// Moves the item worn at `source` into inventory `slot`. An item already
    /// in that slot is worn in its place when it fits.
    pub fn unequip_to_inventory(
        &mut self,
        actor: EntityId,
        source: EquipmentSlotName,
        slot: (usize, usize),
    ) -> Result<(), EquipmentError> {
        let worn = self
            .registry
            .equipment
            .get(actor)
            .ok_or(EquipmentError::MissingEquipment(actor))?
            .get(source);
        let Some(worn) = worn else {
            return Ok(());
        };
        let stored = self
            .registry
            .inventories
            .get(actor)
            .ok_or(InventoryError::MissingInventory(actor))?
            .get(slot.0, slot.1)?;
        if let Some(stored) = stored {
            self.check_wearable(stored, source)?;
        }

        if let Some(equipment) = self.registry.equipment.get_mut(actor) {
            match stored {
                Some(stored) => equipment.set(source, stored),
                None => equipment.clear(source),
            };
            equipment.on_updated.publish(&actor);
        }
        if let Some(inventory) = self.registry.inventories.get_mut(actor) {
            inventory.set(slot.0, slot.1, Some(worn))?;
            inventory.on_updated.publish(&actor);
        }
        debug!(target: "game::items", %actor, item = %worn, slot = %source, "item unequipped");
        Ok(())
    }

    fn check_wearable(&self, item: EntityId, slot: EquipmentSlotName) -> Result<(), EquipmentError> {
        let data = self
            .registry
            .items
            .get(item)
            .ok_or(EquipmentError::NotAnItem(item))?;
        if slot.accepts(data.flags) {
            Ok(())
        } else {
            Err(EquipmentError::InvalidSlot { item, slot })
        }
    }
}
