use game_core::{
    Equipment, EquipmentError, EquipmentSlotName, GameConfig, GameWorld, Inventory,
    InventoryError, ItemData, ItemFlags, MovementError, Transform, Vec3,
};

struct Bag {
    world: GameWorld,
    actor: game_core::EntityId,
}

impl Bag {
    fn new() -> Self {
        let mut world = GameWorld::new(GameConfig::default());
        let actor = world.registry.create();
        world.registry.transforms.insert(actor, Transform::at(Vec3::ZERO));
        world
            .registry
            .inventories
            .insert(actor, Inventory::new(2, 2).expect("inventory fits"));
        world.registry.equipment.insert(actor, Equipment::new());
        Self { world, actor }
    }

    fn item(&mut self, name: &str, flags: ItemFlags, slot: (usize, usize)) -> game_core::EntityId {
        let item = self.world.registry.create();
        self.world.registry.items.insert(item, ItemData::new(name, flags));
        self.inventory_mut()
            .set(slot.0, slot.1, Some(item))
            .expect("slot in bounds");
        item
    }

    fn inventory_mut(&mut self) -> &mut Inventory {
        self.world
            .registry
            .inventories
            .get_mut(self.actor)
            .expect("inventory")
    }

    fn stored(&self, slot: (usize, usize)) -> Option<game_core::EntityId> {
        self.world
            .registry
            .inventories
            .get(self.actor)
            .expect("inventory")
            .get(slot.0, slot.1)
            .expect("slot in bounds")
    }

    fn worn(&self, slot: EquipmentSlotName) -> Option<game_core::EntityId> {
        self.world
            .registry
            .equipment
            .get(self.actor)
            .expect("equipment")
            .get(slot)
    }
}

#[test]
fn equipping_swaps_the_worn_item_back_into_the_slot() {
    let mut bag = Bag::new();
    let old = bag.item("Old Helm", ItemFlags::ARMOR | ItemFlags::HELMET, (0, 0));
    let new = bag.item("New Helm", ItemFlags::ARMOR | ItemFlags::HELMET, (1, 1));
    bag.world
        .equip_from_inventory(bag.actor, (0, 0), EquipmentSlotName::Helm)
        .expect("helm fits");
    assert_eq!(bag.worn(EquipmentSlotName::Helm), Some(old));
    assert_eq!(bag.stored((0, 0)), None);

    bag.world
        .equip_from_inventory(bag.actor, (1, 1), EquipmentSlotName::Helm)
        .expect("helm fits");
    assert_eq!(bag.worn(EquipmentSlotName::Helm), Some(new));
    assert_eq!(bag.stored((1, 1)), Some(old));
}

#[test]
fn equipping_rejects_items_the_slot_does_not_accept() {
    let mut bag = Bag::new();
    let ring = bag.item("Ring", ItemFlags::ARMOR | ItemFlags::RING, (0, 1));

    let err = bag
        .world
        .equip_from_inventory(bag.actor, (0, 1), EquipmentSlotName::Boots)
        .unwrap_err();
    assert!(matches!(err, EquipmentError::InvalidSlot { item, .. } if item == ring));
    assert_eq!(bag.stored((0, 1)), Some(ring));

    let err = bag
        .world
        .equip_from_inventory(bag.actor, (1, 0), EquipmentSlotName::Ring1)
        .unwrap_err();
    assert_eq!(err, EquipmentError::Inventory(InventoryError::EmptySlot { row: 1, col: 0 }));
}

#[test]
fn unequipping_wears_the_slot_item_when_it_fits() {
    let mut bag = Bag::new();
    let sword = bag.item("Sword", ItemFlags::WEAPON | ItemFlags::SWORD, (0, 0));
    bag.world
        .equip_from_inventory(bag.actor, (0, 0), EquipmentSlotName::LeftHand)
        .expect("sword fits");
    let dagger = bag.item("Dagger", ItemFlags::WEAPON | ItemFlags::DAGGER, (1, 0));

    bag.world
        .unequip_to_inventory(bag.actor, EquipmentSlotName::LeftHand, (1, 0))
        .expect("dagger fits the hand");
    assert_eq!(bag.worn(EquipmentSlotName::LeftHand), Some(dagger));
    assert_eq!(bag.stored((1, 0)), Some(sword));

    bag.world
        .unequip_to_inventory(bag.actor, EquipmentSlotName::LeftHand, (0, 1))
        .expect("empty slot takes the dagger");
    assert_eq!(bag.worn(EquipmentSlotName::LeftHand), None);
    assert_eq!(bag.stored((0, 1)), Some(dagger));
}

#[test]
fn worn_items_drop_only_within_range() {
    let mut bag = Bag::new();
    let boots = bag.item("Boots", ItemFlags::ARMOR | ItemFlags::BOOTS, (0, 0));
    bag.world
        .equip_from_inventory(bag.actor, (0, 0), EquipmentSlotName::Boots)
        .expect("boots fit");

    let far = Vec3::new(500.0, 0.0, 0.0);
    let err = bag
        .world
        .drop_worn_item_in_world(bag.actor, EquipmentSlotName::Boots, far)
        .unwrap_err();
    assert!(matches!(err, MovementError::OutOfRange { .. }));
    assert_eq!(err.to_string(), "Out of range.");

    let near = Vec3::new(3.0, 0.0, 0.0);
    let dropped = bag
        .world
        .drop_worn_item_in_world(bag.actor, EquipmentSlotName::Boots, near)
        .expect("in range");
    assert_eq!(dropped, boots);
    assert_eq!(bag.worn(EquipmentSlotName::Boots), None);
    assert_eq!(bag.world.position(boots), Some(near));
}
