//! The demo encounter every session starts from.

use game_core::{
    Ability, AbilityBar, AbilityState, Animation, Combatant, EntityId, Equipment,
    EquipmentSlotName, GameState, GameWorld, Inventory, InventoryError, ItemData, ItemFlags,
    MoveableActor, PartyMemberState, Transform, Vec3, WavemobState,
};
use state_machine::StateComponent;

const ACTOR_SPEED: f32 = 10.0;
const INVENTORY_ROWS: usize = 4;
const INVENTORY_COLS: usize = 4;

/// Entities the session refers to after spawning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scene {
    pub game: EntityId,
    pub leader: EntityId,
    pub follower: EntityId,
    pub wavemob: EntityId,
}

impl Scene {
    /// Spawns a two-member party, its gear and abilities, and one enemy.
    /// The leader ends up selected.
    pub fn populate(world: &mut GameWorld) -> Result<Self, InventoryError> {
        let game = world.registry.create();
        world
            .registry
            .game_states
            .insert(game, StateComponent::new(GameState::Default));

        let leader = spawn_hero(world, Vec3::ZERO, 30)?;
        let follower = spawn_hero(world, Vec3::new(-20.0, 0.0, 0.0), 24)?;
        world
            .registry
            .party_states
            .insert(follower, StateComponent::new(PartyMemberState::Default));

        let wavemob = world.registry.create();
        let registry = &mut world.registry;
        registry
            .transforms
            .insert(wavemob, Transform::at(Vec3::new(40.0, 0.0, 0.0)));
        registry
            .movers
            .insert(wavemob, MoveableActor::new(ACTOR_SPEED * 0.5));
        registry.animations.insert(wavemob, Animation::new());
        registry.combatants.insert(wavemob, Combatant::new(12));
        registry
            .wavemob_states
            .insert(wavemob, StateComponent::new(WavemobState::Default));

        stock(world, leader)?;
        let sword = world.registry.create();
        world.registry.items.insert(
            sword,
            ItemData::new("Short Sword", ItemFlags::WEAPON | ItemFlags::SWORD)
                .with_description("Light and quick."),
        );
        if let Some(equipment) = world.registry.equipment.get_mut(follower) {
            equipment.set(EquipmentSlotName::RightHand, sword);
        }

        for (slot, ability) in [
            Ability::new("Fireball", leader, 3.0, 0.5)
                .cursor_based()
                .with_range(30.0)
                .with_damage(6),
            Ability::new("Cleave", leader, 1.5, 0.0)
                .with_range(3.0)
                .with_damage(3),
        ]
        .into_iter()
        .enumerate()
        {
            let entity = world.registry.create();
            world.registry.abilities.insert(entity, ability);
            world
                .registry
                .ability_states
                .insert(entity, StateComponent::new(AbilityState::Idle));
            if let Some(bar) = world.registry.ability_bars.get_mut(leader) {
                bar.set(slot, Some(entity));
            }
        }

        world.systems.cursor.select_actor(leader);
        tracing::info!(target: "client", %leader, %follower, %wavemob, "scene populated");

        Ok(Self {
            game,
            leader,
            follower,
            wavemob,
        })
    }
}

fn spawn_hero(world: &mut GameWorld, at: Vec3, hp: u32) -> Result<EntityId, InventoryError> {
    let registry = &mut world.registry;
    let hero = registry.create();
    registry.transforms.insert(hero, Transform::at(at));
    registry.movers.insert(hero, MoveableActor::new(ACTOR_SPEED));
    registry.animations.insert(hero, Animation::new());
    registry.combatants.insert(hero, Combatant::new(hp));
    registry
        .inventories
        .insert(hero, Inventory::new(INVENTORY_ROWS, INVENTORY_COLS)?);
    registry.equipment.insert(hero, Equipment::new());
    registry.ability_bars.insert(hero, AbilityBar::new());
    Ok(hero)
}

fn stock(world: &mut GameWorld, owner: EntityId) -> Result<(), InventoryError> {
    let items = [
        ItemData::new("Iron Helm", ItemFlags::ARMOR | ItemFlags::HELMET)
            .with_description("Dented but sound."),
        ItemData::new("Leather Boots", ItemFlags::ARMOR | ItemFlags::BOOTS)
            .with_description("Soft soles, quiet steps."),
        ItemData::new("Healing Draught", ItemFlags::POTION)
            .with_description("Restores a little health."),
        ItemData::new("Old Letter", ItemFlags::QUEST)
            .with_description("Sealed. Someone wants this delivered."),
    ];
    for item in items {
        give_item(world, owner, item)?;
    }
    Ok(())
}

fn give_item(
    world: &mut GameWorld,
    owner: EntityId,
    data: ItemData,
) -> Result<EntityId, InventoryError> {
    let item = world.registry.create();
    world.registry.items.insert(item, data);
    world
        .registry
        .inventories
        .get_mut(owner)
        .ok_or(InventoryError::MissingInventory(owner))?
        .add_item(item)?;
    Ok(item)
}
