use game_core::{
    Ability, AbilityState, Animation, AttackData, Combatant, EntityId, GameConfig, GameState,
    GameWorld, MoveableActor, StateMachines, Transform, Vec3, WavemobState,
};
use state_machine::StateComponent;

struct Arena {
    world: GameWorld,
    machines: StateMachines,
    game: EntityId,
}

impl Arena {
    fn new() -> Self {
        let mut world = GameWorld::new(GameConfig::default());
        let machines = StateMachines::new(&world).expect("machines build");
        let game = world.registry.create();
        world
            .registry
            .game_states
            .insert(game, StateComponent::new(GameState::Default));
        Self {
            world,
            machines,
            game,
        }
    }

    fn spawn_fighter(&mut self, at: Vec3, hp: u32) -> EntityId {
        let registry = &mut self.world.registry;
        let entity = registry.create();
        registry.transforms.insert(entity, Transform::at(at));
        registry.movers.insert(entity, MoveableActor::new(10.0));
        registry.animations.insert(entity, Animation::new());
        registry.combatants.insert(entity, Combatant::new(hp));
        entity
    }

    fn spawn_wavemob(&mut self, at: Vec3) -> EntityId {
        let enemy = self.spawn_fighter(at, 5);
        self.world
            .registry
            .wavemob_states
            .insert(enemy, StateComponent::new(WavemobState::Default));
        enemy
    }

    fn frame(&mut self, dt: f32) {
        self.world.tick(dt);
        self.machines.update(&mut self.world);
    }

    fn wavemob(&self, enemy: EntityId) -> Option<WavemobState> {
        self.machines.wavemob.current(&self.world, enemy)
    }
}

#[test]
fn hit_enters_combat_and_switches_game_mode() {
    let mut arena = Arena::new();
    let player = arena.spawn_fighter(Vec3::ZERO, 20);
    let enemy = arena.spawn_wavemob(Vec3::new(3.0, 0.0, 0.0));
    arena.machines.update(&mut arena.world);
    assert_eq!(arena.wavemob(enemy), Some(WavemobState::Default));

    arena.world.apply_attack(AttackData {
        attacker: player,
        hit: enemy,
        damage: 1,
    });
    arena.machines.update(&mut arena.world);

    assert_eq!(arena.wavemob(enemy), Some(WavemobState::Combat));
    assert_eq!(
        arena.world.registry.combatants.get(enemy).and_then(|c| c.target),
        Some(player)
    );
    assert_eq!(
        arena.machines.game_mode.current(&arena.world, arena.game),
        Some(GameState::Combat)
    );
}

#[test]
fn distant_attacker_is_chased_then_fought() {
    let mut arena = Arena::new();
    let player = arena.spawn_fighter(Vec3::ZERO, 20);
    let enemy = arena.spawn_wavemob(Vec3::new(20.0, 0.0, 0.0));
    arena.machines.update(&mut arena.world);

    arena.world.apply_attack(AttackData {
        attacker: player,
        hit: enemy,
        damage: 1,
    });
    arena.machines.update(&mut arena.world);
    assert_eq!(arena.wavemob(enemy), Some(WavemobState::TargetOutOfRange));
    assert!(arena.world.is_moving(enemy));

    for _ in 0..4 {
        arena.frame(1.0);
    }
    assert_eq!(arena.wavemob(enemy), Some(WavemobState::Combat));
}

#[test]
fn dying_locks_state_and_removes_entity_after_animation() {
    let mut arena = Arena::new();
    let player = arena.spawn_fighter(Vec3::ZERO, 20);
    let enemy = arena.spawn_wavemob(Vec3::new(3.0, 0.0, 0.0));
    arena.machines.update(&mut arena.world);

    arena.world.apply_attack(AttackData {
        attacker: player,
        hit: enemy,
        damage: 50,
    });
    arena.machines.update(&mut arena.world);
    assert_eq!(arena.wavemob(enemy), Some(WavemobState::Dying));

    let changed = arena
        .machines
        .wavemob
        .change_state(&mut arena.world, enemy, WavemobState::Default)
        .expect("component present");
    assert!(!changed);
    assert_eq!(arena.wavemob(enemy), Some(WavemobState::Dying));

    arena.frame(1.0);
    assert!(!arena.world.registry.is_alive(enemy));
    assert!(arena.world.registry.wavemob_states.is_empty());
}

#[test]
fn wave_ends_when_every_enemy_is_gone() {
    let mut arena = Arena::new();
    let player = arena.spawn_fighter(Vec3::ZERO, 20);
    let enemy = arena.spawn_wavemob(Vec3::new(3.0, 0.0, 0.0));
    arena.machines.update(&mut arena.world);

    arena.world.systems.events.wave_requested.publish(&());
    arena.machines.update(&mut arena.world);
    assert_eq!(
        arena.machines.game_mode.current(&arena.world, arena.game),
        Some(GameState::Wave)
    );

    arena.world.registry.destroy(enemy);
    arena.machines.update(&mut arena.world);
    assert_eq!(
        arena.machines.game_mode.current(&arena.world, arena.game),
        Some(GameState::Default)
    );
    assert!(arena.world.registry.is_alive(player));
}

fn spawn_ability(arena: &mut Arena, ability: Ability) -> EntityId {
    let registry = &mut arena.world.registry;
    let entity = registry.create();
    registry.abilities.insert(entity, ability);
    registry
        .ability_states
        .insert(entity, StateComponent::new(AbilityState::Idle));
    entity
}

fn start_cast(arena: &Arena, ability: EntityId) {
    arena
        .world
        .registry
        .abilities
        .get(ability)
        .expect("ability attached")
        .start_cast
        .publish(&ability);
}

fn hp(arena: &Arena, entity: EntityId) -> u32 {
    arena
        .world
        .registry
        .combatants
        .get(entity)
        .map(|c| c.hp)
        .unwrap_or_default()
}

#[test]
fn ability_resolves_after_cast_delay_and_respects_cooldown() {
    let mut arena = Arena::new();
    let caster = arena.spawn_fighter(Vec3::ZERO, 20);
    let target = arena.spawn_fighter(Vec3::new(2.0, 0.0, 0.0), 10);
    if let Some(combatant) = arena.world.registry.combatants.get_mut(caster) {
        combatant.target = Some(target);
    }
    let strike = spawn_ability(
        &mut arena,
        Ability::new("Strike", caster, 2.0, 0.5).with_damage(3),
    );
    arena.machines.update(&mut arena.world);

    start_cast(&arena, strike);
    arena.machines.update(&mut arena.world);
    assert_eq!(
        arena.machines.ability.current(&arena.world, strike),
        Some(AbilityState::AwaitingExecution)
    );
    assert_eq!(hp(&arena, target), 10);

    arena.frame(0.5);
    assert_eq!(
        arena.machines.ability.current(&arena.world, strike),
        Some(AbilityState::Idle)
    );
    assert_eq!(hp(&arena, target), 7);

    start_cast(&arena, strike);
    arena.frame(0.1);
    assert_eq!(
        arena.machines.ability.current(&arena.world, strike),
        Some(AbilityState::Idle)
    );
}

#[test]
fn cancelled_cast_never_executes() {
    let mut arena = Arena::new();
    let caster = arena.spawn_fighter(Vec3::ZERO, 20);
    let target = arena.spawn_fighter(Vec3::new(2.0, 0.0, 0.0), 10);
    if let Some(combatant) = arena.world.registry.combatants.get_mut(caster) {
        combatant.target = Some(target);
    }
    let strike = spawn_ability(
        &mut arena,
        Ability::new("Strike", caster, 2.0, 0.5).with_damage(3),
    );
    arena.machines.update(&mut arena.world);

    start_cast(&arena, strike);
    arena.machines.update(&mut arena.world);
    let ability = arena.world.registry.abilities.get(strike).expect("ability");
    ability.cancel_cast.publish(&strike);
    arena.frame(1.0);

    assert_eq!(
        arena.machines.ability.current(&arena.world, strike),
        Some(AbilityState::Idle)
    );
    assert_eq!(hp(&arena, target), 10);
    let ability = arena.world.registry.abilities.get(strike).expect("ability");
    assert!(ability.cooldown.is_ready());
}

#[test]
fn cursor_ability_waits_for_a_point_in_range() {
    let mut arena = Arena::new();
    let caster = arena.spawn_fighter(Vec3::ZERO, 20);
    let blink = spawn_ability(
        &mut arena,
        Ability::new("Blink", caster, 5.0, 0.2)
            .cursor_based()
            .with_range(10.0),
    );
    arena.machines.update(&mut arena.world);

    start_cast(&arena, blink);
    arena.machines.update(&mut arena.world);
    assert_eq!(
        arena.machines.ability.current(&arena.world, blink),
        Some(AbilityState::CursorSelect)
    );
    assert!(!arena.world.systems.cursor.is_enabled());
    assert!(arena.world.systems.cursor.is_hidden());

    arena.world.systems.cursor.set_world_point(Vec3::new(50.0, 0.0, 0.0));
    arena.world.systems.cursor.click();
    arena.machines.update(&mut arena.world);
    assert_eq!(
        arena.machines.ability.current(&arena.world, blink),
        Some(AbilityState::CursorSelect)
    );

    arena.world.systems.cursor.set_world_point(Vec3::new(5.0, 0.0, 0.0));
    arena.world.systems.cursor.click();
    arena.machines.update(&mut arena.world);
    assert_eq!(
        arena.machines.ability.current(&arena.world, blink),
        Some(AbilityState::AwaitingExecution)
    );
    assert!(arena.world.systems.cursor.is_enabled());
    assert!(!arena.world.systems.cursor.is_hidden());
}
