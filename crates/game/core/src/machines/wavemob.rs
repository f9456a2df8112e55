//! Wave enemies: idle until hit, chase the attacker, fight in range, die.

use state_machine::{State, StateContext, StateMachine, StateMachineError, StateTag};
use strum::{Display, EnumIter};
use tracing::debug;

use crate::components::AnimationKind;
use crate::registry::EntityId;
use crate::world::GameWorld;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
pub enum WavemobState {
    Default,
    TargetOutOfRange,
    Combat,
    Dying,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WavemobSignal {
    Hit { attacker: EntityId },
    Died,
    TargetReached,
    TargetMoved,
    AnimationEnded,
}

impl StateTag for WavemobState {
    type Args = ();
    type Signal = WavemobSignal;

    fn domain() -> &'static str {
        "wavemob"
    }
}

type WavemobContext = StateContext<EntityId, WavemobState>;

pub fn build() -> Result<StateMachine<GameWorld, WavemobState>, StateMachineError> {
    StateMachine::builder("wavemob")
        .state(WavemobState::Default, DefaultState)
        .state(WavemobState::TargetOutOfRange, TargetOutOfRangeState)
        .state(WavemobState::Combat, CombatState)
        .state(WavemobState::Dying, DyingState)
        .on_attach(listen_for_combat)
        .build()
}

/// Hit and death hookups live as long as the enemy does.
fn listen_for_combat(world: &mut GameWorld, cx: &mut WavemobContext) {
    let Some(combatant) = world.registry.combatants.get(cx.entity()) else {
        return;
    };
    let poster = cx.persistent_poster();
    cx.manage_persistent(combatant.on_hit.subscribe(move |attack| {
        poster.signal(WavemobSignal::Hit {
            attacker: attack.attacker,
        })
    }));
    let poster = cx.persistent_poster();
    cx.manage_persistent(
        combatant
            .on_death
            .subscribe(move |_| poster.signal(WavemobSignal::Died)),
    );
}

/// Hit and death handling shared by every state but `Dying`.
fn on_combat_signal(world: &mut GameWorld, cx: &mut WavemobContext, signal: WavemobSignal) {
    match signal {
        WavemobSignal::Hit { attacker } => {
            if let Some(combatant) = world.registry.combatants.get_mut(cx.entity()) {
                combatant.target = Some(attacker);
            }
            cx.change_state(WavemobState::Combat);
        }
        WavemobSignal::Died => cx.change_state(WavemobState::Dying),
        _ => {}
    }
}

fn target_of(world: &GameWorld, entity: EntityId) -> Option<EntityId> {
    world.registry.combatants.get(entity)?.target
}

fn clear_target(world: &mut GameWorld, entity: EntityId) {
    if let Some(combatant) = world.registry.combatants.get_mut(entity) {
        combatant.target = None;
    }
}

/// Starts or cancels the enemy's auto-attack ability.
fn auto_attack(world: &GameWorld, entity: EntityId, start: bool) {
    let Some(ability_id) = world
        .registry
        .combatants
        .get(entity)
        .and_then(|combatant| combatant.auto_attack)
    else {
        return;
    };
    if let Some(ability) = world.registry.abilities.get(ability_id) {
        if start {
            ability.start_cast.publish(&ability_id);
        } else {
            ability.cancel_cast.publish(&ability_id);
        }
    }
}

struct DefaultState;

impl State<GameWorld, WavemobState> for DefaultState {
    fn on_enter(&self, world: &mut GameWorld, cx: &mut WavemobContext, _args: ()) {
        let this = cx.entity();
        let rally_point = world
            .registry
            .combatants
            .get(this)
            .and_then(|combatant| combatant.rally_point);
        match rally_point {
            Some(point) if world.pathfind_to_location(this, point).is_ok() => {
                world.set_animation(this, AnimationKind::Move);
                if let Some(mover) = world.registry.movers.get(this) {
                    let poster = cx.poster();
                    cx.manage(
                        mover
                            .on_destination_reached
                            .subscribe(move |_| poster.signal(WavemobSignal::TargetReached)),
                    );
                }
            }
            _ => world.set_animation(this, AnimationKind::Idle),
        }
    }

    fn on_exit(&self, world: &mut GameWorld, entity: EntityId) {
        world.cancel_movement(entity);
    }

    fn on_signal(&self, world: &mut GameWorld, cx: &mut WavemobContext, signal: WavemobSignal) {
        if signal == WavemobSignal::TargetReached {
            world.set_animation(cx.entity(), AnimationKind::Idle);
            return;
        }
        on_combat_signal(world, cx, signal);
    }
}

struct TargetOutOfRangeState;

impl TargetOutOfRangeState {
    fn chase(&self, world: &mut GameWorld, cx: &mut WavemobContext, target: EntityId) {
        let this = cx.entity();
        let Some(position) = world.position(target) else {
            clear_target(world, this);
            cx.change_state(WavemobState::Default);
            return;
        };
        world.set_animation(this, AnimationKind::Move);
        if world.pathfind_to_location(this, position).is_err() {
            clear_target(world, this);
            cx.change_state(WavemobState::Default);
        }
    }
}

impl State<GameWorld, WavemobState> for TargetOutOfRangeState {
    fn on_enter(&self, world: &mut GameWorld, cx: &mut WavemobContext, _args: ()) {
        let this = cx.entity();
        auto_attack(world, this, false);

        let Some(target) = target_of(world, this) else {
            cx.change_state(WavemobState::Default);
            return;
        };
        world.set_actor_target(this, Some(target));

        if let Some(mover) = world.registry.movers.get(this) {
            let poster = cx.poster();
            cx.manage(
                mover
                    .on_destination_reached
                    .subscribe(move |_| poster.signal(WavemobSignal::TargetReached)),
            );
        }
        if let Some(target_mover) = world.registry.movers.get(target) {
            let poster = cx.poster();
            cx.manage(
                target_mover
                    .on_path_changed
                    .subscribe(move |_| poster.signal(WavemobSignal::TargetMoved)),
            );
        }

        self.chase(world, cx, target);
    }

    fn on_exit(&self, world: &mut GameWorld, entity: EntityId) {
        world.set_actor_target(entity, None);
    }

    fn update(&self, world: &mut GameWorld, cx: &mut WavemobContext) {
        let this = cx.entity();
        let visible = target_of(world, this).is_some_and(|target| world.has_line_of_sight(this, target));
        if !visible {
            debug!(target: "game::wavemob", entity = %this, "lost sight of target");
            clear_target(world, this);
            cx.change_state(WavemobState::Default);
        }
    }

    fn on_signal(&self, world: &mut GameWorld, cx: &mut WavemobContext, signal: WavemobSignal) {
        match signal {
            WavemobSignal::TargetReached => cx.change_state(WavemobState::Combat),
            WavemobSignal::TargetMoved => {
                if let Some(target) = target_of(world, cx.entity()) {
                    self.chase(world, cx, target);
                }
            }
            other => on_combat_signal(world, cx, other),
        }
    }
}

struct CombatState;

impl State<GameWorld, WavemobState> for CombatState {
    fn on_enter(&self, world: &mut GameWorld, cx: &mut WavemobContext, _args: ()) {
        let this = cx.entity();
        world.cancel_movement(this);
        world.set_animation(this, AnimationKind::Attack);
        auto_attack(world, this, true);
        world.systems.events.combat_started.publish(&this);
    }

    fn on_exit(&self, world: &mut GameWorld, entity: EntityId) {
        auto_attack(world, entity, false);
    }

    fn update(&self, world: &mut GameWorld, cx: &mut WavemobContext) {
        let this = cx.entity();
        let in_combat = world
            .registry
            .combatants
            .get(this)
            .is_some_and(|combatant| !combatant.dying && combatant.target.is_some());
        if !in_combat {
            cx.change_state(WavemobState::Default);
            return;
        }
        let Some(target) = target_of(world, this) else {
            return;
        };
        match world.distance(this, target) {
            None => {
                clear_target(world, this);
                cx.change_state(WavemobState::Default);
            }
            Some(distance) if distance >= world.config().combat_range => {
                cx.change_state(WavemobState::TargetOutOfRange);
            }
            Some(_) => {}
        }
    }

    fn on_signal(&self, world: &mut GameWorld, cx: &mut WavemobContext, signal: WavemobSignal) {
        on_combat_signal(world, cx, signal);
    }
}

struct DyingState;

impl State<GameWorld, WavemobState> for DyingState {
    fn on_enter(&self, world: &mut GameWorld, cx: &mut WavemobContext, _args: ()) {
        let this = cx.entity();
        cx.lock_state();
        if let Some(combatant) = world.registry.combatants.get_mut(this) {
            combatant.target = None;
            combatant.dying = true;
        }
        let duration = world.config().death_animation_seconds;
        if let Some(animation) = world.registry.animations.get_mut(this) {
            animation.play_once(AnimationKind::Death, duration);
            let poster = cx.poster();
            cx.manage(
                animation
                    .on_animation_end
                    .subscribe(move |_| poster.signal(WavemobSignal::AnimationEnded)),
            );
        } else {
            world.registry.mark_for_destroy(this);
        }
        auto_attack(world, this, false);
        world.cancel_movement(this);
        debug!(target: "game::wavemob", entity = %this, "dying");
    }

    fn on_signal(&self, world: &mut GameWorld, cx: &mut WavemobContext, signal: WavemobSignal) {
        if signal == WavemobSignal::AnimationEnded {
            world.registry.mark_for_destroy(cx.entity());
        }
    }
}
