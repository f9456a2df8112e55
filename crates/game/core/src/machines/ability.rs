//! Casting flow of a single ability entity.
//!
//! `Idle` waits for a cast request and ticks the cooldown. Cursor-based
//! abilities first pass through `CursorSelect`, where the world cursor is
//! taken over until a ground point within range is clicked.
//! `AwaitingExecution` runs the cast delay and then resolves the ability.

use state_machine::{State, StateContext, StateMachine, StateMachineError, StateTag};
use strum::{Display, EnumIter};
use tracing::{debug, trace};

use crate::components::{AbilityExecuted, AttackData};
use crate::math::Vec3;
use crate::registry::EntityId;
use crate::world::GameWorld;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
pub enum AbilityState {
    Idle,
    CursorSelect,
    AwaitingExecution,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AbilitySignal {
    Start,
    Cancel,
    Confirm(Vec3),
}

impl StateTag for AbilityState {
    type Args = ();
    type Signal = AbilitySignal;

    fn domain() -> &'static str {
        "ability"
    }
}

type AbilityContext = StateContext<EntityId, AbilityState>;

pub fn build() -> Result<StateMachine<GameWorld, AbilityState>, StateMachineError> {
    StateMachine::builder("ability")
        .state(AbilityState::Idle, IdleState)
        .state(AbilityState::CursorSelect, CursorSelectState)
        .state(AbilityState::AwaitingExecution, AwaitingExecutionState)
        .on_attach(listen_for_casts)
        .build()
}

fn listen_for_casts(world: &mut GameWorld, cx: &mut AbilityContext) {
    let Some(ability) = world.registry.abilities.get(cx.entity()) else {
        return;
    };
    let poster = cx.persistent_poster();
    cx.manage_persistent(
        ability
            .start_cast
            .subscribe(move |_| poster.signal(AbilitySignal::Start)),
    );
    let poster = cx.persistent_poster();
    cx.manage_persistent(
        ability
            .cancel_cast
            .subscribe(move |_| poster.signal(AbilitySignal::Cancel)),
    );
}

/// Stops both timers and returns to `Idle`.
fn cancel(world: &mut GameWorld, cx: &mut AbilityContext) {
    if let Some(ability) = world.registry.abilities.get_mut(cx.entity()) {
        ability.cooldown.stop();
        ability.cast_delay.stop();
        ability.target_point = None;
    }
    cx.change_state(AbilityState::Idle);
}

fn begin_cast(world: &GameWorld, cx: &mut AbilityContext) {
    let Some(ability) = world.registry.abilities.get(cx.entity()) else {
        return;
    };
    if !ability.cooldown.is_ready() {
        trace!(target: "game::ability", ability = %cx.entity(), "still on cooldown");
        return;
    }
    if ability.cursor_based {
        cx.change_state(AbilityState::CursorSelect);
    } else {
        cx.change_state(AbilityState::AwaitingExecution);
    }
}

struct IdleState;

impl State<GameWorld, AbilityState> for IdleState {
    fn update(&self, world: &mut GameWorld, cx: &mut AbilityContext) {
        let dt = world.systems.clock.delta();
        let Some(ability) = world.registry.abilities.get_mut(cx.entity()) else {
            return;
        };
        ability.cooldown.update(dt);
        if ability.repeatable && ability.cooldown.has_finished() {
            begin_cast(world, cx);
        }
    }

    fn on_signal(&self, world: &mut GameWorld, cx: &mut AbilityContext, signal: AbilitySignal) {
        match signal {
            AbilitySignal::Start => begin_cast(world, cx),
            AbilitySignal::Cancel => cancel(world, cx),
            AbilitySignal::Confirm(_) => {}
        }
    }
}

struct CursorSelectState;

impl State<GameWorld, AbilityState> for CursorSelectState {
    fn on_enter(&self, world: &mut GameWorld, cx: &mut AbilityContext, _args: ()) {
        let cursor = &mut world.systems.cursor;
        cursor.disable();
        cursor.hide();
        let poster = cx.poster();
        cx.manage(
            cursor
                .on_click
                .subscribe(move |point| poster.signal(AbilitySignal::Confirm(*point))),
        );
    }

    fn on_exit(&self, world: &mut GameWorld, _entity: EntityId) {
        let cursor = &mut world.systems.cursor;
        cursor.enable();
        cursor.show();
    }

    fn on_signal(&self, world: &mut GameWorld, cx: &mut AbilityContext, signal: AbilitySignal) {
        let this = cx.entity();
        match signal {
            // Pressing the ability again puts the cursor back.
            AbilitySignal::Start | AbilitySignal::Cancel => cancel(world, cx),
            AbilitySignal::Confirm(point) => {
                let Some((caster, range)) = world
                    .registry
                    .abilities
                    .get(this)
                    .map(|ability| (ability.caster, ability.range))
                else {
                    return;
                };
                let in_range = world
                    .position(caster)
                    .is_some_and(|origin| origin.distance(point) <= range);
                if !in_range {
                    debug!(target: "game::ability", ability = %this, ?point, "target point out of range");
                    return;
                }
                if let Some(ability) = world.registry.abilities.get_mut(this) {
                    ability.target_point = Some(point);
                }
                cx.change_state(AbilityState::AwaitingExecution);
            }
        }
    }
}

struct AwaitingExecutionState;

impl AwaitingExecutionState {
    fn execute(&self, world: &mut GameWorld, ability_id: EntityId) {
        let Some(ability) = world.registry.abilities.get_mut(ability_id) else {
            return;
        };
        ability.cast_delay.stop();
        let caster = ability.caster;
        let damage = ability.damage;
        let point = ability.target_point.take();
        let target = world
            .registry
            .combatants
            .get(caster)
            .and_then(|combatant| combatant.target);

        if let Some(ability) = world.registry.abilities.get(ability_id) {
            ability.on_execute.publish(&AbilityExecuted {
                ability: ability_id,
                caster,
                target,
            });
        }
        debug!(target: "game::ability", ability = %ability_id, %caster, ?target, ?point, "ability executed");

        if let Some(hit) = target {
            world.apply_attack(AttackData {
                attacker: caster,
                hit,
                damage,
            });
        }
    }
}

impl State<GameWorld, AbilityState> for AwaitingExecutionState {
    fn on_enter(&self, world: &mut GameWorld, cx: &mut AbilityContext, _args: ()) {
        if let Some(ability) = world.registry.abilities.get_mut(cx.entity()) {
            ability.cooldown.start();
            ability.cast_delay.start();
        }
    }

    fn update(&self, world: &mut GameWorld, cx: &mut AbilityContext) {
        let this = cx.entity();
        let dt = world.systems.clock.delta();
        let Some(ability) = world.registry.abilities.get_mut(this) else {
            return;
        };
        ability.cooldown.update(dt);
        ability.cast_delay.update(dt);
        if ability.cast_delay.has_finished() {
            self.execute(world, this);
            cx.change_state(AbilityState::Idle);
        }
    }

    fn on_signal(&self, world: &mut GameWorld, cx: &mut AbilityContext, signal: AbilitySignal) {
        if signal == AbilitySignal::Cancel {
            cancel(world, cx);
        }
    }
}
