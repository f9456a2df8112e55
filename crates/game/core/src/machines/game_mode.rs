//! Game-wide mode on a single game entity.

use state_machine::{State, StateContext, StateMachine, StateMachineError, StateTag};
use strum::{Display, EnumIter};
use tracing::info;

use crate::registry::EntityId;
use crate::world::GameWorld;

use super::WavemobState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
pub enum GameState {
    Default,
    Wave,
    Combat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameSignal {
    StartWave,
    StartCombat,
}

impl StateTag for GameState {
    type Args = ();
    type Signal = GameSignal;

    fn domain() -> &'static str {
        "game"
    }
}

type GameContext = StateContext<EntityId, GameState>;

pub fn build() -> Result<StateMachine<GameWorld, GameState>, StateMachineError> {
    StateMachine::builder("game_mode")
        .state(GameState::Default, DefaultState)
        .state(GameState::Wave, WaveState)
        .state(GameState::Combat, CombatState)
        .on_attach(|world: &mut GameWorld, cx: &mut GameContext| {
            let events = &world.systems.events;
            let poster = cx.persistent_poster();
            cx.manage_persistent(
                events
                    .wave_requested
                    .subscribe(move |_| poster.signal(GameSignal::StartWave)),
            );
            let poster = cx.persistent_poster();
            cx.manage_persistent(
                events
                    .combat_started
                    .subscribe(move |_| poster.signal(GameSignal::StartCombat)),
            );
        })
        .build()
}

fn on_game_signal(cx: &mut GameContext, signal: GameSignal) {
    match signal {
        GameSignal::StartWave => cx.change_state(GameState::Wave),
        GameSignal::StartCombat => cx.change_state(GameState::Combat),
    }
}

struct DefaultState;

impl State<GameWorld, GameState> for DefaultState {
    fn on_signal(&self, _world: &mut GameWorld, cx: &mut GameContext, signal: GameSignal) {
        on_game_signal(cx, signal);
    }
}

struct WaveState;

impl State<GameWorld, GameState> for WaveState {
    fn on_enter(&self, world: &mut GameWorld, _cx: &mut GameContext, _args: ()) {
        info!(
            target: "game::mode",
            enemies = world.registry.wavemob_states.len(),
            "wave started"
        );
    }

    fn update(&self, world: &mut GameWorld, cx: &mut GameContext) {
        if world.registry.wavemob_states.is_empty() {
            info!(target: "game::mode", "wave cleared");
            cx.change_state(GameState::Default);
        }
    }

    fn on_signal(&self, _world: &mut GameWorld, cx: &mut GameContext, signal: GameSignal) {
        on_game_signal(cx, signal);
    }
}

struct CombatState;

impl State<GameWorld, GameState> for CombatState {
    fn on_enter(&self, _world: &mut GameWorld, _cx: &mut GameContext, _args: ()) {
        info!(target: "game::mode", "combat started");
    }

    fn update(&self, world: &mut GameWorld, cx: &mut GameContext) {
        let fighting = world
            .registry
            .wavemob_states
            .iter()
            .any(|(_, state)| state.current() == WavemobState::Combat);
        if !fighting {
            info!(target: "game::mode", "combat over");
            cx.change_state(GameState::Default);
        }
    }

    fn on_signal(&self, _world: &mut GameWorld, cx: &mut GameContext, signal: GameSignal) {
        if signal == GameSignal::StartWave {
            cx.change_state(GameState::Wave);
        }
    }
}
