//! Concrete state machines and their wiring into [`GameWorld`].
//!
//! # Architecture
//!
//! Each domain owns one tag enum, one `StateComponent` storage on the
//! [`Registry`](crate::Registry) and one [`StateMachine`]. Attaching a state
//! component to an entity is all gameplay code has to do: the storage's
//! construct event reaches the machine, which enters the initial tag on its
//! next pump.
//!
//! Machines never call each other. Enemies starting combat reach the game mode
//! through [`GameEvents`](crate::GameEvents); enemies casting reach the
//! ability machine through the ability's `start_cast` event.
mod ability;
mod game_mode;
mod party;
mod wavemob;

use event_bus::Event;
use state_machine::{StateComponent, StateMachine, StateMachineError, StateWorld};

pub use ability::{AbilitySignal, AbilityState};
pub use game_mode::{GameSignal, GameState};
pub use party::{DestinationUnreachableData, PartyEnter, PartyMemberState, PartySignal};
pub use wavemob::{WavemobSignal, WavemobState};

use crate::registry::EntityId;
use crate::world::GameWorld;

macro_rules! state_storage {
    ($tag:ty, $field:ident) => {
        impl StateWorld<$tag> for GameWorld {
            type Entity = EntityId;

            fn state(&self, entity: EntityId) -> Option<&StateComponent<$tag>> {
                self.registry.$field.get(entity)
            }

            fn state_mut(&mut self, entity: EntityId) -> Option<&mut StateComponent<$tag>> {
                self.registry.$field.get_mut(entity)
            }

            fn state_entities(&self) -> Vec<EntityId> {
                self.registry.$field.entities()
            }

            fn state_constructed(&self) -> &Event<EntityId> {
                self.registry.$field.on_construct()
            }
        }
    };
}

state_storage!(PartyMemberState, party_states);
state_storage!(WavemobState, wavemob_states);
state_storage!(AbilityState, ability_states);
state_storage!(GameState, game_states);

/// Every gameplay machine, attached to one world.
pub struct StateMachines {
    pub wavemob: StateMachine<GameWorld, WavemobState>,
    pub game_mode: StateMachine<GameWorld, GameState>,
    pub party: StateMachine<GameWorld, PartyMemberState>,
    pub ability: StateMachine<GameWorld, AbilityState>,
}

impl StateMachines {
    /// Builds every machine and subscribes it to `world`'s construct events.
    pub fn new(world: &GameWorld) -> Result<Self, StateMachineError> {
        let mut machines = Self {
            wavemob: wavemob::build()?,
            game_mode: game_mode::build()?,
            party: party::build()?,
            ability: ability::build()?,
        };
        machines.wavemob.attach(world)?;
        machines.game_mode.attach(world)?;
        machines.party.attach(world)?;
        machines.ability.attach(world)?;
        Ok(machines)
    }

    /// One frame of every machine, then deferred entity destruction.
    pub fn update(&self, world: &mut GameWorld) {
        self.wavemob.update(world);
        self.game_mode.update(world);
        self.party.update(world);
        self.ability.update(world);
        world.registry.flush_destroyed();
    }

    pub fn draw(&self, world: &GameWorld) {
        self.wavemob.draw(world);
        self.game_mode.draw(world);
        self.party.draw(world);
        self.ability.draw(world);
    }

    pub fn detach(&mut self) {
        self.wavemob.detach();
        self.game_mode.detach();
        self.party.detach();
        self.ability.detach();
    }
}
