//! Entity store, gameplay systems and the concrete state machines that drive
//! party members, wave enemies, abilities and the game mode.
//!
//! All per-entity data lives in [`Registry`] storages. Systems that are not
//! tied to a single entity (movement, cursor, clock, line of sight) live in
//! [`Systems`]. Both are bundled in [`GameWorld`], which is the world type the
//! state machines in [`machines`] dispatch against.
pub mod components;
pub mod config;
pub mod error;
pub mod machines;
pub mod math;
pub mod registry;
pub mod systems;
pub mod world;

pub use components::{
    Ability, AbilityBar, Animation, AnimationKind, AttackData, Combatant, Equipment,
    EquipmentError, EquipmentSlotName, Inventory, InventoryError, ItemData, ItemFlags,
    MoveableActor, Timer, Transform,
};
pub use config::GameConfig;
pub use error::{ErrorSeverity, GameError};
pub use machines::{
    AbilityState, DestinationUnreachableData, GameState, PartyMemberState, StateMachines,
    WavemobState,
};
pub use math::Vec3;
pub use registry::{EntityId, Registry, Storage};
pub use systems::{
    Clock, Cursor, GameEvents, LineOfSight, MovementError, MovementSystem, OpenField, PathFinder,
    StraightLine, Systems,
};
pub use world::GameWorld;
