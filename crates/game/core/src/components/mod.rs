//! Per-entity component data.
//!
//! Components are plain data plus the events other entities and state
//! handlers subscribe to. Behavior that spans several components lives in
//! [`crate::systems`] or on [`crate::GameWorld`].
mod ability;
mod animation;
mod combat;
mod equipment;
mod inventory;
mod item;
mod movement;
mod transform;

pub use ability::{Ability, AbilityBar, AbilityExecuted, Timer};
pub use animation::{Animation, AnimationKind};
pub use combat::{AttackData, Combatant};
pub use equipment::{Equipment, EquipmentError, EquipmentSlotName};
pub use inventory::{Inventory, InventoryError};
pub use item::{ItemData, ItemFlags};
pub use movement::MoveableActor;
pub use transform::Transform;
