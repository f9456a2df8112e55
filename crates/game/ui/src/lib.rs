//! Game widgets on top of the UI engine.
//!
//! The engine knows nothing about items or abilities. This crate supplies the
//! [`GameHost`] the engine drives, the slot widgets that move things around
//! the world when dragged, and the layouts of the in-game windows.
//!
//! # Architecture
//!
//! - [`GameHost`]: the [`game_core::GameWorld`] plus cursor capture while the
//!   pointer is over a window
//! - [`SlotPayload`]: what a dragged slot carries; receivers match on it
//!   instead of inspecting the source widget
//! - [`AbilitySlot`], [`InventorySlot`], [`EquipmentSlot`]: slot widgets
//! - [`windows`]: window factories and the [`GameWindows`] HUD bundle

pub mod error;
pub mod host;
pub mod slots;
pub mod windows;

pub use error::WindowError;
pub use host::{EMPTY_SLOT_ICON, GameHost, SlotOwner, SlotPayload};
pub use slots::{AbilitySlot, EquipmentSlot, InventorySlot};
pub use windows::GameWindows;
