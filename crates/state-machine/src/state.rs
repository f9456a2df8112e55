//! Handler trait.

use crate::{StateContext, StateTag, StateWorld};

/// Behavior of one tag, shared by every entity currently in that tag.
///
/// Implementors hold no per-entity data. Anything an entity needs for the
/// duration of a state lives on the world, usually as an auxiliary component
/// added in `on_enter` and removed in `on_exit`.
///
/// Tag-scoped subscriptions are released by the machine before `on_exit` runs,
/// so `on_exit` only deals with resources the handler owns outside of them.
#[allow(unused_variables)]
pub trait State<W: StateWorld<E>, E: StateTag> {
    fn on_enter(&self, world: &mut W, cx: &mut StateContext<W::Entity, E>, args: E::Args) {}

    fn on_exit(&self, world: &mut W, entity: W::Entity) {}

    fn update(&self, world: &mut W, cx: &mut StateContext<W::Entity, E>) {}

    /// Receives signals posted by callbacks while this tag is current.
    fn on_signal(&self, world: &mut W, cx: &mut StateContext<W::Entity, E>, signal: E::Signal) {}

    fn draw(&self, world: &W, entity: W::Entity) {}
}
