//! Component store contract required by the dispatcher.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use event_bus::Event;

use crate::{StateComponent, StateTag};

/// The parts of an entity-component store a [`StateMachine`](crate::StateMachine)
/// relies on for one tag domain.
pub trait StateWorld<E: StateTag> {
    type Entity: Copy + Eq + Ord + Hash + Debug + Display + 'static;

    fn state(&self, entity: Self::Entity) -> Option<&StateComponent<E>>;

    fn state_mut(&mut self, entity: Self::Entity) -> Option<&mut StateComponent<E>>;

    /// Entities carrying a state component, in a stable order.
    fn state_entities(&self) -> Vec<Self::Entity>;

    /// Fired by the store whenever a state component is attached.
    fn state_constructed(&self) -> &Event<Self::Entity>;
}
