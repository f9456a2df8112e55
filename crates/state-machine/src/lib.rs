//! Entity-scoped finite state machines.
//!
//! A [`StateMachine`] maps every variant of a state tag enum to one shared
//! handler object implementing [`State`]. Each entity that carries a
//! [`StateComponent`] is dispatched to the handler for its current tag.
//!
//! # Architecture
//!
//! - [`StateTag`]: the enum naming a machine's states, plus its enter-argument
//!   and signal payload types
//! - [`StateComponent`]: per-entity record of the current tag and the
//!   subscriptions owned by that tag
//! - [`StateWorld`]: the component store seen through the framework's eyes
//! - [`State`]: behavior for one tag, shared by all entities in that tag
//! - [`StateContext`]: what a handler may do while it runs (request
//!   transitions, own subscriptions, lock the state)
//! - [`Mailbox`]/[`Poster`]: the only path from event callbacks back into the
//!   machine
//!
//! # Transition Sequence
//!
//! ```text
//! change_state(entity, next)
//!   ├─→ ignored if locked, or if next == current (unless forced with args)
//!   ├─→ release every subscription owned by the current tag
//!   ├─→ handlers[current].on_exit
//!   ├─→ current = next, epoch += 1
//!   └─→ handlers[next].on_enter(args)
//! ```
//!
//! # Design Principles
//!
//! - **Handlers are stateless**: per-entity data lives in components
//! - **Callbacks never mutate the world**: they post to the mailbox; messages
//!   stamped with an exited epoch are discarded
//! - **One entity at a time**: transitions requested during a handler call are
//!   applied as soon as that call returns, before any other entity runs

pub mod builder;
pub mod component;
pub mod context;
pub mod error;
pub mod machine;
pub mod mailbox;
pub mod state;
pub mod tag;
pub mod world;

pub use builder::StateMachineBuilder;
pub use component::{Epoch, StateComponent};
pub use context::StateContext;
pub use error::StateMachineError;
pub use machine::{StateMachine, TransitionRecord};
pub use mailbox::{Mailbox, Poster};
pub use state::State;
pub use tag::StateTag;
pub use world::StateWorld;
