//! Fluent construction of a [`StateMachine`].

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::machine::AttachHook;
use crate::{State, StateContext, StateMachine, StateMachineError, StateTag, StateWorld};

/// Collects handlers and hooks, then checks that every tag is covered.
pub struct StateMachineBuilder<W: StateWorld<E>, E: StateTag> {
    name: &'static str,
    handlers: BTreeMap<E, Rc<dyn State<W, E>>>,
    duplicate: Option<E>,
    on_attach: Option<AttachHook<W, E>>,
}

impl<W: StateWorld<E>, E: StateTag> StateMachineBuilder<W, E> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            handlers: BTreeMap::new(),
            duplicate: None,
            on_attach: None,
        }
    }

    /// Registers the handler for `tag`.
    pub fn state(self, tag: E, handler: impl State<W, E> + 'static) -> Self {
        self.shared_state(tag, Rc::new(handler))
    }

    /// Registers a handler object that may also serve other tags.
    pub fn shared_state(mut self, tag: E, handler: Rc<dyn State<W, E>>) -> Self {
        if self.handlers.insert(tag, handler).is_some() && self.duplicate.is_none() {
            self.duplicate = Some(tag);
        }
        self
    }

    /// Hook run for each entity before its initial `on_enter`.
    ///
    /// Typical use is wiring persistent subscriptions to other entities.
    pub fn on_attach(
        mut self,
        hook: impl Fn(&mut W, &mut StateContext<W::Entity, E>) + 'static,
    ) -> Self {
        self.on_attach = Some(Rc::new(hook));
        self
    }

    pub fn build(self) -> Result<StateMachine<W, E>, StateMachineError> {
        if let Some(tag) = self.duplicate {
            return Err(StateMachineError::DuplicateHandler {
                machine: self.name,
                tag: format!("{tag:?}"),
            });
        }
        if let Some(tag) = E::iter().find(|tag| !self.handlers.contains_key(tag)) {
            return Err(StateMachineError::MissingHandler {
                machine: self.name,
                tag: format!("{tag:?}"),
            });
        }
        Ok(StateMachine::from_parts(self.name, self.handlers, self.on_attach))
    }
}
