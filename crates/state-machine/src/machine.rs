//! Tag-to-handler dispatcher.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use event_bus::{Event, Subscription};
use tracing::{debug, trace, warn};

use crate::context::Request;
use crate::mailbox::{Envelope, Message};
use crate::{
    Epoch, Mailbox, Poster, State, StateContext, StateMachineBuilder, StateMachineError, StateTag,
    StateWorld,
};

/// Upper bound on mailbox messages handled by a single `dispatch` call.
///
/// Two handlers that keep signalling each other would otherwise spin forever;
/// whatever is left over is handled on the next pump.
const DISPATCH_BUDGET: usize = 4096;

/// Runs once per entity, right before its initial tag is entered.
pub type AttachHook<W, E> =
    Rc<dyn Fn(&mut W, &mut StateContext<<W as StateWorld<E>>::Entity, E>)>;

/// Published after the tag has changed and before the new tag's `on_enter`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionRecord<K, E> {
    pub entity: K,
    pub from: E,
    pub to: E,
    pub epoch: Epoch,
}

/// Dispatches every entity carrying a `StateComponent<E>` to the handler for
/// its current tag.
pub struct StateMachine<W: StateWorld<E>, E: StateTag> {
    name: &'static str,
    handlers: BTreeMap<E, Rc<dyn State<W, E>>>,
    mailbox: Mailbox<W::Entity, E>,
    on_attach: Option<AttachHook<W, E>>,
    construct: Option<Subscription>,
    on_transition: Event<TransitionRecord<W::Entity, E>>,
}

impl<W: StateWorld<E>, E: StateTag> StateMachine<W, E> {
    pub fn builder(name: &'static str) -> StateMachineBuilder<W, E> {
        StateMachineBuilder::new(name)
    }

    pub(crate) fn from_parts(
        name: &'static str,
        handlers: BTreeMap<E, Rc<dyn State<W, E>>>,
        on_attach: Option<AttachHook<W, E>>,
    ) -> Self {
        Self {
            name,
            handlers,
            mailbox: Mailbox::new(),
            on_attach,
            construct: None,
            on_transition: Event::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn on_transition(&self) -> &Event<TransitionRecord<W::Entity, E>> {
        &self.on_transition
    }

    pub fn pending_messages(&self) -> usize {
        self.mailbox.len()
    }

    /// Listens to the store's construct notifications so that every newly
    /// attached component enters its initial tag on the next pump.
    pub fn attach(&mut self, world: &W) -> Result<(), StateMachineError> {
        if self.construct.as_ref().is_some_and(Subscription::is_active) {
            return Err(StateMachineError::AlreadyAttached { machine: self.name });
        }
        let mailbox = self.mailbox.clone();
        let subscription = world.state_constructed().subscribe(move |entity| {
            mailbox.push(Envelope {
                entity: *entity,
                epoch: None,
                message: Message::Constructed,
            });
        });
        self.construct = Some(subscription);
        Ok(())
    }

    pub fn detach(&mut self) {
        if let Some(subscription) = self.construct.take() {
            subscription.unsubscribe();
        }
    }

    /// Persistent poster addressed to `entity`.
    pub fn poster(&self, entity: W::Entity) -> Poster<W::Entity, E> {
        self.mailbox.poster(entity, None)
    }

    pub fn current(&self, world: &W, entity: W::Entity) -> Option<E> {
        world.state(entity).map(|component| component.current())
    }

    /// Moves `entity` to `next`. A no-op if `next` is already current or the
    /// state is locked.
    pub fn change_state(
        &self,
        world: &mut W,
        entity: W::Entity,
        next: E,
    ) -> Result<bool, StateMachineError> {
        self.require_component(world, entity)?;
        Ok(self.transition(world, entity, next, None))
    }

    /// Moves `entity` to `next` with explicit enter arguments, re-entering
    /// `next` if it is already current.
    pub fn change_state_with(
        &self,
        world: &mut W,
        entity: W::Entity,
        next: E,
        args: E::Args,
    ) -> Result<bool, StateMachineError> {
        self.require_component(world, entity)?;
        Ok(self.transition(world, entity, next, Some(args)))
    }

    /// Runs the attach hook and the initial tag's `on_enter` for a component
    /// that has not been entered yet. Does nothing otherwise.
    pub fn enter_initial(&self, world: &mut W, entity: W::Entity) {
        let Some(component) = world.state_mut(entity) else {
            trace!(target: "state_machine", machine = self.name, %entity, "construct for missing component");
            return;
        };
        if component.has_entered() {
            return;
        }
        let initial = component.current();
        let epoch = component.enter(initial);
        debug!(
            target: "state_machine",
            machine = self.name,
            %entity,
            state = ?initial,
            %epoch,
            "initial state entered"
        );

        let mut cx = StateContext::new(entity, epoch, self.mailbox.clone());
        if let Some(hook) = &self.on_attach {
            hook(world, &mut cx);
        }
        self.handler(initial).on_enter(world, &mut cx, E::Args::default());
        self.apply(world, cx);
    }

    /// Pumps the mailbox, then updates every entity in store order.
    pub fn update(&self, world: &mut W) {
        self.dispatch(world);

        for entity in world.state_entities() {
            let Some((current, epoch)) = world.state(entity).map(|c| (c.current(), c.epoch())) else {
                continue;
            };
            if epoch == Epoch::UNENTERED {
                self.enter_initial(world, entity);
                self.dispatch(world);
                continue;
            }

            let mut cx = StateContext::new(entity, epoch, self.mailbox.clone());
            self.handler(current).update(world, &mut cx);
            self.apply(world, cx);
            self.dispatch(world);
        }
    }

    pub fn draw(&self, world: &W) {
        for entity in world.state_entities() {
            if let Some(component) = world.state(entity)
                && component.has_entered()
            {
                self.handler(component.current()).draw(world, entity);
            }
        }
    }

    /// Delivers queued messages until the mailbox is empty or the budget runs
    /// out.
    pub fn dispatch(&self, world: &mut W) {
        let mut budget = DISPATCH_BUDGET;
        loop {
            if budget == 0 {
                warn!(
                    target: "state_machine",
                    machine = self.name,
                    remaining = self.mailbox.len(),
                    "dispatch budget exhausted, deferring messages"
                );
                break;
            }
            let Some(envelope) = self.mailbox.pop() else {
                break;
            };
            budget -= 1;
            self.deliver(world, envelope);
        }
    }

    fn deliver(&self, world: &mut W, envelope: Envelope<W::Entity, E>) {
        let Envelope {
            entity,
            epoch,
            message,
        } = envelope;

        if let Message::Constructed = message {
            self.enter_initial(world, entity);
            return;
        }

        let Some((current, current_epoch)) = world.state(entity).map(|c| (c.current(), c.epoch()))
        else {
            trace!(target: "state_machine", machine = self.name, %entity, "message for missing component dropped");
            return;
        };
        if current_epoch == Epoch::UNENTERED {
            trace!(target: "state_machine", machine = self.name, %entity, "message before initial enter dropped");
            return;
        }
        if let Some(posted) = epoch
            && posted != current_epoch
        {
            trace!(
                target: "state_machine",
                machine = self.name,
                %entity,
                %posted,
                current = %current_epoch,
                "stale message dropped"
            );
            return;
        }

        match message {
            Message::Signal(signal) => {
                let mut cx = StateContext::new(entity, current_epoch, self.mailbox.clone());
                self.handler(current).on_signal(world, &mut cx, signal);
                self.apply(world, cx);
            }
            Message::Transition { next, args } => {
                self.transition(world, entity, next, args);
            }
            Message::Constructed => {}
        }
    }

    fn transition(&self, world: &mut W, entity: W::Entity, next: E, args: Option<E::Args>) -> bool {
        let Some(entered) = world.state(entity).map(|component| component.has_entered()) else {
            return false;
        };
        if !entered {
            self.enter_initial(world, entity);
        }

        let Some(component) = world.state_mut(entity) else {
            return false;
        };
        let from = component.current();
        if component.is_locked() {
            trace!(target: "state_machine", machine = self.name, %entity, ?from, to = ?next, "locked, transition ignored");
            return false;
        }
        if from == next && args.is_none() {
            trace!(target: "state_machine", machine = self.name, %entity, state = ?from, "self transition ignored");
            return false;
        }

        component.remove_all_subscriptions();
        self.handler(from).on_exit(world, entity);

        let Some(component) = world.state_mut(entity) else {
            debug!(target: "state_machine", machine = self.name, %entity, ?from, "component removed during exit");
            return false;
        };
        let epoch = component.enter(next);
        debug!(
            target: "state_machine",
            machine = self.name,
            %entity,
            ?from,
            to = ?next,
            %epoch,
            "state transition"
        );
        self.on_transition.publish(&TransitionRecord {
            entity,
            from,
            to: next,
            epoch,
        });

        let mut cx = StateContext::new(entity, epoch, self.mailbox.clone());
        self.handler(next)
            .on_enter(world, &mut cx, args.unwrap_or_default());
        self.apply(world, cx);
        true
    }

    /// Commits what a handler requested through its context.
    fn apply(&self, world: &mut W, cx: StateContext<W::Entity, E>) {
        let entity = cx.entity();
        let epoch = cx.epoch();
        let StateContext {
            requests,
            subscriptions,
            persistent,
            lock,
            ..
        } = cx;

        let Some(component) = world.state_mut(entity) else {
            return;
        };
        if component.epoch() != epoch {
            // Component was replaced while the handler ran; everything it
            // asked for belonged to the old one.
            trace!(target: "state_machine", machine = self.name, %entity, "context outlived its component");
            return;
        }
        for subscription in subscriptions {
            component.manage_subscription(subscription);
        }
        for subscription in persistent {
            component.manage_persistent_subscription(subscription);
        }
        if let Some(locked) = lock {
            component.set_locked(locked);
        }

        for Request { next, args } in requests {
            self.transition(world, entity, next, args);
        }
    }

    fn handler(&self, tag: E) -> &dyn State<W, E> {
        match self.handlers.get(&tag) {
            Some(handler) => handler.as_ref(),
            None => panic!("state machine `{}` has no handler for {tag:?}", self.name),
        }
    }

    fn require_component(&self, world: &W, entity: W::Entity) -> Result<(), StateMachineError> {
        match world.state(entity) {
            Some(_) => Ok(()),
            None => Err(StateMachineError::ComponentMissing {
                machine: self.name,
                entity: entity.to_string(),
            }),
        }
    }
}

impl<W: StateWorld<E>, E: StateTag> fmt::Debug for StateMachine<W, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("name", &self.name)
            .field("states", &self.handlers.keys().collect::<Vec<_>>())
            .field("pending", &self.mailbox.len())
            .field("attached", &self.construct.is_some())
            .finish()
    }
}
