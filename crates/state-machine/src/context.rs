//! Handler-side view of one dispatch call.

use std::fmt;

use event_bus::Subscription;

use crate::{Epoch, Poster, StateTag};
use crate::mailbox::Mailbox;

pub(crate) struct Request<E: StateTag> {
    pub next: E,
    /// `None` for a plain change.
    pub args: Option<E::Args>,
}

/// Collects what a handler asks for while it runs.
///
/// Nothing requested here takes effect until the handler returns. The machine
/// then stores the subscriptions on the entity's component, applies any lock
/// change and finally performs the requested transitions in order.
pub struct StateContext<K, E: StateTag> {
    entity: K,
    epoch: Epoch,
    mailbox: Mailbox<K, E>,
    pub(crate) requests: Vec<Request<E>>,
    pub(crate) subscriptions: Vec<Subscription>,
    pub(crate) persistent: Vec<Subscription>,
    pub(crate) lock: Option<bool>,
}

impl<K: Copy, E: StateTag> StateContext<K, E> {
    pub(crate) fn new(entity: K, epoch: Epoch, mailbox: Mailbox<K, E>) -> Self {
        Self {
            entity,
            epoch,
            mailbox,
            requests: Vec::new(),
            subscriptions: Vec::new(),
            persistent: Vec::new(),
            lock: None,
        }
    }

    pub fn entity(&self) -> K {
        self.entity
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Requests a transition. Ignored if `next` is current when applied.
    pub fn change_state(&mut self, next: E) {
        self.requests.push(Request { next, args: None });
    }

    /// Requests a transition that runs exit and enter even for the current tag.
    pub fn change_state_with(&mut self, next: E, args: E::Args) {
        self.requests.push(Request {
            next,
            args: Some(args),
        });
    }

    /// Hands a subscription to the current tag; it is revoked on exit.
    pub fn manage(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    /// Hands a subscription to the component; it survives transitions.
    pub fn manage_persistent(&mut self, subscription: Subscription) {
        self.persistent.push(subscription);
    }

    /// Poster that only delivers while the current tag stays entered.
    pub fn poster(&self) -> Poster<K, E> {
        self.mailbox.poster(self.entity, Some(self.epoch))
    }

    /// Poster that delivers to whatever tag is current at dispatch time.
    pub fn persistent_poster(&self) -> Poster<K, E> {
        self.mailbox.poster(self.entity, None)
    }

    /// Poster addressed to another entity of the same machine.
    pub fn poster_for(&self, entity: K) -> Poster<K, E> {
        self.mailbox.poster(entity, None)
    }

    /// Blocks transitions until unlocked or until the tag exits.
    pub fn lock_state(&mut self) {
        self.lock = Some(true);
    }

    pub fn unlock_state(&mut self) {
        self.lock = Some(false);
    }

    pub fn has_requests(&self) -> bool {
        !self.requests.is_empty()
    }
}

impl<K: fmt::Debug, E: StateTag> fmt::Debug for StateContext<K, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateContext")
            .field("entity", &self.entity)
            .field("epoch", &self.epoch)
            .field("requests", &self.requests.len())
            .field("subscriptions", &self.subscriptions.len())
            .field("lock", &self.lock)
            .finish()
    }
}
