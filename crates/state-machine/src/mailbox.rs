//! Deferred delivery from event callbacks to state handlers.
//!
//! Event callbacks run while the publisher is borrowed, so they cannot reach
//! into the world or the machine. Instead they hold a [`Poster`] and queue a
//! message; the machine drains the queue at well-defined points of its
//! update loop.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::{Epoch, StateTag};

pub(crate) enum Message<E: StateTag> {
    /// A state component was attached through the store.
    Constructed,
    Signal(E::Signal),
    /// `args == None` is a plain change (no-op on the current tag).
    Transition { next: E, args: Option<E::Args> },
}

pub(crate) struct Envelope<K, E: StateTag> {
    pub entity: K,
    /// `None` for persistent posters, which outlive individual states.
    pub epoch: Option<Epoch>,
    pub message: Message<E>,
}

/// FIFO queue shared between a machine and the posters it hands out.
pub struct Mailbox<K, E: StateTag> {
    queue: Rc<RefCell<VecDeque<Envelope<K, E>>>>,
}

impl<K: Copy, E: StateTag> Mailbox<K, E> {
    pub fn new() -> Self {
        Self {
            queue: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    pub(crate) fn push(&self, envelope: Envelope<K, E>) {
        self.queue.borrow_mut().push_back(envelope);
    }

    pub(crate) fn pop(&self) -> Option<Envelope<K, E>> {
        self.queue.borrow_mut().pop_front()
    }

    pub(crate) fn poster(&self, entity: K, epoch: Option<Epoch>) -> Poster<K, E> {
        Poster {
            mailbox: self.clone(),
            entity,
            epoch,
        }
    }
}

impl<K: Copy, E: StateTag> Default for Mailbox<K, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, E: StateTag> Clone for Mailbox<K, E> {
    fn clone(&self) -> Self {
        Self {
            queue: Rc::clone(&self.queue),
        }
    }
}

/// Address of one entity's machine, optionally pinned to a single epoch.
///
/// Posters obtained from [`StateContext::poster`](crate::StateContext::poster)
/// are pinned: once the state that created them exits, anything they post is
/// discarded. Persistent posters deliver to whichever state is current.
pub struct Poster<K, E: StateTag> {
    mailbox: Mailbox<K, E>,
    entity: K,
    epoch: Option<Epoch>,
}

impl<K: Copy, E: StateTag> Poster<K, E> {
    pub fn entity(&self) -> K {
        self.entity
    }

    pub fn is_persistent(&self) -> bool {
        self.epoch.is_none()
    }

    /// Queues `signal` for the handler of the entity's current state.
    pub fn signal(&self, signal: E::Signal) {
        self.post(Message::Signal(signal));
    }

    /// Queues a plain transition; ignored if `next` is already current.
    pub fn change_state(&self, next: E) {
        self.post(Message::Transition { next, args: None });
    }

    /// Queues a transition that always runs exit and enter.
    pub fn change_state_with(&self, next: E, args: E::Args) {
        self.post(Message::Transition {
            next,
            args: Some(args),
        });
    }

    fn post(&self, message: Message<E>) {
        self.mailbox.push(Envelope {
            entity: self.entity,
            epoch: self.epoch,
            message,
        });
    }
}

impl<K: Copy, E: StateTag> Clone for Poster<K, E> {
    fn clone(&self) -> Self {
        Self {
            mailbox: self.mailbox.clone(),
            entity: self.entity,
            epoch: self.epoch,
        }
    }
}

impl<K: fmt::Debug, E: StateTag> fmt::Debug for Poster<K, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Poster")
            .field("domain", &E::domain())
            .field("entity", &self.entity)
            .field("epoch", &self.epoch)
            .finish()
    }
}
