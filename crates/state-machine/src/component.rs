//! Per-entity state record.

use std::fmt;

use event_bus::Subscription;

use crate::StateTag;

/// Counts how many times an entity has entered a state.
///
/// Epoch zero means the initial tag has not been entered yet. Mailbox
/// messages carry the epoch they were posted under so that anything posted by
/// a state that has since exited can be dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch(pub u64);

impl Epoch {
    pub const UNENTERED: Self = Self(0);

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Current tag of one entity plus the subscriptions that tag owns.
///
/// `subscriptions` is empty whenever `on_exit` has completed for a tag.
/// `persistent` subscriptions survive transitions and are released only when
/// the component itself is dropped.
pub struct StateComponent<E: StateTag> {
    current: E,
    epoch: Epoch,
    locked: bool,
    subscriptions: Vec<Subscription>,
    persistent: Vec<Subscription>,
}

impl<E: StateTag> StateComponent<E> {
    pub fn new(initial: E) -> Self {
        Self {
            current: initial,
            epoch: Epoch::UNENTERED,
            locked: false,
            subscriptions: Vec::new(),
            persistent: Vec::new(),
        }
    }

    pub fn current(&self) -> E {
        self.current
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn has_entered(&self) -> bool {
        self.epoch != Epoch::UNENTERED
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Adds a subscription that is released when the current tag exits.
    pub fn manage_subscription(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    /// Adds a subscription that lives as long as this component.
    pub fn manage_persistent_subscription(&mut self, subscription: Subscription) {
        self.persistent.push(subscription);
    }

    /// Revokes every subscription owned by the current tag.
    pub fn remove_all_subscriptions(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
    }

    /// Number of tag-scoped subscriptions that are still connected.
    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.iter().filter(|s| s.is_active()).count()
    }

    pub fn persistent_subscriptions(&self) -> usize {
        self.persistent.iter().filter(|s| s.is_active()).count()
    }

    pub(crate) fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Switches to `next` and opens a new epoch. Locks do not carry over.
    pub(crate) fn enter(&mut self, next: E) -> Epoch {
        self.current = next;
        self.locked = false;
        self.epoch = self.epoch.next();
        self.epoch
    }
}

impl<E: StateTag> fmt::Debug for StateComponent<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateComponent")
            .field("current", &self.current)
            .field("epoch", &self.epoch)
            .field("locked", &self.locked)
            .field("subscriptions", &self.subscriptions.len())
            .field("persistent", &self.persistent.len())
            .finish()
    }
}
