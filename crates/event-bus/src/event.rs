//! Event publisher and its subscriber table.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::subscription::{Revoke, Subscription};

/// Identifier handed out to each subscriber of a single event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(pub u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

type Callback<A> = Rc<dyn Fn(&A)>;

struct Slots<A> {
    next_id: Cell<u64>,
    callbacks: RefCell<BTreeMap<SubscriberId, Callback<A>>>,
}

impl<A> Revoke for Slots<A> {
    fn revoke(&self, id: SubscriberId) {
        // Unknown ids are ignored: the subscriber may already be gone.
        self.callbacks.borrow_mut().remove(&id);
    }

    fn contains(&self, id: SubscriberId) -> bool {
        self.callbacks.borrow().contains_key(&id)
    }
}

/// A typed event that callbacks can subscribe to.
///
/// Cloning an `Event` yields another handle to the same subscriber table, so
/// a component can hand out its events to other systems without lifetimes.
/// Subscriptions stay valid until they are revoked or every handle is dropped.
pub struct Event<A: 'static> {
    slots: Rc<Slots<A>>,
}

impl<A: 'static> Event<A> {
    pub fn new() -> Self {
        Self {
            slots: Rc::new(Slots {
                next_id: Cell::new(0),
                callbacks: RefCell::new(BTreeMap::new()),
            }),
        }
    }

    /// Registers `callback` and returns the handle that owns the registration.
    ///
    /// Dropping the returned [`Subscription`] revokes the callback. Use
    /// [`Subscription::detach`] for hookups that must live as long as the event.
    pub fn subscribe(&self, callback: impl Fn(&A) + 'static) -> Subscription {
        let id = SubscriberId(self.slots.next_id.get());
        self.slots.next_id.set(id.0 + 1);
        self.slots
            .callbacks
            .borrow_mut()
            .insert(id, Rc::new(callback));

        let source: Rc<dyn Revoke> = self.slots.clone();
        let source: Weak<dyn Revoke> = Rc::downgrade(&source);
        Subscription::new(source, id)
    }

    /// Invokes every subscriber registered at the moment of the call.
    ///
    /// Callbacks added during this pass are not invoked until the next
    /// `publish`. Callbacks revoked during this pass by an earlier callback
    /// are skipped.
    pub fn publish(&self, args: &A) {
        let snapshot: Vec<(SubscriberId, Callback<A>)> = self
            .slots
            .callbacks
            .borrow()
            .iter()
            .map(|(id, callback)| (*id, Rc::clone(callback)))
            .collect();
        if snapshot.is_empty() {
            tracing::trace!(target: "event_bus", "publish with no subscribers");
            return;
        }
        for (id, callback) in snapshot {
            if !self.slots.contains(id) {
                tracing::trace!(target: "event_bus", subscriber = %id, "skipping revoked subscriber");
                continue;
            }
            callback(args);
        }
    }

    /// Revokes the subscriber with `id`; unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.slots.revoke(id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.slots.callbacks.borrow().len()
    }

    pub fn has_subscribers(&self) -> bool {
        self.subscriber_count() > 0
    }
}

impl<A: 'static> Default for Event<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static> Clone for Event<A> {
    fn clone(&self) -> Self {
        Self {
            slots: Rc::clone(&self.slots),
        }
    }
}

impl<A: 'static> fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn publish_reaches_every_subscriber() {
        let event = Event::<i32>::new();
        let total = Rc::new(Cell::new(0));

        let t1 = total.clone();
        let _a = event.subscribe(move |v| t1.set(t1.get() + *v));
        let t2 = total.clone();
        let _b = event.subscribe(move |v| t2.set(t2.get() + *v * 10));

        event.publish(&2);
        assert_eq!(total.get(), 22);
    }

    #[test]
    fn self_unsubscribe_during_publish_keeps_others() {
        let event = Event::<()>::new();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let own: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let c = calls.clone();
        let _first = event.subscribe(move |_| c.borrow_mut().push("first"));

        let c = calls.clone();
        let slot = own.clone();
        let sub = event.subscribe(move |_| {
            c.borrow_mut().push("quitter");
            if let Some(sub) = slot.borrow_mut().take() {
                sub.unsubscribe();
            }
        });
        *own.borrow_mut() = Some(sub);

        let c = calls.clone();
        let _last = event.subscribe(move |_| c.borrow_mut().push("last"));

        event.publish(&());
        assert_eq!(*calls.borrow(), vec!["first", "quitter", "last"]);

        calls.borrow_mut().clear();
        event.publish(&());
        assert_eq!(*calls.borrow(), vec!["first", "last"]);
    }

    #[test]
    fn subscriber_revoked_by_another_is_skipped_in_the_same_pass() {
        let event = Event::<()>::new();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let target: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let c = calls.clone();
        let slot = target.clone();
        let _revoker = event.subscribe(move |_| {
            c.borrow_mut().push("revoker");
            drop(slot.borrow_mut().take());
        });

        let c = calls.clone();
        let revoked = event.subscribe(move |_| c.borrow_mut().push("revoked"));
        *target.borrow_mut() = Some(revoked);

        event.publish(&());
        assert_eq!(*calls.borrow(), vec!["revoker"]);
        assert_eq!(event.subscriber_count(), 1);
    }

    #[test]
    fn subscriber_added_during_publish_waits_for_next_pass() {
        let event = Event::<()>::new();
        let late_calls = Rc::new(Cell::new(0));
        let keep: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));

        let handle = event.clone();
        let late = late_calls.clone();
        let store = keep.clone();
        let _adder = event.subscribe(move |_| {
            if store.borrow().is_empty() {
                let late = late.clone();
                let sub = handle.subscribe(move |_| late.set(late.get() + 1));
                store.borrow_mut().push(sub);
            }
        });

        event.publish(&());
        assert_eq!(late_calls.get(), 0);

        event.publish(&());
        assert_eq!(late_calls.get(), 1);
    }

    #[test]
    fn unsubscribe_unknown_id_is_ignored() {
        let event = Event::<u8>::new();
        event.unsubscribe(SubscriberId(42));
        assert_eq!(event.subscriber_count(), 0);
    }

    #[test]
    fn clones_share_subscribers() {
        let event = Event::<u8>::new();
        let other = event.clone();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let _sub = other.subscribe(move |_| h.set(h.get() + 1));

        event.publish(&0);
        assert_eq!(hits.get(), 1);
        assert_eq!(event.subscriber_count(), 1);
    }
}
