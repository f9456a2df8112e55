//! RAII subscription handle.

use std::fmt;
use std::rc::Weak;

use crate::event::SubscriberId;

/// Type-erased view of an event's subscriber table.
pub(crate) trait Revoke {
    fn revoke(&self, id: SubscriberId);
    fn contains(&self, id: SubscriberId) -> bool;
}

/// Owns one registration on an [`Event`](crate::Event).
///
/// The handle holds only a weak reference to the event, so it never keeps a
/// publisher alive and never dangles: once the event is gone the handle simply
/// reports inactive.
#[must_use = "dropping a Subscription immediately revokes the callback"]
pub struct Subscription {
    source: Option<Weak<dyn Revoke>>,
    id: SubscriberId,
}

impl Subscription {
    pub(crate) fn new(source: Weak<dyn Revoke>, id: SubscriberId) -> Self {
        Self {
            source: Some(source),
            id,
        }
    }

    /// A handle that was never connected to an event.
    pub fn empty() -> Self {
        Self {
            source: None,
            id: SubscriberId(u64::MAX),
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// True while the callback is still registered on a live event.
    pub fn is_active(&self) -> bool {
        self.source
            .as_ref()
            .and_then(Weak::upgrade)
            .is_some_and(|source| source.contains(self.id))
    }

    /// Revokes the callback. Safe to call repeatedly and after the event died.
    pub fn unsubscribe(mut self) {
        self.revoke();
    }

    /// Gives up ownership of the registration, leaving the callback attached
    /// for as long as the event lives.
    pub fn detach(mut self) {
        self.source = None;
    }

    fn revoke(&mut self) {
        if let Some(source) = self.source.take().and_then(|weak| weak.upgrade()) {
            source.revoke(self.id);
        }
    }
}

impl Default for Subscription {
    fn default() -> Self {
        Self::empty()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.revoke();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::Event;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn drop_revokes() {
        let event = Event::<()>::new();
        let sub = event.subscribe(|_| {});
        assert!(sub.is_active());
        drop(sub);
        assert_eq!(event.subscriber_count(), 0);
    }

    #[test]
    fn revoke_after_event_dropped_is_noop() {
        let event = Event::<()>::new();
        let sub = event.subscribe(|_| {});
        drop(event);
        assert!(!sub.is_active());
        sub.unsubscribe();
    }

    #[test]
    fn detach_keeps_callback() {
        let event = Event::<()>::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        event.subscribe(move |_| h.set(h.get() + 1)).detach();

        event.publish(&());
        assert_eq!(hits.get(), 1);
        assert_eq!(event.subscriber_count(), 1);
    }

    #[test]
    fn empty_handle_is_inactive() {
        let sub = super::Subscription::empty();
        assert!(!sub.is_active());
    }
}
