//! Ordered multicast of clock events.
//!
//! Callbacks run synchronously on the calling thread in registration order.
//! There is no lock and no re-entrancy guard: a callback may broadcast again,
//! subscribe, or unsubscribe while a broadcast is in flight. A broadcast
//! invokes the snapshot of subscribers taken when it started.

use std::cell::RefCell;
use std::rc::Rc;

use super::{ClockEvent, SubscriberId};

type Callback<P> = Rc<dyn Fn(&P)>;

struct Subscription<P: ?Sized> {
    owner: SubscriberId,
    event: ClockEvent,
    callback: Callback<P>,
}

pub struct ChangeNotifier<P: ?Sized> {
    subscriptions: RefCell<Vec<Subscription<P>>>,
}

impl<P: ?Sized> Default for ChangeNotifier<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ?Sized> ChangeNotifier<P> {
    pub fn new() -> Self {
        Self {
            subscriptions: RefCell::new(Vec::new()),
        }
    }

    /// Appends `callback` to the list for `event`.
    ///
    /// The same owner may register any number of times, for the same or
    /// different events.
    pub fn subscribe<F>(&self, event: ClockEvent, owner: SubscriberId, callback: F)
    where
        F: Fn(&P) + 'static,
    {
        self.subscriptions.borrow_mut().push(Subscription {
            owner,
            event,
            callback: Rc::new(callback),
        });
    }

    /// Removes every callback registered by `owner`. Returns how many were removed.
    pub fn unsubscribe(&self, owner: SubscriberId) -> usize {
        let mut subscriptions = self.subscriptions.borrow_mut();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.owner != owner);
        before - subscriptions.len()
    }

    /// Invokes every subscriber of `event` with `payload`. Returns how many ran.
    pub fn broadcast(&self, event: ClockEvent, payload: &P) -> usize {
        let snapshot: Vec<Callback<P>> = self
            .subscriptions
            .borrow()
            .iter()
            .filter(|s| s.event == event)
            .map(|s| Rc::clone(&s.callback))
            .collect();

        for callback in &snapshot {
            callback(payload);
        }
        snapshot.len()
    }

    pub fn subscriber_count(&self, event: ClockEvent) -> usize {
        self.subscriptions
            .borrow()
            .iter()
            .filter(|s| s.event == event)
            .count()
    }

    pub fn is_subscribed(&self, owner: SubscriberId) -> bool {
        self.subscriptions.borrow().iter().any(|s| s.owner == owner)
    }

    /// Drops every subscription. Used on clock teardown.
    pub fn clear(&self) {
        self.subscriptions.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[test]
    fn invokes_in_registration_order() {
        let notifier = ChangeNotifier::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let seen = seen.clone();
            notifier.subscribe(ClockEvent::DilationChanged, SubscriberId::next(), move |v| {
                seen.borrow_mut().push((tag, *v));
            });
        }

        assert_eq!(notifier.broadcast(ClockEvent::DilationChanged, &7), 3);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7), ("c", 7)]);
    }

    #[test]
    fn only_matching_event_kind_fires() {
        let notifier = ChangeNotifier::<()>::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        notifier.subscribe(ClockEvent::PauseChanged, SubscriberId::next(), move |_| {
            h.set(h.get() + 1)
        });

        assert_eq!(notifier.broadcast(ClockEvent::ResumeChanged, &()), 0);
        assert_eq!(notifier.broadcast(ClockEvent::PauseChanged, &()), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn unsubscribe_removes_all_registrations_of_owner() {
        let notifier = ChangeNotifier::<()>::new();
        let owner = SubscriberId::next();
        let other = SubscriberId::next();

        notifier.subscribe(ClockEvent::PauseChanged, owner, |_| {});
        notifier.subscribe(ClockEvent::ResumeChanged, owner, |_| {});
        notifier.subscribe(ClockEvent::PauseChanged, owner, |_| {});
        notifier.subscribe(ClockEvent::PauseChanged, other, |_| {});

        assert_eq!(notifier.unsubscribe(owner), 3);
        assert!(!notifier.is_subscribed(owner));
        assert!(notifier.is_subscribed(other));
        assert_eq!(notifier.subscriber_count(ClockEvent::PauseChanged), 1);
        assert_eq!(notifier.unsubscribe(owner), 0);
    }

    #[test]
    fn unsubscribe_during_broadcast_does_not_panic() {
        let notifier = Rc::new(ChangeNotifier::<()>::new());
        let owner = SubscriberId::next();
        let calls = Rc::new(Cell::new(0));

        let n = Rc::downgrade(&notifier);
        let c = calls.clone();
        notifier.subscribe(ClockEvent::PauseChanged, owner, move |_| {
            c.set(c.get() + 1);
            if let Some(n) = n.upgrade() {
                n.unsubscribe(owner);
            }
        });
        let c = calls.clone();
        notifier.subscribe(ClockEvent::PauseChanged, owner, move |_| c.set(c.get() + 1));

        // Both run: the broadcast iterates the snapshot taken before removal.
        assert_eq!(notifier.broadcast(ClockEvent::PauseChanged, &()), 2);
        assert_eq!(calls.get(), 2);
        assert_eq!(notifier.broadcast(ClockEvent::PauseChanged, &()), 0);
    }

    #[test]
    fn recursive_broadcast_is_allowed() {
        let notifier = Rc::new(ChangeNotifier::<u32>::new());
        let depth_seen = Rc::new(RefCell::new(Vec::new()));

        let n = Rc::downgrade(&notifier);
        let seen = depth_seen.clone();
        notifier.subscribe(ClockEvent::DilationChanged, SubscriberId::next(), move |depth| {
            seen.borrow_mut().push(*depth);
            if *depth < 3 {
                if let Some(n) = n.upgrade() {
                    n.broadcast(ClockEvent::DilationChanged, &(depth + 1));
                }
            }
        });

        notifier.broadcast(ClockEvent::DilationChanged, &0);
        assert_eq!(*depth_seen.borrow(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn subscribe_during_broadcast_applies_to_next_broadcast() {
        let notifier = Rc::new(ChangeNotifier::<()>::new());
        let late_calls = Rc::new(Cell::new(0));

        let n = Rc::downgrade(&notifier);
        let late = late_calls.clone();
        notifier.subscribe(ClockEvent::ResumeChanged, SubscriberId::next(), move |_| {
            if let Some(n) = n.upgrade() {
                let late = late.clone();
                n.subscribe(ClockEvent::ResumeChanged, SubscriberId::next(), move |_| {
                    late.set(late.get() + 1)
                });
            }
        });

        notifier.broadcast(ClockEvent::ResumeChanged, &());
        assert_eq!(late_calls.get(), 0);
        notifier.broadcast(ClockEvent::ResumeChanged, &());
        assert_eq!(late_calls.get(), 1);
    }

    #[test]
    fn clear_drops_everything() {
        let notifier = ChangeNotifier::<()>::new();
        notifier.subscribe(ClockEvent::PauseChanged, SubscriberId::next(), |_| {});
        notifier.subscribe(ClockEvent::DilationChanged, SubscriberId::next(), |_| {});
        notifier.clear();
        assert_eq!(notifier.subscriber_count(ClockEvent::PauseChanged), 0);
        assert_eq!(notifier.subscriber_count(ClockEvent::DilationChanged), 0);
    }
}
