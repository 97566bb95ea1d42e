//! In-process pausable entity engine.
//!
//! Pause and resume calls only queue a request. The request is applied at
//! the next safe point (`process_pending`), after which every subscriber is
//! notified in registration order.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use masstime_core::events::SubscriberId;
use masstime_core::host::{EngineCallback, MassSimulation};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingRequest {
    Pause,
    Resume,
}

struct PauseSubscriber {
    owner: SubscriberId,
    on_paused: Rc<dyn Fn()>,
    on_resumed: Rc<dyn Fn()>,
}

#[derive(Default)]
pub struct LocalMassSimulation {
    paused: Cell<bool>,
    pending: Cell<Option<PendingRequest>>,
    subscribers: RefCell<Vec<PauseSubscriber>>,
    cycles: Cell<u64>,
}

impl LocalMassSimulation {
    pub fn new(paused: bool) -> Self {
        Self {
            paused: Cell::new(paused),
            ..Self::default()
        }
    }

    /// Runs one processing cycle and applies the last queued request.
    ///
    /// Returns the new pause state when a transition happened. A request
    /// matching the current state is dropped without notifying anyone.
    pub fn process_pending(&self) -> Option<bool> {
        self.cycles.set(self.cycles.get() + 1);

        let paused = match self.pending.take()? {
            PendingRequest::Pause => true,
            PendingRequest::Resume => false,
        };
        if paused == self.paused.get() {
            return None;
        }
        self.paused.set(paused);
        debug!(paused, cycle = self.cycles.get(), "Mass simulation applied pause request");

        let callbacks: Vec<Rc<dyn Fn()>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|s| {
                if paused {
                    Rc::clone(&s.on_paused)
                } else {
                    Rc::clone(&s.on_resumed)
                }
            })
            .collect();
        for callback in callbacks {
            callback();
        }
        Some(paused)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.get().is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    pub fn cycles(&self) -> u64 {
        self.cycles.get()
    }
}

impl MassSimulation for LocalMassSimulation {
    fn is_simulation_paused(&self) -> bool {
        self.paused.get()
    }

    fn pause_simulation(&self) {
        self.pending.set(Some(PendingRequest::Pause));
    }

    fn resume_simulation(&self) {
        self.pending.set(Some(PendingRequest::Resume));
    }

    fn subscribe_pause_events(
        &self,
        owner: SubscriberId,
        on_paused: EngineCallback,
        on_resumed: EngineCallback,
    ) {
        self.subscribers.borrow_mut().push(PauseSubscriber {
            owner,
            on_paused: Rc::from(on_paused),
            on_resumed: Rc::from(on_resumed),
        });
    }

    fn unsubscribe_pause_events(&self, owner: SubscriberId) {
        self.subscribers.borrow_mut().retain(|s| s.owner != owner);
    }
}
