//! An actor that keeps running at wall-clock speed under global dilation.

use std::cell::Cell;
use std::rc::Rc;

use masstime_core::events::{ClockEvent, SubscriberId};
use masstime_core::time::SimClock;
use tracing::debug;

pub struct RealTimeActor {
    id: SubscriberId,
    clock: Rc<SimClock>,
    custom_time_dilation: Cell<f32>,
}

impl RealTimeActor {
    pub fn begin_play(clock: &Rc<SimClock>) -> Rc<Self> {
        let actor = Rc::new(Self {
            id: SubscriberId::next(),
            clock: Rc::clone(clock),
            custom_time_dilation: Cell::new(clock.real_dilation()),
        });

        let weak = Rc::downgrade(&actor);
        clock
            .notifier()
            .subscribe(ClockEvent::DilationChanged, actor.id, move |clock: &SimClock| {
                if let Some(actor) = weak.upgrade() {
                    actor.custom_time_dilation.set(clock.real_dilation());
                    debug!(
                        custom_time_dilation = clock.real_dilation(),
                        "Real-time actor compensated global dilation"
                    );
                }
            });
        actor
    }

    pub fn end_play(&self) {
        self.clock.notifier().unsubscribe(self.id);
    }

    pub fn custom_time_dilation(&self) -> f32 {
        self.custom_time_dilation.get()
    }

    /// Global dilation times the actor's own. Stays at 1 while subscribed.
    pub fn effective_dilation(&self) -> f32 {
        self.clock.dilation() * self.custom_time_dilation()
    }

    /// Seconds this actor advances for a frame of `dilated_delta` world seconds.
    pub fn actor_delta(&self, dilated_delta: f32) -> f32 {
        dilated_delta * self.custom_time_dilation()
    }
}
