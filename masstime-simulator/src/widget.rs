//! Headless model of the on-screen simulation control panel.
//!
//! Pause label and speed controls follow clock events immediately. The
//! tick, elapsed and delta readouts are throttled to one refresh per
//! `update_interval` of real time, so they keep a steady rate whatever the
//! dilation is.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use masstime_config::WidgetConfig;
use masstime_core::events::{ClockEvent, SubscriberId};
use masstime_core::time::{RequestOutcome, SimClock};
use masstime_core::TimeControlError;

/// What the panel currently displays.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PanelView {
    pub pause_label: &'static str,
    pub speed_text: String,
    pub can_increase: bool,
    pub can_decrease: bool,
    pub tick_text: String,
    pub elapsed_text: String,
    pub delta_text: String,
}

pub struct SimControlPanel {
    id: SubscriberId,
    clock: Rc<SimClock>,
    update_interval: f32,
    since_refresh: Cell<Option<f32>>,
    refreshes: Cell<u64>,
    view: RefCell<PanelView>,
}

impl SimControlPanel {
    pub fn construct(clock: &Rc<SimClock>, config: &WidgetConfig) -> Rc<Self> {
        let panel = Rc::new(Self {
            id: SubscriberId::next(),
            clock: Rc::clone(clock),
            update_interval: config.update_interval,
            since_refresh: Cell::new(None),
            refreshes: Cell::new(0),
            view: RefCell::new(PanelView::default()),
        });

        panel.show_pause_state(clock.is_paused());
        panel.show_speed_state(clock);

        let notifier = clock.notifier();
        let weak = Rc::downgrade(&panel);
        notifier.subscribe(ClockEvent::PauseChanged, panel.id, with_panel(&weak, |p, _| {
            p.show_pause_state(true)
        }));
        notifier.subscribe(ClockEvent::ResumeChanged, panel.id, with_panel(&weak, |p, _| {
            p.show_pause_state(false)
        }));
        notifier.subscribe(ClockEvent::DilationChanged, panel.id, with_panel(&weak, |p, clock| {
            p.show_speed_state(clock)
        }));

        panel
    }

    /// Removes every clock subscription made by this panel.
    pub fn destruct(&self) {
        self.clock.notifier().unsubscribe(self.id);
    }

    /// Advances the refresh timer by the real time covered by `dilated_delta`.
    pub fn tick(&self, dilated_delta: f32) {
        let real_delta = self.clock.real_time_seconds(dilated_delta);
        let since = match self.since_refresh.get() {
            None => f32::INFINITY,
            Some(since) => since + real_delta,
        };

        if since >= self.update_interval {
            self.refresh_readouts();
            self.since_refresh.set(Some(0.0));
        } else {
            self.since_refresh.set(Some(since));
        }
    }

    pub fn on_pause_button_clicked(&self) -> Result<RequestOutcome, TimeControlError> {
        self.clock.toggle_play_pause()
    }

    pub fn on_increase_button_clicked(&self) -> Result<f32, TimeControlError> {
        self.clock.increase_sim_speed()
    }

    pub fn on_decrease_button_clicked(&self) -> Result<f32, TimeControlError> {
        self.clock.decrease_sim_speed()
    }

    pub fn view(&self) -> PanelView {
        self.view.borrow().clone()
    }

    pub fn refreshes(&self) -> u64 {
        self.refreshes.get()
    }

    fn show_pause_state(&self, paused: bool) {
        self.view.borrow_mut().pause_label = if paused { "Resume" } else { "Pause" };
    }

    fn show_speed_state(&self, clock: &SimClock) {
        let mut view = self.view.borrow_mut();
        view.speed_text = format!("{:.3}x", clock.dilation());
        view.can_increase = clock.can_increase_speed();
        view.can_decrease = clock.can_decrease_speed();
    }

    fn refresh_readouts(&self) {
        let mut view = self.view.borrow_mut();
        view.tick_text = self.clock.tick_number().to_string();
        view.elapsed_text = format!("{:.2}", self.clock.elapsed_time());
        view.delta_text = format!("{:.4}", self.clock.delta_time());
        self.refreshes.set(self.refreshes.get() + 1);
    }
}

fn with_panel<F>(panel: &Weak<SimControlPanel>, f: F) -> impl Fn(&SimClock) + 'static
where
    F: Fn(&SimControlPanel, &SimClock) + 'static,
{
    let panel = Weak::clone(panel);
    move |clock: &SimClock| {
        if let Some(panel) = panel.upgrade() {
            f(&panel, clock);
        }
    }
}
