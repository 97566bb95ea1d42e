//! ## masstime-core::events
//! **Clock change notifications**
//!
//! Subscribers are keyed by an owner identity rather than per-callback
//! handles, so one `unsubscribe(owner)` call undoes every registration an
//! owner made.

use std::sync::atomic::{AtomicU64, Ordering};

mod notifier;

pub use notifier::ChangeNotifier;

/// Kinds of change broadcast by the sim clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClockEvent {
    PauseChanged,
    ResumeChanged,
    DilationChanged,
}

impl ClockEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClockEvent::PauseChanged => "pause_changed",
            ClockEvent::ResumeChanged => "resume_changed",
            ClockEvent::DilationChanged => "dilation_changed",
        }
    }
}

/// Identity of a subscriber, used for bulk removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

static NEXT_SUBSCRIBER_ID: AtomicU64 = AtomicU64::new(1);

impl SubscriberId {
    /// Allocates a process-unique identity.
    pub fn next() -> Self {
        Self(NEXT_SUBSCRIBER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "subscriber#{}", self.0)
    }
}
