//! ## masstime-telemetry::logging
//! **Structured logging with `tracing`**
//!
//! The subscriber honours `RUST_LOG` first and falls back to the level
//! handed in by the caller (normally `telemetry.log_level` from config).

use tracing::debug_span;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber.
    ///
    /// Fails if a global subscriber has already been set, which happens when
    /// a host embeds the clock and owns logging itself.
    pub fn init(
        default_level: &str,
        json: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

        if json {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_thread_names(true)
                .with_span_events(FmtSpan::ENTER)
                .try_init()
        } else {
            fmt()
                .with_env_filter(filter)
                .with_thread_names(true)
                .with_span_events(FmtSpan::ENTER)
                .try_init()
        }
    }

    /// Records a broadcast clock event inside its own span.
    #[inline]
    pub fn log_clock_event(event_kind: &str, paused: bool, dilation: f32, tick: u64) {
        let span = debug_span!("clock_event", event_kind = event_kind);
        let _entered = span.enter();

        tracing::debug!(paused, dilation, tick, "Clock event broadcast");
    }
}
