//! # MassTime Telemetry
//!
//! Logging and metrics for the simulation time-control stack.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
