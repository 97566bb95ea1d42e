//! ## masstime-telemetry::metrics
//! **Prometheus counters for the sim clock**
//!
//! - ticks advanced while running
//! - discrete speed changes requested through the ladder
//! - drift resyncs, split by whether the ladder matched exactly
//! - the current global time dilation

use prometheus::{Encoder, Gauge, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub ticks: IntCounter,
    pub speed_changes: IntCounter,
    pub resyncs: IntCounterVec,
    pub time_dilation: Gauge,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let ticks = IntCounter::new(
            "masstime_ticks_total",
            "Simulation ticks advanced while running",
        )?;
        let speed_changes = IntCounter::new(
            "masstime_speed_changes_total",
            "Discrete simulation speed changes",
        )?;
        let resyncs = IntCounterVec::new(
            Opts::new(
                "masstime_resyncs_total",
                "Reconciliations after an external time dilation change",
            ),
            &["kind"],
        )?;
        let time_dilation = Gauge::new("masstime_time_dilation", "Current global time dilation")?;

        registry.register(Box::new(ticks.clone()))?;
        registry.register(Box::new(speed_changes.clone()))?;
        registry.register(Box::new(resyncs.clone()))?;
        registry.register(Box::new(time_dilation.clone()))?;

        Ok(Self {
            registry,
            ticks,
            speed_changes,
            resyncs,
            time_dilation,
        })
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn inc_ticks(&self) {
        self.ticks.inc();
    }

    pub fn inc_speed_changes(&self) {
        self.speed_changes.inc();
    }

    pub fn record_resync(&self, exact: bool) {
        let kind = if exact { "exact" } else { "approximate" };
        self.resyncs.with_label_values(&[kind]).inc();
    }

    pub fn set_time_dilation(&self, dilation: f32) {
        self.time_dilation.set(f64::from(dilation));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_exposition() {
        let metrics = MetricsRecorder::new().unwrap();
        metrics.inc_ticks();
        metrics.inc_ticks();
        metrics.inc_speed_changes();
        metrics.record_resync(false);
        metrics.set_time_dilation(1.5);

        let text = metrics.gather_metrics().unwrap();
        assert!(text.contains("masstime_ticks_total 2"));
        assert!(text.contains("masstime_speed_changes_total 1"));
        assert!(text.contains("masstime_resyncs_total{kind=\"approximate\"} 1"));
        assert!(text.contains("masstime_time_dilation 1.5"));
    }

    #[test]
    fn recorders_do_not_share_registries() {
        let a = MetricsRecorder::new().unwrap();
        let b = MetricsRecorder::new().unwrap();
        a.inc_ticks();
        assert_eq!(a.ticks.get(), 1);
        assert_eq!(b.ticks.get(), 0);
    }
}
