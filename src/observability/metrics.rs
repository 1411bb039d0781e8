//! Metrics collection and exposition.
//!
//! # Metrics
//! - `service_lifecycle_events_total` (counter): lifecycle transitions by `event`
//! - `service_managed_objects` (gauge): managed objects registered at start
//! - `service_health_check_failures_total` (counter): unhealthy results by `check`
//!
//! # Design Decisions
//! - The registry is created by bootstrap code and injected into the environment
//! - A detached registry records through a local recorder, so tests never fight
//!   over the process-wide one

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

/// Handle to the service's Prometheus metrics.
pub struct MetricsRegistry {
    /// Present only for detached registries; global ones record through `metrics`.
    recorder: Option<PrometheusRecorder>,
    handle: PrometheusHandle,
}

impl MetricsRegistry {
    /// Install a Prometheus recorder as the process-wide `metrics` recorder.
    pub fn install() -> Result<Self, BuildError> {
        let handle = PrometheusBuilder::new().install_recorder()?;
        Ok(Self {
            recorder: None,
            handle,
        })
    }

    /// Build a registry that is not installed globally.
    pub fn detached() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        Self {
            recorder: Some(recorder),
            handle,
        }
    }

    /// Run `f` with this registry as the active recorder.
    pub fn record<T>(&self, f: impl FnOnce() -> T) -> T {
        match &self.recorder {
            Some(recorder) => metrics::with_local_recorder(recorder, f),
            None => f(),
        }
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Record a lifecycle transition (`starting`, `started`, `stopping`, ...).
pub fn record_lifecycle_event(registry: &MetricsRegistry, event: &'static str) {
    registry.record(|| {
        metrics::counter!("service_lifecycle_events_total", "event" => event).increment(1);
    });
}

pub fn record_managed_objects(registry: &MetricsRegistry, count: usize) {
    registry.record(|| {
        metrics::gauge!("service_managed_objects").set(count as f64);
    });
}

pub fn record_health_check_failure(registry: &MetricsRegistry, check: &str) {
    let check = check.to_string();
    registry.record(|| {
        metrics::counter!("service_health_check_failures_total", "check" => check).increment(1);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_registry_renders_recorded_metrics() {
        let registry = MetricsRegistry::detached();
        record_lifecycle_event(&registry, "started");
        record_managed_objects(&registry, 3);

        let output = registry.render();
        assert!(output.contains("service_lifecycle_events_total{event=\"started\"} 1"));
        assert!(output.contains("service_managed_objects 3"));
    }
}
