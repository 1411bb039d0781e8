//! Start/stop sequencing of managed objects.
//!
//! Objects start in registration order and stop in reverse. A failed start
//! stops whatever already started before the error is returned.

use std::sync::Arc;

use crate::error::EnvironmentError;
use crate::lifecycle::managed::{LifecycleListener, Managed};
use crate::observability::metrics::{self, MetricsRegistry};

pub struct LifecycleRunner {
    managed: Vec<Arc<dyn Managed>>,
    listeners: Vec<Arc<dyn LifecycleListener>>,
    metrics: Arc<MetricsRegistry>,
    /// Number of leading `managed` entries currently running.
    running: usize,
}

impl LifecycleRunner {
    pub fn new(
        managed: Vec<Arc<dyn Managed>>,
        listeners: Vec<Arc<dyn LifecycleListener>>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            managed,
            listeners,
            metrics,
            running: 0,
        }
    }

    pub fn running(&self) -> usize {
        self.running
    }

    pub async fn start(&mut self) -> Result<(), EnvironmentError> {
        self.notify("starting", |l| l.starting());
        metrics::record_managed_objects(&self.metrics, self.managed.len());

        for object in self.managed.clone() {
            let name = object.name();
            tracing::debug!(object = %name, "Starting managed object");

            if let Err(source) = object.start().await {
                tracing::error!(object = %name, error = %source, "Managed object failed to start");
                let error = EnvironmentError::Lifecycle { object: name, source };

                self.stop_running().await;
                self.notify("failure", |l| l.failure(&error));
                return Err(error);
            }
            self.running += 1;
        }

        tracing::info!(managed = self.running, "Lifecycle started");
        self.notify("started", |l| l.started());
        Ok(())
    }

    pub async fn stop(&mut self) {
        self.notify("stopping", |l| l.stopping());
        self.stop_running().await;
        tracing::info!("Lifecycle stopped");
        self.notify("stopped", |l| l.stopped());
    }

    async fn stop_running(&mut self) {
        while self.running > 0 {
            self.running -= 1;
            let object = self.managed[self.running].clone();
            let name = object.name();
            tracing::debug!(object = %name, "Stopping managed object");

            if let Err(e) = object.stop().await {
                tracing::warn!(object = %name, error = %e, "Managed object failed to stop");
            }
        }
    }

    fn notify(&self, event: &'static str, f: impl Fn(&dyn LifecycleListener)) {
        metrics::record_lifecycle_event(&self.metrics, event);
        for listener in &self.listeners {
            f(listener.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    struct Recorder {
        name: &'static str,
        log: Log,
        fail_start: bool,
    }

    #[async_trait]
    impl Managed for Recorder {
        fn name(&self) -> String {
            self.name.to_string()
        }

        async fn start(&self) -> Result<(), BoxError> {
            if self.fail_start {
                return Err(format!("{} unavailable", self.name).into());
            }
            self.log.lock().unwrap().push(format!("start {}", self.name));
            Ok(())
        }

        async fn stop(&self) -> Result<(), BoxError> {
            self.log.lock().unwrap().push(format!("stop {}", self.name));
            Ok(())
        }
    }

    struct EventLog(Log);

    impl LifecycleListener for EventLog {
        fn starting(&self) {
            self.0.lock().unwrap().push("starting".into());
        }
        fn started(&self) {
            self.0.lock().unwrap().push("started".into());
        }
        fn failure(&self, error: &(dyn std::error::Error + 'static)) {
            self.0.lock().unwrap().push(format!("failure: {}", error));
        }
        fn stopping(&self) {
            self.0.lock().unwrap().push("stopping".into());
        }
        fn stopped(&self) {
            self.0.lock().unwrap().push("stopped".into());
        }
    }

    fn object(name: &'static str, log: &Log, fail_start: bool) -> Arc<dyn Managed> {
        Arc::new(Recorder {
            name,
            log: log.clone(),
            fail_start,
        })
    }

    #[tokio::test]
    async fn test_start_in_order_stop_in_reverse() {
        let log: Log = Arc::default();
        let mut runner = LifecycleRunner::new(
            vec![object("a", &log, false), object("b", &log, false)],
            vec![Arc::new(EventLog(log.clone()))],
            Arc::new(MetricsRegistry::detached()),
        );

        runner.start().await.unwrap();
        assert_eq!(runner.running(), 2);
        runner.stop().await;
        assert_eq!(runner.running(), 0);

        assert_eq!(
            *log.lock().unwrap(),
            vec!["starting", "start a", "start b", "started", "stopping", "stop b", "stop a", "stopped"]
        );
    }

    #[tokio::test]
    async fn test_failed_start_rolls_back() {
        let log: Log = Arc::default();
        let metrics = Arc::new(MetricsRegistry::detached());
        let mut runner = LifecycleRunner::new(
            vec![
                object("a", &log, false),
                object("b", &log, true),
                object("c", &log, false),
            ],
            vec![Arc::new(EventLog(log.clone()))],
            metrics.clone(),
        );

        let err = runner.start().await.unwrap_err();
        match &err {
            EnvironmentError::Lifecycle { object, .. } => assert_eq!(object, "b"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(runner.running(), 0);

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "starting".to_string(),
                "start a".to_string(),
                "stop a".to_string(),
                format!("failure: {}", err),
            ]
        );
        assert!(metrics
            .render()
            .contains("service_lifecycle_events_total{event=\"failure\"} 1"));
    }
}
