//! Named collection of health checks.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures_util::future::join_all;
use serde::Serialize;

use crate::error::EnvironmentError;
use crate::health::check::{HealthCheck, HealthResult};

/// Results of one run over every registered check, keyed by name.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub checks: BTreeMap<String, HealthResult>,
}

/// Thread-safe registry shared by the environment, the admin environment
/// and the admin request handlers.
#[derive(Default)]
pub struct HealthCheckRegistry {
    checks: DashMap<String, Arc<dyn HealthCheck>>,
}

impl HealthCheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `check` under `name`. Names are unique.
    pub fn register(
        &self,
        name: impl Into<String>,
        check: Arc<dyn HealthCheck>,
    ) -> Result<(), EnvironmentError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(EnvironmentError::InvalidArgument(
                "health check name must not be empty".into(),
            ));
        }

        match self.checks.entry(name) {
            Entry::Occupied(entry) => Err(EnvironmentError::InvalidArgument(format!(
                "health check '{}' is already registered",
                entry.key()
            ))),
            Entry::Vacant(entry) => {
                tracing::debug!(name = %entry.key(), "Health check registered");
                entry.insert(check);
                Ok(())
            }
        }
    }

    /// Remove a check; returns whether it was present.
    pub fn unregister(&self, name: &str) -> bool {
        self.checks.remove(name).is_some()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.checks.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every registered check concurrently.
    pub async fn run_health_checks(&self) -> HealthReport {
        // Snapshot first so no shard lock is held across an await.
        let snapshot: Vec<(String, Arc<dyn HealthCheck>)> = self
            .checks
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();

        let results = join_all(snapshot.into_iter().map(|(name, check)| async move {
            let result = match check.check().await {
                Ok(result) => result,
                Err(e) => HealthResult::unhealthy(e.to_string()),
            };
            (name, result)
        }))
        .await;

        let checks: BTreeMap<_, _> = results.into_iter().collect();
        let healthy = checks.values().all(|r| r.healthy);

        HealthReport { healthy, checks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::error::BoxError;

    struct Fixed(HealthResult);

    #[async_trait]
    impl HealthCheck for Fixed {
        async fn check(&self) -> Result<HealthResult, BoxError> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    #[async_trait]
    impl HealthCheck for Failing {
        async fn check(&self) -> Result<HealthResult, BoxError> {
            Err("connection refused".into())
        }
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let registry = HealthCheckRegistry::new();
        registry
            .register("db", Arc::new(Fixed(HealthResult::healthy())))
            .unwrap();

        let err = registry
            .register("db", Arc::new(Fixed(HealthResult::healthy())))
            .unwrap_err();
        assert!(matches!(err, EnvironmentError::InvalidArgument(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_names_sorted_and_unregister() {
        let registry = HealthCheckRegistry::new();
        registry.register("queue", Arc::new(Failing)).unwrap();
        registry.register("cache", Arc::new(Failing)).unwrap();

        assert_eq!(registry.names(), vec!["cache", "queue"]);
        assert!(registry.unregister("queue"));
        assert!(!registry.unregister("queue"));
        assert_eq!(registry.names(), vec!["cache"]);
    }

    #[tokio::test]
    async fn test_report_marks_errors_unhealthy() {
        let registry = HealthCheckRegistry::new();
        registry
            .register("db", Arc::new(Fixed(HealthResult::healthy())))
            .unwrap();
        registry.register("cache", Arc::new(Failing)).unwrap();

        let report = registry.run_health_checks().await;
        assert!(!report.healthy);
        assert!(report.checks["db"].healthy);
        assert_eq!(
            report.checks["cache"],
            HealthResult::unhealthy("connection refused")
        );
    }

    #[tokio::test]
    async fn test_empty_registry_is_healthy() {
        let report = HealthCheckRegistry::new().run_health_checks().await;
        assert!(report.healthy);
        assert!(report.checks.is_empty());
    }
}
