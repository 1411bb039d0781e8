//! The service environment and its sub-environments.
//!
//! # Data Flow
//! ```text
//! bootstrap code
//!     → ServiceEnvironment::builder() (name, JSON factory, validator, metrics)
//!     → sub-environments receive only the state they need:
//!         json.rs      ← JsonFactory
//!         servlet.rs   ← main ContextHandler
//!         resources.rs ← DispatchHandle
//!         admin.rs     ← admin ContextHandler + HealthCheckRegistry + MetricsRegistry
//!         lifecycle.rs ← managed objects + listeners
//!     → registrations
//!     → ServiceRuntime consumes the environment
//! ```

pub mod admin;
pub mod json;
pub mod lifecycle;
pub mod resources;
pub mod servlet;

use std::sync::Arc;

use crate::admin::AdminState;
use crate::error::EnvironmentError;
use crate::health::HealthCheckRegistry;
use crate::http::context::ContextHandler;
use crate::http::dispatch::DispatchHandle;
use crate::json::JsonFactory;
use crate::lifecycle::{LifecycleListener, Managed};
use crate::observability::MetricsRegistry;
use crate::validator::Validator;

pub use admin::AdminEnvironment;
pub use json::JsonEnvironment;
pub use lifecycle::LifecycleEnvironment;
pub use resources::ResourceEnvironment;
pub use servlet::ServletEnvironment;

/// A running service's environment, created once at startup.
pub struct ServiceEnvironment {
    name: String,
    metrics: Arc<MetricsRegistry>,
    health_checks: Arc<HealthCheckRegistry>,
    validator: Arc<dyn Validator>,

    json: JsonEnvironment,
    servlets: ServletEnvironment,
    resources: ResourceEnvironment,
    admin: AdminEnvironment,
    lifecycle: LifecycleEnvironment,
}

impl ServiceEnvironment {
    /// Create an environment from its four required parts.
    ///
    /// Fails with `Configuration` if `name` is blank.
    pub fn new(
        name: impl Into<String>,
        json: JsonFactory,
        validator: Arc<dyn Validator>,
        metrics: Arc<MetricsRegistry>,
    ) -> Result<Self, EnvironmentError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(EnvironmentError::Configuration(
                "service name must not be empty".into(),
            ));
        }

        let health_checks = Arc::new(HealthCheckRegistry::new());
        let admin = AdminEnvironment::new(AdminState {
            health_checks: health_checks.clone(),
            metrics: metrics.clone(),
            json: json.clone(),
        })?;

        tracing::debug!(service = %name, "Service environment created");

        Ok(Self {
            name,
            metrics,
            health_checks,
            validator,
            json: JsonEnvironment::new(json),
            servlets: ServletEnvironment::new(),
            resources: ResourceEnvironment::new(DispatchHandle::new()),
            admin,
            lifecycle: LifecycleEnvironment::new(),
        })
    }

    pub fn builder() -> ServiceEnvironmentBuilder {
        ServiceEnvironmentBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn json(&self) -> &JsonEnvironment {
        &self.json
    }

    pub fn servlets(&self) -> &ServletEnvironment {
        &self.servlets
    }

    pub fn servlets_mut(&mut self) -> &mut ServletEnvironment {
        &mut self.servlets
    }

    pub fn resources(&self) -> &ResourceEnvironment {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut ResourceEnvironment {
        &mut self.resources
    }

    pub fn admin(&self) -> &AdminEnvironment {
        &self.admin
    }

    pub fn admin_mut(&mut self) -> &mut AdminEnvironment {
        &mut self.admin
    }

    pub fn lifecycle(&self) -> &LifecycleEnvironment {
        &self.lifecycle
    }

    pub fn lifecycle_mut(&mut self) -> &mut LifecycleEnvironment {
        &mut self.lifecycle
    }

    pub fn validator(&self) -> &Arc<dyn Validator> {
        &self.validator
    }

    /// Replace the validator. `None` is rejected and the current one is kept.
    pub fn set_validator(
        &mut self,
        validator: Option<Arc<dyn Validator>>,
    ) -> Result<(), EnvironmentError> {
        match validator {
            Some(validator) => {
                self.validator = validator;
                Ok(())
            }
            None => Err(EnvironmentError::InvalidArgument(
                "validator must not be empty".into(),
            )),
        }
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    pub fn health_checks(&self) -> &Arc<HealthCheckRegistry> {
        &self.health_checks
    }

    // Runtime-only accessors.

    pub(crate) fn servlet_context(&self) -> &ContextHandler {
        self.servlets.context()
    }

    pub(crate) fn admin_context(&self) -> &ContextHandler {
        self.admin.context()
    }

    pub(crate) fn dispatch(&self) -> &DispatchHandle {
        self.resources.dispatch()
    }

    pub(crate) fn managed_objects(&self) -> &[Arc<dyn Managed>] {
        self.lifecycle.managed_objects()
    }

    pub(crate) fn lifecycle_listeners(&self) -> &[Arc<dyn LifecycleListener>] {
        self.lifecycle.listeners()
    }
}

/// Collects construction arguments; every one is required.
#[derive(Default)]
pub struct ServiceEnvironmentBuilder {
    name: Option<String>,
    json: Option<JsonFactory>,
    validator: Option<Arc<dyn Validator>>,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl ServiceEnvironmentBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn json_factory(mut self, json: JsonFactory) -> Self {
        self.json = Some(json);
        self
    }

    pub fn validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the environment; a missing argument fails with `Configuration`.
    pub fn build(self) -> Result<ServiceEnvironment, EnvironmentError> {
        let name = self.name.ok_or_else(|| EnvironmentError::missing("name"))?;
        let json = self.json.ok_or_else(|| EnvironmentError::missing("json_factory"))?;
        let validator = self
            .validator
            .ok_or_else(|| EnvironmentError::missing("validator"))?;
        let metrics = self.metrics.ok_or_else(|| EnvironmentError::missing("metrics"))?;

        ServiceEnvironment::new(name, json, validator, metrics)
    }
}
