//! Admin-context registration: operational routes and health checks.

use std::sync::Arc;

use axum::routing::MethodRouter;

use crate::admin::{register_builtin_routes, AdminState};
use crate::error::EnvironmentError;
use crate::health::{HealthCheck, HealthCheckRegistry};
use crate::http::context::ContextHandler;

/// Registers admin routes and health checks.
///
/// The admin context always serves `/ping`, `/healthcheck` and `/metrics`;
/// those paths cannot be registered again.
pub struct AdminEnvironment {
    context: ContextHandler,
    health_checks: Arc<HealthCheckRegistry>,
}

impl AdminEnvironment {
    pub(crate) fn new(state: AdminState) -> Result<Self, EnvironmentError> {
        let health_checks = state.health_checks.clone();
        let mut context = ContextHandler::new("admin");
        register_builtin_routes(&mut context, state)?;

        Ok(Self {
            context,
            health_checks,
        })
    }

    pub fn add_health_check(
        &self,
        name: impl Into<String>,
        check: Arc<dyn HealthCheck>,
    ) -> Result<(), EnvironmentError> {
        self.health_checks.register(name, check)
    }

    pub fn route(&mut self, path: &str, method_router: MethodRouter) -> Result<(), EnvironmentError> {
        self.context.route(path, method_router)
    }

    pub fn paths(&self) -> Vec<&str> {
        self.context.paths()
    }

    pub fn health_checks(&self) -> &Arc<HealthCheckRegistry> {
        &self.health_checks
    }

    pub(crate) fn context(&self) -> &ContextHandler {
        &self.context
    }
}
