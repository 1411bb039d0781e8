//! Runs a composed service environment.
//!
//! # Startup order
//! 1. Publish the dispatch container (unless setup code already replaced it)
//! 2. Start managed objects
//! 3. Serve the main and admin listeners
//!
//! Shutdown reverses it: listeners drain, then managed objects stop. A
//! trigger that lands while managed objects are starting skips serving but
//! still stops them.

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::environment::ServiceEnvironment;
use crate::error::EnvironmentError;
use crate::http::HttpServer;
use crate::lifecycle::{LifecycleRunner, Shutdown};

pub struct ServiceRuntime {
    environment: ServiceEnvironment,
    config: ServerConfig,
}

impl ServiceRuntime {
    pub fn new(environment: ServiceEnvironment, config: ServerConfig) -> Self {
        Self {
            environment,
            config,
        }
    }

    pub fn environment(&self) -> &ServiceEnvironment {
        &self.environment
    }

    /// Bind the configured addresses, then run.
    pub async fn bind_and_run(self, shutdown: &Shutdown) -> Result<(), EnvironmentError> {
        let main = TcpListener::bind(&self.config.bind_address).await?;
        let admin = TcpListener::bind(&self.config.admin_bind_address).await?;
        self.run(main, admin, shutdown).await
    }

    /// Start the lifecycle and serve until `shutdown` is triggered.
    pub async fn run(
        self,
        main: TcpListener,
        admin: TcpListener,
        shutdown: &Shutdown,
    ) -> Result<(), EnvironmentError> {
        let env = &self.environment;
        tracing::info!(service = %env.name(), "Starting service");

        if env.dispatch().is_published() {
            tracing::info!("Using replaced dispatch container");
        }
        let dispatch = env.resources().container()?;
        if dispatch.resources().is_empty() {
            tracing::info!("No REST resources registered");
        } else {
            tracing::info!(resources = ?dispatch.resources(), "REST resources registered");
        }

        if env.health_checks().is_empty() {
            tracing::warn!(
                service = %env.name(),
                "No health checks registered; add some with AdminEnvironment::add_health_check"
            );
        }

        let mut runner = LifecycleRunner::new(
            env.managed_objects().to_vec(),
            env.lifecycle_listeners().to_vec(),
            Arc::clone(env.metrics()),
        );
        runner.start().await?;

        let served = if shutdown.is_triggered() {
            tracing::info!(service = %env.name(), "Shutdown requested during startup, not serving");
            Ok(())
        } else {
            let server = HttpServer::new(
                &self.config,
                env.servlet_context().router(),
                dispatch.router(),
                env.admin_context().router(),
            );
            server.run(main, admin, shutdown).await
        };

        runner.stop().await;
        served?;

        tracing::info!(service = %env.name(), "Service stopped");
        Ok(())
    }
}
