//! Service environment bootstrap.
//!
//! ```text
//! config file ─▶ logging ─▶ metrics ─▶ ServiceEnvironment ─▶ registrations
//!                                                              │
//!                      signals ─▶ Shutdown ◀── ServiceRuntime ◀┘
//! ```
//!
//! Runs a small demo service: a `/hello` resource, an uptime health check and
//! a managed object that reports when the service starts and stops.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use axum::{extract::State, routing::get, Json, Router};
use clap::Parser;
use serde::Serialize;

use service_environment::config::{load_config, ServiceConfig};
use service_environment::health::{HealthCheck, HealthResult};
use service_environment::json::JsonFactory;
use service_environment::lifecycle::{signals, Managed};
use service_environment::observability::{logging, MetricsRegistry};
use service_environment::validator::NoopValidator;
use service_environment::{BoxError, ServiceEnvironment, ServiceRuntime, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "service-env", version, about = "Run a service from its environment")]
struct Args {
    /// Path to a TOML configuration file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Serialize)]
struct Greeting {
    service: String,
    message: &'static str,
}

struct Uptime(Instant);

#[async_trait]
impl HealthCheck for Uptime {
    async fn check(&self) -> Result<HealthResult, BoxError> {
        Ok(HealthResult::healthy_with(format!(
            "up {}s",
            self.0.elapsed().as_secs()
        )))
    }
}

struct StartupBanner {
    service: String,
}

#[async_trait]
impl Managed for StartupBanner {
    fn name(&self) -> String {
        "startup-banner".to_string()
    }

    async fn start(&self) -> Result<(), BoxError> {
        tracing::info!(service = %self.service, "Service is up");
        Ok(())
    }

    async fn stop(&self) -> Result<(), BoxError> {
        tracing::info!(service = %self.service, "Service is going down");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    logging::init_logging(&config.logging)?;

    tracing::info!(
        service = %config.name,
        bind_address = %config.server.bind_address,
        admin_bind_address = %config.server.admin_bind_address,
        "Configuration loaded"
    );

    let metrics = if config.metrics.enabled {
        MetricsRegistry::install()?
    } else {
        MetricsRegistry::detached()
    };

    let mut env = ServiceEnvironment::builder()
        .name(config.name.clone())
        .json_factory(JsonFactory::from_config(&config.json))
        .validator(Arc::new(NoopValidator))
        .metrics(Arc::new(metrics))
        .build()?;

    let service = env.name().to_string();
    env.resources_mut().register(
        "/hello",
        Router::new()
            .route(
                "/",
                get(|State(service): State<String>| async move {
                    Json(Greeting {
                        service,
                        message: "hello",
                    })
                }),
            )
            .with_state(service.clone()),
    )?;
    env.admin()
        .add_health_check("uptime", Arc::new(Uptime(Instant::now())))?;
    env.lifecycle_mut()
        .manage(Arc::new(StartupBanner { service }));

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    ServiceRuntime::new(env, config.server)
        .bind_and_run(&shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
