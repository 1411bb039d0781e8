//! Built-in operational endpoints served on the admin listener.
//!
//! - `GET /ping`: liveness, always `pong`
//! - `GET /healthcheck`: runs every registered health check
//! - `GET /metrics`: Prometheus exposition

pub mod handlers;

use std::sync::Arc;

use axum::routing::get;

use crate::error::EnvironmentError;
use crate::health::HealthCheckRegistry;
use crate::http::context::ContextHandler;
use crate::json::JsonFactory;
use crate::observability::MetricsRegistry;

use self::handlers::*;

/// State injected into admin handlers.
#[derive(Clone)]
pub struct AdminState {
    pub health_checks: Arc<HealthCheckRegistry>,
    pub metrics: Arc<MetricsRegistry>,
    pub json: JsonFactory,
}

/// Register the built-in endpoints on `context`.
pub fn register_builtin_routes(
    context: &mut ContextHandler,
    state: AdminState,
) -> Result<(), EnvironmentError> {
    context.route("/ping", get(get_ping))?;
    context.route("/healthcheck", get(get_healthcheck).with_state(state.clone()))?;
    context.route("/metrics", get(get_metrics).with_state(state))?;
    Ok(())
}
