use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::admin::AdminState;
use crate::observability::metrics;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

pub async fn get_ping() -> &'static str {
    "pong\n"
}

/// Run every health check. 200 when all pass, 500 when any fails,
/// 501 when nothing is registered.
pub async fn get_healthcheck(State(state): State<AdminState>) -> Response {
    if state.health_checks.is_empty() {
        return (StatusCode::NOT_IMPLEMENTED, "No health checks registered.\n").into_response();
    }

    let report = state.health_checks.run_health_checks().await;

    for (name, result) in &report.checks {
        if !result.healthy {
            tracing::warn!(check = %name, detail = ?result.message, "Health check failed");
            metrics::record_health_check_failure(&state.metrics, name);
        }
    }

    let status = if report.healthy {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    match state.json.to_string(&report.checks) {
        Ok(body) => (status, [(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode health report");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn get_metrics(State(state): State<AdminState>) -> Response {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.metrics.render(),
    )
        .into_response()
}
