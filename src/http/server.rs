//! HTTP server setup for the main and admin listeners.
//!
//! # Responsibilities
//! - Assemble the main router: servlet routes first, dispatch container as fallback
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve both listeners until shutdown, bounded by a grace period

use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::http::request::with_request_id;
use crate::lifecycle::shutdown::Shutdown;

/// Serves the main and admin routers.
pub struct HttpServer {
    main: Router,
    admin: Router,
    shutdown_grace: Duration,
}

impl HttpServer {
    pub fn new(config: &ServerConfig, servlets: Router, dispatch: Router, admin: Router) -> Self {
        Self {
            main: Self::build_main_router(config, servlets, dispatch),
            admin: with_request_id(admin.layer(TraceLayer::new_for_http())),
            shutdown_grace: Duration::from_secs(config.shutdown_grace_secs),
        }
    }

    /// Build the main router with all middleware layers.
    #[allow(deprecated)]
    fn build_main_router(config: &ServerConfig, servlets: Router, dispatch: Router) -> Router {
        let router = servlets
            .fallback_service(dispatch)
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(TraceLayer::new_for_http());
        with_request_id(router)
    }

    /// Serve until `shutdown` is triggered, returning immediately if it
    /// already was.
    ///
    /// Once triggered, listeners stop accepting and in-flight requests get
    /// `shutdown_grace` to finish. After that this returns without waiting
    /// further; connection tasks axum already spawned are not aborted.
    pub async fn run(
        self,
        main_listener: TcpListener,
        admin_listener: TcpListener,
        shutdown: &Shutdown,
    ) -> Result<(), std::io::Error> {
        tracing::info!(
            main = %main_listener.local_addr()?,
            admin = %admin_listener.local_addr()?,
            "HTTP server starting"
        );

        let Self {
            main,
            admin,
            shutdown_grace: grace,
        } = self;

        let main_shutdown = shutdown.clone();
        let admin_shutdown = shutdown.clone();
        let deadline_shutdown = shutdown.clone();

        let main = async move {
            axum::serve(main_listener, main)
                .with_graceful_shutdown(async move { main_shutdown.notified().await })
                .await
        };
        let admin = async move {
            axum::serve(admin_listener, admin)
                .with_graceful_shutdown(async move { admin_shutdown.notified().await })
                .await
        };
        let deadline = async move {
            deadline_shutdown.notified().await;
            tokio::time::sleep(grace).await;
        };

        tokio::select! {
            result = async { tokio::try_join!(main, admin) } => {
                result?;
                tracing::info!("HTTP server stopped");
            }
            _ = deadline => {
                tracing::warn!(
                    grace_secs = grace.as_secs(),
                    "Grace period elapsed with connections still open; no longer waiting for them"
                );
            }
        }

        Ok(())
    }
}
