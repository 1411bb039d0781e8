//! Main-context route registration.

use axum::{routing::MethodRouter, Router};

use crate::error::EnvironmentError;
use crate::http::context::ContextHandler;

/// Registers plain routes on the main listener.
///
/// Routes added here take precedence over REST resources; requests that match
/// nothing here fall through to the dispatch container.
pub struct ServletEnvironment {
    context: ContextHandler,
}

impl ServletEnvironment {
    pub(crate) fn new() -> Self {
        Self {
            context: ContextHandler::new("main"),
        }
    }

    pub fn route(&mut self, path: &str, method_router: MethodRouter) -> Result<(), EnvironmentError> {
        self.context.route(path, method_router)
    }

    pub fn nest(&mut self, prefix: &str, router: Router) -> Result<(), EnvironmentError> {
        self.context.nest(prefix, router)
    }

    pub fn paths(&self) -> Vec<&str> {
        self.context.paths()
    }

    pub(crate) fn context(&self) -> &ContextHandler {
        &self.context
    }
}
