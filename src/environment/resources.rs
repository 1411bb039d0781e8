//! REST resource registration and the dispatch container.

use std::sync::Arc;

use axum::Router;

use crate::error::EnvironmentError;
use crate::http::context::ContextHandler;
use crate::http::dispatch::{DispatchContainer, DispatchHandle};

/// Collects REST resources; their combined router becomes the dispatch
/// container unless setup code publishes its own.
pub struct ResourceEnvironment {
    resources: ContextHandler,
    dispatch: DispatchHandle,
}

impl ResourceEnvironment {
    pub(crate) fn new(dispatch: DispatchHandle) -> Self {
        Self {
            resources: ContextHandler::new("resources"),
            dispatch,
        }
    }

    /// Mount a resource under a non-root prefix such as `/users`.
    ///
    /// Fails once a dispatch container is published, since it would never
    /// be served.
    pub fn register(&mut self, prefix: &str, resource: Router) -> Result<(), EnvironmentError> {
        if self.dispatch.is_published() {
            return Err(EnvironmentError::InvalidArgument(format!(
                "cannot register resource '{}': dispatch container already published",
                prefix
            )));
        }
        self.resources.nest(prefix, resource)
    }

    pub fn resource_paths(&self) -> Vec<&str> {
        self.resources.paths()
    }

    /// Publish a custom dispatch container instead of building one from the
    /// registered resources.
    ///
    /// Must be called during setup, before the runtime starts: the runtime
    /// publishes the built container at start and a second publish fails.
    /// Resources can no longer be registered afterwards.
    pub fn replace(&self, container: DispatchContainer) -> Result<(), EnvironmentError> {
        self.dispatch.publish(container).map(|_| ())
    }

    /// Return the published container, publishing one built from the
    /// registered resources if none exists yet.
    pub(crate) fn container(&self) -> Result<Arc<DispatchContainer>, EnvironmentError> {
        if let Some(container) = self.dispatch.get() {
            return Ok(container);
        }

        let paths = self.resources.paths().into_iter().map(String::from).collect();
        let built = DispatchContainer::with_resources(self.resources.router(), paths);
        self.dispatch.publish(built)
    }

    pub(crate) fn dispatch(&self) -> &DispatchHandle {
        &self.dispatch
    }
}
