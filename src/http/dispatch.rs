//! The dispatch container and its write-once publication handle.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use axum::Router;

use crate::error::EnvironmentError;

/// The request-dispatch component built from registered REST resources.
#[derive(Debug, Clone)]
pub struct DispatchContainer {
    router: Router,
    resources: Vec<String>,
}

impl DispatchContainer {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            resources: Vec::new(),
        }
    }

    pub(crate) fn with_resources(router: Router, resources: Vec<String>) -> Self {
        Self { router, resources }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Prefixes of the resources this container was built from.
    pub fn resources(&self) -> &[String] {
        &self.resources
    }
}

/// Shared, single-assignment reference to the dispatch container.
///
/// Written at most once during setup or start; readable lock-free from any
/// thread afterwards.
#[derive(Clone, Default)]
pub struct DispatchHandle {
    slot: Arc<ArcSwapOption<DispatchContainer>>,
}

impl DispatchHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `container`. Fails if a container was already published.
    pub fn publish(
        &self,
        container: DispatchContainer,
    ) -> Result<Arc<DispatchContainer>, EnvironmentError> {
        let container = Arc::new(container);
        let previous = self
            .slot
            .compare_and_swap(&None::<Arc<DispatchContainer>>, Some(container.clone()));

        if previous.is_some() {
            return Err(EnvironmentError::InvalidArgument(
                "dispatch container has already been published".into(),
            ));
        }

        tracing::debug!(resources = container.resources.len(), "Dispatch container published");
        Ok(container)
    }

    pub fn get(&self) -> Option<Arc<DispatchContainer>> {
        self.slot.load_full()
    }

    pub fn is_published(&self) -> bool {
        self.slot.load().is_some()
    }
}
