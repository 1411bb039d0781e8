//! Registration surface for managed objects and lifecycle listeners.

use std::sync::Arc;

use crate::lifecycle::{LifecycleListener, Managed};

/// Append-only lists consulted by the runtime at start and stop.
///
/// Registration order is preserved and is the only ordering this type
/// guarantees.
#[derive(Default)]
pub struct LifecycleEnvironment {
    managed: Vec<Arc<dyn Managed>>,
    listeners: Vec<Arc<dyn LifecycleListener>>,
}

impl LifecycleEnvironment {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register an object whose start/stop is tied to the service's.
    pub fn manage(&mut self, object: Arc<dyn Managed>) {
        tracing::debug!(object = %object.name(), "Managed object registered");
        self.managed.push(object);
    }

    pub fn add_listener(&mut self, listener: Arc<dyn LifecycleListener>) {
        self.listeners.push(listener);
    }

    pub fn managed_count(&self) -> usize {
        self.managed.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn managed_objects(&self) -> &[Arc<dyn Managed>] {
        &self.managed
    }

    pub(crate) fn listeners(&self) -> &[Arc<dyn LifecycleListener>] {
        &self.listeners
    }
}
