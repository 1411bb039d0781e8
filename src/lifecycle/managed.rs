//! Contracts for objects and observers that take part in start/stop.

use async_trait::async_trait;

use crate::error::BoxError;

/// A participant in service start/stop sequencing.
#[async_trait]
pub trait Managed: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }

    async fn start(&self) -> Result<(), BoxError>;

    async fn stop(&self) -> Result<(), BoxError>;
}

/// Observer of the service lifecycle. Every callback defaults to a no-op.
pub trait LifecycleListener: Send + Sync {
    fn starting(&self) {}

    fn started(&self) {}

    fn failure(&self, _error: &(dyn std::error::Error + 'static)) {}

    fn stopping(&self) {}

    fn stopped(&self) {}
}
