//! Service environment composition for axum-based HTTP services.
//!
//! Bootstrap code builds one [`ServiceEnvironment`], registers resources,
//! routes, health checks and managed objects through its sub-environments,
//! then hands it to a [`ServiceRuntime`] to start and serve.

// Environment and its parts
pub mod config;
pub mod environment;
pub mod error;
pub mod json;
pub mod validator;

// Serving
pub mod admin;
pub mod health;
pub mod http;
pub mod runtime;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ServiceConfig;
pub use environment::ServiceEnvironment;
pub use error::{BoxError, EnvironmentError};
pub use lifecycle::Shutdown;
pub use runtime::ServiceRuntime;
