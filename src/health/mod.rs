//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Bootstrap code:
//!     AdminEnvironment::add_health_check(name, check)
//!     → registry.rs (named, shared collection)
//!
//! Admin `/healthcheck` request:
//!     registry.rs runs every check concurrently
//!     → check.rs results, sorted by name
//!     → 200 if all healthy, 500 otherwise
//! ```
//!
//! # Design Decisions
//! - Checks run on demand only; nothing here schedules them
//! - A check that errors is reported as unhealthy, never propagated

pub mod check;
pub mod registry;

pub use check::{HealthCheck, HealthResult};
pub use registry::{HealthCheckRegistry, HealthReport};
