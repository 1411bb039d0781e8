//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Setup:
//!     LifecycleEnvironment::manage / add_listener (registration order kept)
//!
//! Startup (runner.rs):
//!     starting → start managed objects in order → started
//!     on failure: stop started objects in reverse → failure
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger → listeners drain
//!     → stopping → stop managed objects in reverse → stopped
//! ```
//!
//! # Design Decisions
//! - Fail fast: a start error aborts startup
//! - Stop errors are logged and do not prevent later objects from stopping

pub mod managed;
pub mod runner;
pub mod shutdown;
pub mod signals;

pub use managed::{LifecycleListener, Managed};
pub use runner::LifecycleRunner;
pub use shutdown::Shutdown;
