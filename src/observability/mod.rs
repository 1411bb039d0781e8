//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters and gauges via `metrics`)
//!
//! Consumers:
//!     → stdout (human-readable or JSON lines)
//!     → admin `/metrics` endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging with fields, never formatted-only messages
//! - The metrics registry is owned by bootstrap code and shared, never global-only

pub mod logging;
pub mod metrics;

pub use self::metrics::MetricsRegistry;
