//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (main listener)
//!     → server.rs (middleware: request ID, trace, timeout)
//!     → servlet routes (context.rs)
//!     → otherwise the dispatch container (dispatch.rs)
//!
//! TCP connection (admin listener)
//!     → server.rs (request ID, trace)
//!     → admin context (context.rs): built-ins + custom admin routes
//! ```

pub mod context;
pub mod dispatch;
pub mod request;
pub mod server;

pub use context::ContextHandler;
pub use dispatch::{DispatchContainer, DispatchHandle};
pub use request::X_REQUEST_ID;
pub use server::HttpServer;
