//! HTTP server lifecycle.

mod error;
mod http_server;
mod shutdown;

pub use error::{Result, ServerError};
pub use http_server::serve_http;
pub use shutdown::shutdown_signal;

pub(crate) const TRACING_TARGET_STARTUP: &str = "paperbot_cli::server::startup";
pub(crate) const TRACING_TARGET_SHUTDOWN: &str = "paperbot_cli::server::shutdown";
