//! Server lifecycle error types.

use std::io;

/// Result type for server lifecycle operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors that can occur while starting or running the HTTP server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Server configuration failed validation.
    #[error("invalid server configuration: {0}")]
    InvalidConfig(String),

    /// Could not bind to the configured address.
    #[error("failed to bind to {address}: {source}")]
    BindError {
        address: String,
        #[source]
        source: io::Error,
    },

    /// The server terminated with a runtime error.
    #[error("server runtime error: {0}")]
    Runtime(#[from] io::Error),
}
