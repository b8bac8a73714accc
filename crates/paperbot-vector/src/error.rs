//! Vector index error types.

use thiserror::Error;

/// Result type for vector index operations.
pub type VectorResult<T> = Result<T, VectorError>;

/// Vector index errors.
#[derive(Debug, Error)]
pub enum VectorError {
    /// Connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// Index not found.
    #[error("index not found: {0}")]
    IndexNotFound(String),

    /// The index listing response had an unexpected shape.
    #[error("index listing error: {0}")]
    IndexListing(String),

    /// Vector dimension mismatch.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Operation timeout.
    #[error("operation timed out: {0}")]
    Timeout(String),

    /// Backend-specific error.
    #[error("backend error: {0}")]
    Backend(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl VectorError {
    /// Creates a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates an index not found error.
    pub fn index_not_found(name: impl Into<String>) -> Self {
        Self::IndexNotFound(name.into())
    }

    /// Creates an index listing error.
    pub fn index_listing(msg: impl Into<String>) -> Self {
        Self::IndexListing(msg.into())
    }

    /// Creates a dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Creates an invalid config error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Creates a timeout error.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Creates a backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Creates a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}

impl From<serde_json::Error> for VectorError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<reqwest::Error> for VectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(err.to_string())
        } else if err.is_connect() {
            Self::connection(err.to_string())
        } else {
            Self::backend(err.to_string())
        }
    }
}
