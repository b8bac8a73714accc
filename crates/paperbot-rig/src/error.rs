//! Error types for paperbot-rig.

use std::fmt;

/// Result type alias for rig operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during rig operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Provider error (API call failed, rate limited, etc.)
    #[error("provider error: {provider}: {message}")]
    Provider { provider: String, message: String },

    /// Embedding error.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Creates a provider error.
    pub fn provider(provider: impl fmt::Display, message: impl fmt::Display) -> Self {
        Self::Provider {
            provider: provider.to_string(),
            message: message.to_string(),
        }
    }

    /// Creates an embedding error.
    pub fn embedding(message: impl fmt::Display) -> Self {
        Self::Embedding(message.to_string())
    }

    /// Creates a configuration error.
    pub fn config(message: impl fmt::Display) -> Self {
        Self::Config(message.to_string())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }
}

impl From<Error> for paperbot_core::Error {
    fn from(err: Error) -> Self {
        let kind = match &err {
            Error::Provider { .. } | Error::Embedding(_) => paperbot_core::ErrorKind::ExternalError,
            Error::Config(_) => paperbot_core::ErrorKind::Configuration,
            Error::Serialization(_) => paperbot_core::ErrorKind::Serialization,
        };
        paperbot_core::Error::new(kind).with_message(err.to_string())
    }
}
