//! Error types and utilities for database operations.

use std::borrow::Cow;

use deadpool::managed::TimeoutType;
use diesel::result::{ConnectionError, Error};
use diesel_async::pooled_connection::PoolError as DieselPoolError;
use diesel_async::pooled_connection::deadpool::PoolError as DeadpoolError;

/// Result type for database operations.
pub type PgResult<T> = Result<T, PgError>;

/// Error type for all PostgreSQL database operations.
#[derive(Debug, thiserror::Error)]
#[must_use = "database errors should be handled appropriately"]
pub enum PgError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database operation timed out.
    ///
    /// This can occur during connection creation, waiting for available
    /// connections, or connection recycling operations.
    #[error("Database operation timed out")]
    Timeout(TimeoutType),

    /// Failed to establish or maintain a database connection.
    #[error("Database connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Database query execution failed.
    #[error("Database query error: {0}")]
    Query(#[from] Error),

    /// Unexpected error occurred.
    #[error("Unexpected error: {0}")]
    Unexpected(Cow<'static, str>),
}

impl PgError {
    /// Returns true if this error represents a missing row.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PgError::Query(Error::NotFound))
    }
}

impl From<DeadpoolError> for PgError {
    fn from(err: DeadpoolError) -> Self {
        use deadpool::managed::PoolError;

        match err {
            PoolError::Timeout(timeout_type) => PgError::Timeout(timeout_type),
            PoolError::Backend(DieselPoolError::ConnectionError(e)) => PgError::Connection(e),
            PoolError::Backend(DieselPoolError::QueryError(e)) => PgError::Query(e),
            other => PgError::Unexpected(other.to_string().into()),
        }
    }
}
