//! Database client and connection pool management.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use deadpool::managed::Pool;
use derive_more::{Deref, DerefMut};
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use serde::{Deserialize, Serialize};

use crate::{PgError, PgResult, TRACING_TARGET_CONNECTION};

type ConnectionPool = Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;
type PooledConnection = deadpool::managed::Object<AsyncDieselConnectionManager<AsyncPgConnection>>;

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PgConfig {
    /// PostgreSQL connection URL.
    pub postgres_url: String,
    /// Maximum number of pooled connections.
    pub postgres_max_connections: u32,
    /// Timeout for acquiring and creating connections, in seconds.
    pub postgres_connection_timeout_secs: u64,
    /// Timeout for recycling idle connections, in seconds.
    pub postgres_idle_timeout_secs: u64,
}

impl Default for PgConfig {
    fn default() -> Self {
        Self {
            postgres_url: "postgresql://localhost:5432/paperbot".to_string(),
            postgres_max_connections: 16,
            postgres_connection_timeout_secs: 10,
            postgres_idle_timeout_secs: 300,
        }
    }
}

impl PgConfig {
    /// Returns the connection acquisition timeout.
    pub fn connection_timeout(&self) -> Option<Duration> {
        Some(Duration::from_secs(self.postgres_connection_timeout_secs))
    }

    /// Returns the idle connection recycle timeout.
    pub fn idle_timeout(&self) -> Option<Duration> {
        Some(Duration::from_secs(self.postgres_idle_timeout_secs))
    }

    /// Returns the connection URL with any password replaced for logging.
    pub fn database_url_masked(&self) -> String {
        match url::Url::parse(&self.postgres_url) {
            Ok(mut parsed) => {
                if parsed.password().is_some() {
                    let _ = parsed.set_password(Some("********"));
                }
                parsed.to_string()
            }
            Err(_) => "<unparseable database url>".to_string(),
        }
    }
}

/// High-level database client that manages the connection pool.
#[derive(Clone)]
pub struct PgClient {
    inner: Arc<PgClientInner>,
}

struct PgClientInner {
    pool: ConnectionPool,
    config: PgConfig,
}

impl PgClient {
    /// Creates a new database client with the provided configuration.
    ///
    /// This will establish a connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool configuration is invalid.
    #[tracing::instrument(
        skip(config),
        target = TRACING_TARGET_CONNECTION,
        fields(database_url = %config.database_url_masked())
    )]
    pub fn new(config: PgConfig) -> PgResult<Self> {
        tracing::info!(target: TRACING_TARGET_CONNECTION, "Initializing database client");

        let manager =
            AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.postgres_url);

        let pool = Pool::builder(manager)
            .max_size(config.postgres_max_connections as usize)
            .wait_timeout(config.connection_timeout())
            .create_timeout(config.connection_timeout())
            .recycle_timeout(config.idle_timeout())
            .runtime(deadpool::Runtime::Tokio1)
            .build()
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET_CONNECTION,
                    error = %e,
                    "Failed to create connection pool"
                );
                PgError::Unexpected(format!("Failed to build connection pool: {}", e).into())
            })?;

        Ok(Self {
            inner: Arc::new(PgClientInner { pool, config }),
        })
    }

    /// Gets a connection from the pool.
    ///
    /// Returns a [`PgConn`] wrapper. This method will wait up to the
    /// configured timeout for an available connection.
    pub async fn get_connection(&self) -> PgResult<PgConn> {
        let start = std::time::Instant::now();
        let conn = self.inner.pool.get().await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_CONNECTION,
                error = %e,
                elapsed = ?start.elapsed(),
                "Failed to acquire connection from pool"
            );
            PgError::from(e)
        })?;

        let elapsed = start.elapsed();
        if elapsed > Duration::from_millis(100) {
            tracing::warn!(
                target: TRACING_TARGET_CONNECTION,
                elapsed = ?elapsed,
                "Connection acquisition took longer than expected"
            );
        }

        Ok(PgConn::new(conn))
    }

    /// Gets the current pool status and statistics.
    #[inline]
    pub fn pool_status(&self) -> PgPoolStatus {
        let status = self.inner.pool.status();
        PgPoolStatus {
            max_size: status.max_size,
            size: status.size,
            available: status.available,
            waiting: status.waiting,
        }
    }

    /// Gets the database configuration used by this client.
    #[inline]
    pub fn config(&self) -> &PgConfig {
        &self.inner.config
    }
}

impl fmt::Debug for PgClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pool_status = self.pool_status();
        f.debug_struct("PgClient")
            .field("database_url", &self.inner.config.database_url_masked())
            .field(
                "pool_max_connections",
                &self.inner.config.postgres_max_connections,
            )
            .field("pool_current_size", &pool_status.size)
            .field("pool_available", &pool_status.available)
            .finish()
    }
}

/// Connection pool status information.
#[derive(Debug, Clone)]
pub struct PgPoolStatus {
    /// Maximum number of connections in the pool
    pub max_size: usize,
    /// Current number of connections in the pool
    pub size: usize,
    /// Number of available connections
    pub available: usize,
    /// Number of requests waiting for connections
    pub waiting: usize,
}

impl PgPoolStatus {
    /// Returns the utilization percentage of the pool (0.0 to 1.0).
    #[inline]
    pub fn utilization(&self) -> f64 {
        if self.max_size == 0 {
            0.0
        } else {
            (self.size - self.available) as f64 / self.max_size as f64
        }
    }
}

/// A wrapper around a pooled database connection.
///
/// `PgConn` owns a connection obtained from the connection pool. When
/// dropped, the connection is automatically returned to the pool.
#[derive(Deref, DerefMut)]
pub struct PgConn {
    #[deref]
    #[deref_mut]
    conn: PooledConnection,
}

impl PgConn {
    /// Creates a new connection wrapper from a pooled connection.
    fn new(conn: PooledConnection) -> Self {
        Self { conn }
    }
}

impl fmt::Debug for PgConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgConn").finish_non_exhaustive()
    }
}
