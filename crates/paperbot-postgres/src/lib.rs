#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod client;
mod error;
pub mod model;
pub mod query;
pub mod schema;

pub use client::{PgClient, PgConfig, PgConn, PgPoolStatus};
pub use error::{PgError, PgResult};

/// Async PostgreSQL connection type used throughout this crate.
pub type PgConnection = diesel_async::AsyncPgConnection;

/// Tracing target for connection management.
pub const TRACING_TARGET_CONNECTION: &str = "paperbot_postgres::connection";

/// Tracing target for query execution.
pub const TRACING_TARGET_QUERY: &str = "paperbot_postgres::query";
