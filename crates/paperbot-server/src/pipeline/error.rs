//! Pipeline error types.

use paperbot_extract::ExtractError;
use paperbot_opendal::StorageError;
use paperbot_postgres::PgError;
use paperbot_vector::VectorError;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors produced by the ingestion and retrieval pipelines.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The referenced document record does not exist.
    #[error("File not found")]
    NotFound,

    /// The document has already been ingested.
    #[error("File is already processed")]
    AlreadyProcessed,

    /// Text extraction failed (unsupported format, empty content, parse error).
    #[error(transparent)]
    Extraction(#[from] ExtractError),

    /// Blob storage failure.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Vector index failure (missing index, malformed listing, dimension
    /// mismatch, backend errors).
    #[error("vector index error: {0}")]
    Vector(#[from] VectorError),

    /// Embedding or completion service failure.
    #[error("upstream service error: {0}")]
    Upstream(String),

    /// Metadata store failure.
    #[error("database error: {0}")]
    Database(#[from] PgError),

    /// No document in the query set yielded any context.
    #[error("No relevant context found in the provided files.")]
    NoContext,

    /// Request validation failure.
    #[error("validation error: {0}")]
    Validation(String),
}

impl PipelineError {
    /// Creates a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<paperbot_core::Error> for PipelineError {
    fn from(err: paperbot_core::Error) -> Self {
        Self::Upstream(err.to_string())
    }
}
