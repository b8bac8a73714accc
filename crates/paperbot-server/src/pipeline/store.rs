//! Narrow metadata-store interface used by the pipelines.

use std::future::Future;

use paperbot_postgres::PgClient;
use paperbot_postgres::model::StoredFile;
use paperbot_postgres::query::FileRepository;
use uuid::Uuid;

use super::error::PipelineResult;

/// The slice of document metadata the pipelines depend on.
///
/// Implemented for [`PgClient`] in production; the test suites substitute an
/// in-memory fake. Processed state is always read through this trait, never
/// cached across calls.
pub trait MetadataStore: Send + Sync {
    /// Finds a document record by id.
    fn find(&self, id: Uuid) -> impl Future<Output = PipelineResult<Option<StoredFile>>> + Send;

    /// Finds all existing records among the given ids.
    ///
    /// Unknown ids are silently absent from the result.
    fn find_many(&self, ids: &[Uuid]) -> impl Future<Output = PipelineResult<Vec<StoredFile>>> + Send;

    /// Flips a document's processed flag to true.
    fn mark_processed(&self, id: Uuid) -> impl Future<Output = PipelineResult<()>> + Send;
}

impl MetadataStore for PgClient {
    async fn find(&self, id: Uuid) -> PipelineResult<Option<StoredFile>> {
        Ok(self.find_file_by_id(id).await?)
    }

    async fn find_many(&self, ids: &[Uuid]) -> PipelineResult<Vec<StoredFile>> {
        Ok(self.find_files_by_ids(ids).await?)
    }

    async fn mark_processed(&self, id: Uuid) -> PipelineResult<()> {
        self.mark_file_processed(id).await?;
        Ok(())
    }
}
