//! File repository for managing uploaded document records.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewFile, StoredFile, UpdateFile};
use crate::{PgClient, PgResult, TRACING_TARGET_QUERY, schema};

/// Repository for file record database operations.
///
/// Handles record lifecycle: upload tracking, the processed flag flipped by
/// the ingestion pipeline, renames, and deletion.
pub trait FileRepository {
    /// Creates a new file record.
    fn create_file(&self, new_file: NewFile) -> impl Future<Output = PgResult<StoredFile>> + Send;

    /// Finds a file by its unique identifier.
    fn find_file_by_id(
        &self,
        file_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<StoredFile>>> + Send;

    /// Finds multiple files by their IDs in a single query.
    ///
    /// Unknown ids are silently absent from the result.
    fn find_files_by_ids(
        &self,
        file_ids: &[Uuid],
    ) -> impl Future<Output = PgResult<Vec<StoredFile>>> + Send;

    /// Lists all file records, most recently uploaded first.
    fn list_files(&self) -> impl Future<Output = PgResult<Vec<StoredFile>>> + Send;

    /// Renames a file record (display name only).
    fn rename_file(
        &self,
        file_id: Uuid,
        display_name: &str,
    ) -> impl Future<Output = PgResult<StoredFile>> + Send;

    /// Marks a file as processed.
    fn mark_file_processed(
        &self,
        file_id: Uuid,
    ) -> impl Future<Output = PgResult<StoredFile>> + Send;

    /// Deletes a file record. Returns the number of affected rows.
    fn delete_file(&self, file_id: Uuid) -> impl Future<Output = PgResult<usize>> + Send;
}

impl FileRepository for PgClient {
    async fn create_file(&self, new_file: NewFile) -> PgResult<StoredFile> {
        let mut conn = self.get_connection().await?;

        let file = diesel::insert_into(schema::files::table)
            .values(&new_file)
            .returning(StoredFile::as_returning())
            .get_result(&mut *conn)
            .await?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            file_id = %file.id,
            "Created file record"
        );

        Ok(file)
    }

    async fn find_file_by_id(&self, file_id: Uuid) -> PgResult<Option<StoredFile>> {
        use schema::files::dsl;

        let mut conn = self.get_connection().await?;

        let file = dsl::files
            .find(file_id)
            .select(StoredFile::as_select())
            .first(&mut *conn)
            .await
            .optional()?;

        Ok(file)
    }

    async fn find_files_by_ids(&self, file_ids: &[Uuid]) -> PgResult<Vec<StoredFile>> {
        use schema::files::dsl;

        let mut conn = self.get_connection().await?;

        let files = dsl::files
            .filter(dsl::id.eq_any(file_ids))
            .select(StoredFile::as_select())
            .load(&mut *conn)
            .await?;

        Ok(files)
    }

    async fn list_files(&self) -> PgResult<Vec<StoredFile>> {
        use schema::files::dsl;

        let mut conn = self.get_connection().await?;

        let files = dsl::files
            .order(dsl::created_at.desc())
            .select(StoredFile::as_select())
            .load(&mut *conn)
            .await?;

        Ok(files)
    }

    async fn rename_file(&self, file_id: Uuid, display_name: &str) -> PgResult<StoredFile> {
        use schema::files::dsl;

        let mut conn = self.get_connection().await?;

        let updates = UpdateFile {
            display_name: Some(display_name.to_string()),
            is_processed: None,
        };

        let file = diesel::update(dsl::files.find(file_id))
            .set((&updates, dsl::updated_at.eq(diesel::dsl::now)))
            .returning(StoredFile::as_returning())
            .get_result(&mut *conn)
            .await?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            file_id = %file.id,
            "Renamed file record"
        );

        Ok(file)
    }

    async fn mark_file_processed(&self, file_id: Uuid) -> PgResult<StoredFile> {
        use schema::files::dsl;

        let mut conn = self.get_connection().await?;

        let file = diesel::update(dsl::files.find(file_id))
            .set((
                dsl::is_processed.eq(true),
                dsl::updated_at.eq(diesel::dsl::now),
            ))
            .returning(StoredFile::as_returning())
            .get_result(&mut *conn)
            .await?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            file_id = %file.id,
            "Marked file as processed"
        );

        Ok(file)
    }

    async fn delete_file(&self, file_id: Uuid) -> PgResult<usize> {
        use schema::files::dsl;

        let mut conn = self.get_connection().await?;

        let deleted = diesel::delete(dsl::files.find(file_id))
            .execute(&mut *conn)
            .await?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            file_id = %file_id,
            deleted,
            "Deleted file record"
        );

        Ok(deleted)
    }
}
