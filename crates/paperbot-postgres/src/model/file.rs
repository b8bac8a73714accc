//! File model for PostgreSQL database operations.

use diesel::prelude::*;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::schema::files;

/// A persisted record of an uploaded document.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = files)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StoredFile {
    /// Unique file identifier
    pub id: Uuid,
    /// Human-readable file name for display (user-editable)
    pub display_name: String,
    /// Original filename when uploaded
    pub original_filename: String,
    /// MIME type of the file
    pub mime_type: String,
    /// Storage key of the blob in object storage
    pub storage_path: String,
    /// Name of the vector index holding this document's chunk embeddings.
    /// Derived at upload time, immutable thereafter.
    pub vector_index: String,
    /// Whether all chunks have been embedded and upserted
    pub is_processed: bool,
    /// Timestamp when the file was uploaded
    pub created_at: OffsetDateTime,
    /// Timestamp when the file was last updated
    pub updated_at: OffsetDateTime,
}

/// Data for creating a new file record.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = files)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewFile {
    /// File ID
    pub id: Uuid,
    /// Display name
    pub display_name: String,
    /// Original filename
    pub original_filename: String,
    /// MIME type
    pub mime_type: String,
    /// Storage key
    pub storage_path: String,
    /// Vector index name
    pub vector_index: String,
    /// Processed flag (false at creation)
    pub is_processed: bool,
}

/// Data for updating a file record.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = files)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateFile {
    /// Display name
    pub display_name: Option<String>,
    /// Processed flag
    pub is_processed: Option<bool>,
}

impl StoredFile {
    /// Returns whether this file can be submitted for ingestion.
    pub fn can_be_processed(&self) -> bool {
        !self.is_processed
    }

    /// Returns the file extension of the original filename, if any.
    pub fn file_extension(&self) -> Option<&str> {
        self.original_filename.rsplit_once('.').map(|(_, ext)| ext)
    }
}
