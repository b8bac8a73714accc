//! File management handlers: upload, listing, rename and cascade delete.

use axum::Json;
use axum::Router;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{patch, post};
use paperbot_postgres::PgClient;
use paperbot_postgres::model::{NewFile, StoredFile};
use paperbot_postgres::query::FileRepository;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

use crate::handler::{ErrorResponse, Result, created, validated};
use crate::service::ServiceState;

/// Tracing target for file operations.
const TRACING_TARGET: &str = "paperbot_server::handler::files";

/// Maximum accepted upload size in bytes.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Returns the routes for file management.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/files", post(upload_file).get(list_files))
        .route("/files/{fileId}", patch(rename_file).delete(delete_file))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// `Path` param for `{fileId}` handlers.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilePathParams {
    /// Unique identifier of the file.
    file_id: Uuid,
}

/// An uploaded document, decoded from the multipart form.
///
/// Either an inline file part or a remote link pointing at a downloadable
/// document.
#[derive(Debug)]
struct UploadPayload {
    file_name: String,
    content_type: String,
    data: Vec<u8>,
}

/// Response returned when a file is successfully uploaded.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadFileResponse {
    /// Human-readable completion message.
    message: String,
    /// ID of the created record.
    file_id: Uuid,
    /// Storage key of the uploaded blob.
    file_url: String,
    /// Name of the vector index created for this document.
    index_name: String,
}

/// Uploads a document, creates its vector index and metadata record.
///
/// Accepts a multipart form with either a `file` part or a `remoteUrl`
/// field referencing a downloadable document.
#[tracing::instrument(skip_all)]
async fn upload_file(
    State(state): State<ServiceState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadFileResponse>)> {
    let payload = decode_upload(&state, multipart).await?;

    if !state.extractors().supports(&payload.content_type) {
        return Err(ErrorResponse::BAD_REQUEST
            .with_message("Unsupported file type")
            .with_context(payload.content_type));
    }

    let short_name = generate_file_name(&payload.file_name);
    let storage_path = match file_extension(&payload.file_name) {
        Some(ext) => format!("{short_name}.{ext}"),
        None => short_name.clone(),
    };

    tracing::info!(
        target: TRACING_TARGET,
        file_name = %payload.file_name,
        short_name = %short_name,
        content_type = %payload.content_type,
        size = payload.data.len(),
        "Uploading file"
    );

    state
        .storage()
        .write(&storage_path, &payload.data)
        .await
        .map_err(|e| ErrorResponse::INTERNAL_SERVER_ERROR.with_context(e.to_string()))?;

    state
        .vectors()
        .ensure_index(&short_name, state.embeddings().dimensions())
        .await
        .map_err(|e| ErrorResponse::INTERNAL_SERVER_ERROR.with_context(e.to_string()))?;

    let file = state
        .pg_client()
        .create_file(NewFile {
            id: Uuid::new_v4(),
            display_name: short_name.clone(),
            original_filename: payload.file_name,
            mime_type: payload.content_type,
            storage_path: storage_path.clone(),
            vector_index: short_name.clone(),
            is_processed: false,
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        file_id = %file.id,
        index_name = %short_name,
        "File uploaded and index created"
    );

    Ok(created(UploadFileResponse {
        message: "File uploaded successfully and index created".to_string(),
        file_id: file.id,
        file_url: storage_path,
        index_name: short_name,
    }))
}

/// Decodes the multipart form into an upload payload.
async fn decode_upload(
    state: &ServiceState,
    mut multipart: Multipart,
) -> Result<UploadPayload> {
    let mut file: Option<UploadPayload> = None;
    let mut remote_url: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ErrorResponse::BAD_REQUEST.with_context(e.to_string()))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| ErrorResponse::BAD_REQUEST.with_message("Invalid file data"))?;
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .ok_or_else(|| ErrorResponse::BAD_REQUEST.with_message("Invalid file data"))?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ErrorResponse::BAD_REQUEST.with_context(e.to_string()))?
                    .to_vec();

                file = Some(UploadPayload {
                    file_name,
                    content_type,
                    data,
                });
            }
            Some("remoteUrl") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ErrorResponse::BAD_REQUEST.with_context(e.to_string()))?;
                remote_url = Some(value);
            }
            _ => {}
        }
    }

    if let Some(file) = file {
        return Ok(file);
    }
    if let Some(link) = remote_url {
        return fetch_remote_file(state, &link).await;
    }

    Err(ErrorResponse::BAD_REQUEST.with_message("A file or remote link is required"))
}

/// Downloads a document from a remote link.
async fn fetch_remote_file(state: &ServiceState, link: &str) -> Result<UploadPayload> {
    let parsed = url::Url::parse(link)
        .map_err(|_| ErrorResponse::BAD_REQUEST.with_message("Invalid remote link"))?;

    let file_name = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .unwrap_or("download")
        .to_string();

    tracing::info!(
        target: TRACING_TARGET,
        url = %parsed,
        "Downloading remote file"
    );

    let response = state
        .http_client()
        .get(parsed)
        .send()
        .await
        .map_err(|e| ErrorResponse::BAD_REQUEST.with_context(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ErrorResponse::BAD_REQUEST
            .with_message("Failed to download file from remote link"));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            ErrorResponse::BAD_REQUEST.with_message("Remote file has no content type")
        })?;

    let data = response
        .bytes()
        .await
        .map_err(|e| ErrorResponse::BAD_REQUEST.with_context(e.to_string()))?
        .to_vec();

    Ok(UploadPayload {
        file_name,
        content_type,
        data,
    })
}

/// A file record in the listing.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListFilesResponseItem {
    /// ID of the file.
    file_id: Uuid,
    /// Display name.
    display_name: String,
    /// Storage key of the blob.
    file_url: String,
    /// Name of the file's vector index.
    index_name: String,
    /// Whether ingestion has completed.
    is_processed: bool,
    /// Upload timestamp.
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl From<StoredFile> for ListFilesResponseItem {
    fn from(file: StoredFile) -> Self {
        Self {
            file_id: file.id,
            display_name: file.display_name,
            file_url: file.storage_path,
            index_name: file.vector_index,
            is_processed: file.is_processed,
            created_at: file.created_at,
        }
    }
}

/// Response for listing all files.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListFilesResponse {
    /// All uploaded files, most recent first.
    files: Vec<ListFilesResponseItem>,
}

/// Lists all uploaded files.
#[tracing::instrument(skip_all)]
async fn list_files(State(pg_client): State<PgClient>) -> Result<Json<ListFilesResponse>> {
    let files = pg_client.list_files().await?;

    Ok(Json(ListFilesResponse {
        files: files.into_iter().map(Into::into).collect(),
    }))
}

/// Request payload for renaming a file.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct RenameFileRequest {
    /// New display name.
    #[validate(length(min = 1, max = 255))]
    display_name: String,
}

/// Plain message response.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageResponse {
    /// Human-readable completion message.
    message: String,
}

/// Renames a file record.
///
/// Only the display name changes; storage, index and pipeline state are
/// untouched.
#[tracing::instrument(skip_all)]
async fn rename_file(
    State(pg_client): State<PgClient>,
    Path(path_params): Path<FilePathParams>,
    Json(request): Json<RenameFileRequest>,
) -> Result<Json<MessageResponse>> {
    let request = validated(request)?;

    let file = pg_client
        .find_file_by_id(path_params.file_id)
        .await?
        .ok_or(ErrorResponse::NOT_FOUND)?;

    pg_client
        .rename_file(file.id, &request.display_name)
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        file_id = %file.id,
        display_name = %request.display_name,
        "File renamed"
    );

    Ok(Json(MessageResponse {
        message: "File name updated successfully.".to_string(),
    }))
}

/// Deletes a file.
///
/// Cascades in order: vector index, storage blob, metadata record. Each step
/// is logged; a partial failure surfaces as a 500 and completed steps are
/// not rolled back.
#[tracing::instrument(skip_all)]
async fn delete_file(
    State(state): State<ServiceState>,
    Path(path_params): Path<FilePathParams>,
) -> Result<Json<MessageResponse>> {
    let file = state
        .pg_client()
        .find_file_by_id(path_params.file_id)
        .await?
        .ok_or(ErrorResponse::NOT_FOUND)?;

    state
        .vectors()
        .delete_index(&file.vector_index)
        .await
        .map_err(|e| ErrorResponse::INTERNAL_SERVER_ERROR.with_context(e.to_string()))?;
    tracing::info!(
        target: TRACING_TARGET,
        file_id = %file.id,
        index = %file.vector_index,
        "Deleted vector index"
    );

    state
        .storage()
        .delete(&file.storage_path)
        .await
        .map_err(|e| ErrorResponse::INTERNAL_SERVER_ERROR.with_context(e.to_string()))?;
    tracing::info!(
        target: TRACING_TARGET,
        file_id = %file.id,
        path = %file.storage_path,
        "Deleted storage blob"
    );

    state.pg_client().delete_file(file.id).await?;
    tracing::info!(
        target: TRACING_TARGET,
        file_id = %file.id,
        "Deleted file record"
    );

    Ok(Json(MessageResponse {
        message: "File deleted successfully.".to_string(),
    }))
}

/// Derives the short internal name: slugified base name plus a uniqueness
/// token.
fn generate_file_name(original_name: &str) -> String {
    let base = original_name.split('.').next().unwrap_or(original_name);
    let token = Uuid::new_v4().simple().to_string();
    format!("{}-{}", slugify(base), &token[..8])
}

/// Lowercases and replaces every non-alphanumeric run with a single dash.
fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut last_dash = true;

    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }

    if slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("file");
    }
    slug
}

/// Returns the lowercase file extension, if any.
fn file_extension(file_name: &str) -> Option<String> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_flattens_punctuation() {
        assert_eq!(slugify("Annual Report (2024)"), "annual-report-2024");
        assert_eq!(slugify("__weird___name__"), "weird-name");
        assert_eq!(slugify("...."), "file");
    }

    #[test]
    fn generated_names_are_unique() {
        let a = generate_file_name("report.pdf");
        let b = generate_file_name("report.pdf");
        assert_ne!(a, b);
        assert!(a.starts_with("report-"));
    }

    #[test]
    fn extension_extraction() {
        assert_eq!(file_extension("report.PDF"), Some("pdf".to_string()));
        assert_eq!(file_extension("data.tar.gz"), Some("gz".to_string()));
        assert_eq!(file_extension("noext"), None);
    }
}
