//! Batch ingestion trigger.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::post;
use paperbot_rig::Chunker;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::handler::{Result, validated};
use crate::pipeline::{IngestOutcome, IngestPipeline};
use crate::service::ServiceState;

/// Tracing target for ingestion requests.
const TRACING_TARGET: &str = "paperbot_server::handler::ingest";

/// Returns the routes for batch ingestion.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/files/process", post(process_files))
}

/// Request payload for batch ingestion.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct ProcessFilesRequest {
    /// Documents to ingest.
    #[validate(length(min = 1, message = "File IDs are required"))]
    ids: Vec<Uuid>,
}

/// Response for batch ingestion.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProcessFilesResponse {
    /// Human-readable completion message.
    message: String,
    /// Per-document outcomes, in request order.
    results: Vec<IngestOutcome>,
}

/// Runs the ingestion pipeline for a batch of documents.
///
/// Returns once every id has reached a terminal state. Per-document
/// failures are reported in the result list and never abort siblings.
#[tracing::instrument(skip_all)]
async fn process_files(
    State(state): State<ServiceState>,
    Json(request): Json<ProcessFilesRequest>,
) -> Result<Json<ProcessFilesResponse>> {
    let request = validated(request)?;

    tracing::info!(
        target: TRACING_TARGET,
        count = request.ids.len(),
        "Processing file batch"
    );

    let pipeline = IngestPipeline::new(
        state.pg_client(),
        state.storage(),
        state.extractors(),
        state.embeddings(),
        state.vectors(),
        Chunker::new(state.pipeline_config().chunk_max_bytes),
    );

    let results = pipeline.run_batch(&request.ids).await;

    Ok(Json(ProcessFilesResponse {
        message: "File processing completed".to_string(),
        results,
    }))
}

#[cfg(test)]
mod tests {
    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn empty_id_set_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server()?;
        let response = server
            .post("/files/process")
            .json(&serde_json::json!({ "ids": [] }))
            .await;
        response.assert_status_bad_request();
        Ok(())
    }
}
