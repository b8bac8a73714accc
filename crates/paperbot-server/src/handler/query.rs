//! Natural-language query trigger.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::post;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::handler::{Result, validated};
use crate::pipeline::AnswerPipeline;
use crate::service::ServiceState;

/// Tracing target for query requests.
const TRACING_TARGET: &str = "paperbot_server::handler::query";

/// Returns the routes for querying.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/files/query", post(query_files))
}

/// Request payload for querying documents.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct QueryFilesRequest {
    /// Natural-language question.
    #[validate(length(min = 1, message = "Query is required"))]
    query: String,
    /// Documents to search.
    #[validate(length(min = 1, message = "File IDs are required"))]
    ids: Vec<Uuid>,
}

/// Response carrying the generated answer.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryFilesResponse {
    /// Completion output, verbatim.
    response: String,
}

/// Answers a question from the most relevant chunks across the selected
/// documents.
#[tracing::instrument(skip_all)]
async fn query_files(
    State(state): State<ServiceState>,
    Json(request): Json<QueryFilesRequest>,
) -> Result<Json<QueryFilesResponse>> {
    let request = validated(request)?;

    tracing::info!(
        target: TRACING_TARGET,
        query_len = request.query.len(),
        files = request.ids.len(),
        "Received query"
    );

    let pipeline = AnswerPipeline::new(
        state.pg_client(),
        state.embeddings(),
        state.completions(),
        state.vectors(),
        state.pipeline_config().retrieval_top_k,
    );

    let response = pipeline.answer(&request.query, &request.ids).await?;

    Ok(Json(QueryFilesResponse { response }))
}

#[cfg(test)]
mod tests {
    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn empty_query_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server()?;
        let response = server
            .post("/files/query")
            .json(&serde_json::json!({ "query": "", "ids": ["00000000-0000-0000-0000-000000000001"] }))
            .await;
        response.assert_status_bad_request();
        Ok(())
    }

    #[tokio::test]
    async fn empty_id_set_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server()?;
        let response = server
            .post("/files/query")
            .json(&serde_json::json!({ "query": "what is this?", "ids": [] }))
            .await;
        response.assert_status_bad_request();
        Ok(())
    }
}
