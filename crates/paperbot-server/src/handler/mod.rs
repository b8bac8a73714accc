//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod error;
mod files;
mod ingest;
mod monitors;
mod query;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{ErrorResponse, Result};
use crate::service::ServiceState;

#[inline]
async fn fallback() -> Response {
    ErrorResponse::NOT_FOUND.into_response()
}

/// Returns a [`Router`] with all routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(files::routes())
        .merge(ingest::routes())
        .merge(query::routes())
        .merge(monitors::routes())
        .fallback(fallback)
}

/// Validates a request payload, mapping failures to a 400 response.
pub(crate) fn validated<T: validator::Validate>(request: T) -> Result<T> {
    if let Err(errors) = request.validate() {
        return Err(ErrorResponse::BAD_REQUEST.with_context(errors.to_string()));
    }
    Ok(request)
}

/// Shorthand for a `201 Created` JSON response.
pub(crate) fn created<T: serde::Serialize>(body: T) -> (StatusCode, axum::Json<T>) {
    (StatusCode::CREATED, axum::Json(body))
}

#[cfg(test)]
pub(crate) mod test {
    use axum_test::TestServer;
    use paperbot_opendal::{StorageBackend, StorageConfig};
    use paperbot_postgres::{PgClient, PgConfig};
    use paperbot_rig::{CompletionProvider, EmbeddingProvider};
    use paperbot_vector::{VectorIndexConfig, VectorIndexManager};

    use super::routes;
    use crate::service::{PipelineConfig, ServiceState};

    /// Returns application state backed by in-memory collaborators.
    ///
    /// The database pool is constructed lazily and never connected by the
    /// handlers exercised here.
    pub fn create_test_state() -> ServiceState {
        let pg_client = PgClient::new(PgConfig::default()).expect("pool");
        let storage = StorageBackend::new(StorageConfig::Memory).expect("storage");
        let vectors = VectorIndexManager::new(VectorIndexConfig::Memory).expect("vectors");

        ServiceState::new(
            pg_client,
            storage,
            vectors,
            EmbeddingProvider::mock(768),
            CompletionProvider::mock(),
            PipelineConfig::default(),
        )
    }

    /// Returns a new [`TestServer`] with the default router and state.
    pub fn create_test_server() -> anyhow::Result<TestServer> {
        let state = create_test_state();
        let app = routes().with_state(state);
        let server = TestServer::new(app)?;
        Ok(server)
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() -> anyhow::Result<()> {
        let server = create_test_server()?;
        let response = server.get("/definitely-not-a-route").await;
        response.assert_status_not_found();
        Ok(())
    }
}
