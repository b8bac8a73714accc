//! Health monitoring handlers.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::get;
use paperbot_core::ServiceHealth;
use paperbot_postgres::PgClient;

use crate::handler::Result;
use crate::service::ServiceState;

/// Returns the routes for health monitoring.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health))
}

/// Reports service liveness and connection pool statistics.
async fn health(State(pg_client): State<PgClient>) -> Result<Json<ServiceHealth>> {
    let pool = pg_client.pool_status();

    let health = ServiceHealth::healthy()
        .with_metric("db_pool_size", serde_json::json!(pool.size))
        .with_metric("db_pool_available", serde_json::json!(pool.available));

    Ok(Json(health))
}

#[cfg(test)]
mod tests {
    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn health_endpoint_reports_healthy() -> anyhow::Result<()> {
        let server = create_test_server()?;
        let response = server.get("/health").await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "Healthy");
        Ok(())
    }
}
