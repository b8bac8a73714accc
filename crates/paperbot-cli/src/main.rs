#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use paperbot_server::handler::routes;
use paperbot_server::service::ServiceState;
use tower_http::trace::TraceLayer;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "paperbot_cli::server::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "paperbot_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "paperbot_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();
    cli.validate().context("invalid configuration")?;

    let service_config = cli
        .service
        .to_service_config()
        .context("invalid service configuration")?;

    let state = ServiceState::from_config(&service_config)
        .await
        .context("failed to create service state")?;

    let router = create_router(state);

    server::serve_http(router, cli.server).await?;

    Ok(())
}

/// Creates the router with all middleware layers applied.
fn create_router(state: ServiceState) -> Router {
    routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
