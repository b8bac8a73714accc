//! CLI configuration management.
//!
//! The complete configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── server: ServerConfig      # Host, port, shutdown
//! └── service: ServiceCliConfig # Postgres, storage, vector index, AI providers
//! ```
//!
//! All configuration can be provided via CLI arguments or environment
//! variables. Use `--help` to see all available options.

mod server;
mod service;

use std::process;

use clap::Parser;
pub use server::ServerConfig;
pub use service::ServiceCliConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::TRACING_TARGET_STARTUP;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "paperbot")]
#[command(about = "Paperbot document question-answering server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// External service configuration (database, storage, AI).
    #[clap(flatten)]
    pub service: ServiceCliConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses
    /// CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is
    /// enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server.validate()?;
        self.service.validate()?;
        Ok(())
    }

    /// Logs configuration at startup (no sensitive information).
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            "starting paperbot server"
        );

        self.server.log();
        self.service.log();
    }
}
