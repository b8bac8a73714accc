//! Pinecone backend configuration.

use serde::{Deserialize, Serialize};

/// Default control plane endpoint.
pub(crate) const DEFAULT_API_BASE: &str = "https://api.pinecone.io";

/// Default per-call timeout in seconds.
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_cloud() -> String {
    "aws".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Pinecone serverless configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PineconeConfig {
    /// API key for the control and data planes.
    pub api_key: String,
    /// Control plane endpoint.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Serverless cloud provider for created indexes.
    #[serde(default = "default_cloud")]
    pub cloud: String,
    /// Serverless region for created indexes.
    #[serde(default = "default_region")]
    pub region: String,
    /// Per-call timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl PineconeConfig {
    /// Creates a configuration with the default serverless spec.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: default_api_base(),
            cloud: default_cloud(),
            region: default_region(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
