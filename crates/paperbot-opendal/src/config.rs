//! Storage configuration types.

use serde::{Deserialize, Serialize};

/// Amazon S3 configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct S3Config {
    /// Bucket name.
    pub bucket: String,
    /// AWS region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Custom endpoint (for S3-compatible services).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Access key id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,
    /// Secret access key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_access_key: Option<String>,
}

/// Local filesystem configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FsConfig {
    /// Root directory for stored blobs.
    pub root: String,
}

/// Storage backend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum StorageConfig {
    /// Amazon S3 compatible storage.
    S3(S3Config),
    /// Local filesystem.
    Fs(FsConfig),
    /// In-memory storage (tests and local development).
    Memory,
}

impl StorageConfig {
    /// Returns the backend name as a static string.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::S3(_) => "s3",
            Self::Fs(_) => "fs",
            Self::Memory => "memory",
        }
    }
}
