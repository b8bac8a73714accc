//! Storage backend implementation.

use opendal::Operator;

use crate::TRACING_TARGET;
use crate::config::StorageConfig;
use crate::error::{StorageError, StorageResult};

/// Unified storage backend that wraps OpenDAL operators.
#[derive(Clone)]
pub struct StorageBackend {
    operator: Operator,
    config: StorageConfig,
}

impl StorageBackend {
    /// Creates a new storage backend from configuration.
    pub fn new(config: StorageConfig) -> StorageResult<Self> {
        let operator = Self::create_operator(&config)?;

        tracing::info!(
            target: TRACING_TARGET,
            backend = %config.backend_name(),
            "Storage backend initialized"
        );

        Ok(Self { operator, config })
    }

    /// Returns the configuration for this backend.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Reads a blob from storage.
    pub async fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        tracing::debug!(
            target: TRACING_TARGET,
            path = %path,
            "Reading blob"
        );

        let data = self.operator.read(path).await?.to_vec();

        tracing::debug!(
            target: TRACING_TARGET,
            path = %path,
            size = data.len(),
            "Blob read complete"
        );

        Ok(data)
    }

    /// Writes data to a blob in storage.
    pub async fn write(&self, path: &str, data: &[u8]) -> StorageResult<()> {
        tracing::debug!(
            target: TRACING_TARGET,
            path = %path,
            size = data.len(),
            "Writing blob"
        );

        self.operator.write(path, data.to_vec()).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            path = %path,
            "Blob write complete"
        );

        Ok(())
    }

    /// Deletes a blob from storage.
    pub async fn delete(&self, path: &str) -> StorageResult<()> {
        tracing::debug!(
            target: TRACING_TARGET,
            path = %path,
            "Deleting blob"
        );

        self.operator.delete(path).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            path = %path,
            "Blob deleted"
        );

        Ok(())
    }

    /// Checks if a blob exists.
    pub async fn exists(&self, path: &str) -> StorageResult<bool> {
        Ok(self.operator.exists(path).await?)
    }

    /// Gets metadata for a blob.
    pub async fn stat(&self, path: &str) -> StorageResult<BlobMetadata> {
        let meta = self.operator.stat(path).await?;

        // Convert chrono DateTime to jiff Timestamp
        let last_modified = meta
            .last_modified()
            .and_then(|dt| jiff::Timestamp::from_second(dt.timestamp()).ok());

        Ok(BlobMetadata {
            size: meta.content_length(),
            last_modified,
            content_type: meta.content_type().map(|s| s.to_string()),
        })
    }

    /// Creates an OpenDAL operator based on configuration.
    #[allow(unreachable_patterns)]
    fn create_operator(config: &StorageConfig) -> StorageResult<Operator> {
        use opendal::services;

        match config {
            #[cfg(feature = "s3")]
            StorageConfig::S3(cfg) => {
                let mut builder = services::S3::default().bucket(&cfg.bucket);

                if let Some(ref region) = cfg.region {
                    builder = builder.region(region);
                }

                if let Some(ref endpoint) = cfg.endpoint {
                    builder = builder.endpoint(endpoint);
                }

                if let Some(ref access_key_id) = cfg.access_key_id {
                    builder = builder.access_key_id(access_key_id);
                }

                if let Some(ref secret_access_key) = cfg.secret_access_key {
                    builder = builder.secret_access_key(secret_access_key);
                }

                Operator::new(builder)
                    .map(|op| op.finish())
                    .map_err(|e| StorageError::init(e.to_string()))
            }

            #[cfg(feature = "fs")]
            StorageConfig::Fs(cfg) => {
                let builder = services::Fs::default().root(&cfg.root);

                Operator::new(builder)
                    .map(|op| op.finish())
                    .map_err(|e| StorageError::init(e.to_string()))
            }

            #[cfg(feature = "memory")]
            StorageConfig::Memory => {
                let builder = services::Memory::default();

                Operator::new(builder)
                    .map(|op| op.finish())
                    .map_err(|e| StorageError::init(e.to_string()))
            }

            // This should never be reached if the config was properly created
            // with the same features enabled
            #[allow(unreachable_patterns)]
            _ => Err(StorageError::init(format!(
                "Backend type {:?} is not supported with current features",
                config.backend_name()
            ))),
        }
    }
}

/// Blob metadata.
#[derive(Debug, Clone)]
pub struct BlobMetadata {
    /// Blob size in bytes.
    pub size: u64,
    /// Last modification time.
    pub last_modified: Option<jiff::Timestamp>,
    /// Content type / MIME type.
    pub content_type: Option<String>,
}

impl std::fmt::Debug for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageBackend")
            .field("backend", &self.config.backend_name())
            .finish()
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;

    fn memory_backend() -> StorageBackend {
        StorageBackend::new(StorageConfig::Memory).expect("memory backend")
    }

    #[tokio::test]
    async fn write_read_roundtrip() {
        let storage = memory_backend();
        storage.write("docs/a.pdf", b"content").await.unwrap();

        let data = storage.read("docs/a.pdf").await.unwrap();
        assert_eq!(data, b"content");
    }

    #[tokio::test]
    async fn missing_blob_is_not_found() {
        let storage = memory_backend();
        let result = storage.read("missing").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_blob() {
        let storage = memory_backend();
        storage.write("a", b"x").await.unwrap();
        assert!(storage.exists("a").await.unwrap());

        storage.delete("a").await.unwrap();
        assert!(!storage.exists("a").await.unwrap());
    }
}
