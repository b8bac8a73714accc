//! Extractor trait and registry for content-type dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::TRACING_TARGET;
use crate::error::{ExtractError, ExtractResult};
use crate::{CsvExtractor, PdfExtractor, SpreadsheetExtractor};

/// Normalizes a MIME type for registry lookup.
///
/// Strips parameters (`text/csv; charset=utf-8` becomes `text/csv`) and
/// lowercases the remainder.
pub fn normalize_mime(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase()
}

/// Trait for format-specific text extraction.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    /// MIME types this extractor handles.
    fn supported_types(&self) -> &[&str];

    /// Extracts plain text from raw document bytes.
    async fn extract(&self, data: &[u8]) -> ExtractResult<String>;
}

/// Registry of content extractors keyed by normalized MIME type.
pub struct ExtractorRegistry {
    extractors: HashMap<String, Arc<dyn ContentExtractor>>,
}

impl ExtractorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Creates a registry with all built-in extractors registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(PdfExtractor::new());
        registry.register(CsvExtractor::new());
        registry.register(SpreadsheetExtractor::new());
        registry
    }

    /// Registers an extractor under every MIME type it supports.
    pub fn register<E: ContentExtractor + 'static>(&mut self, extractor: E) {
        let extractor = Arc::new(extractor);
        for mime in extractor.supported_types() {
            self.extractors.insert((*mime).to_string(), extractor.clone());
        }
    }

    /// Looks up an extractor for a content type.
    pub fn get(&self, content_type: &str) -> Option<Arc<dyn ContentExtractor>> {
        self.extractors.get(&normalize_mime(content_type)).cloned()
    }

    /// Returns whether a content type is supported.
    pub fn supports(&self, content_type: &str) -> bool {
        self.extractors.contains_key(&normalize_mime(content_type))
    }

    /// Extracts text from document bytes using the extractor registered for
    /// the content type.
    ///
    /// Fails with [`ExtractError::UnsupportedFormat`] when no extractor is
    /// registered and with [`ExtractError::EmptyContent`] when the extracted
    /// text is empty or whitespace-only.
    pub async fn extract(&self, data: &[u8], content_type: &str) -> ExtractResult<String> {
        let extractor = self
            .get(content_type)
            .ok_or_else(|| ExtractError::unsupported(content_type))?;

        tracing::debug!(
            target: TRACING_TARGET,
            content_type = %content_type,
            size = data.len(),
            "Extracting document text"
        );

        let text = extractor.extract(data).await?;

        if text.trim().is_empty() {
            return Err(ExtractError::EmptyContent);
        }

        tracing::debug!(
            target: TRACING_TARGET,
            content_type = %content_type,
            chars = text.len(),
            "Extraction complete"
        );

        Ok(text)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<_> = self.extractors.keys().collect();
        types.sort();
        f.debug_struct("ExtractorRegistry")
            .field("types", &types)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_parameters() {
        assert_eq!(normalize_mime("text/csv; charset=utf-8"), "text/csv");
        assert_eq!(normalize_mime("Application/PDF"), "application/pdf");
    }

    #[test]
    fn default_registry_supports_known_types() {
        let registry = ExtractorRegistry::with_defaults();
        assert!(registry.supports("application/pdf"));
        assert!(registry.supports("text/csv"));
        assert!(registry.supports(
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        ));
        assert!(!registry.supports("video/mp4"));
    }

    #[tokio::test]
    async fn unknown_type_is_unsupported() {
        let registry = ExtractorRegistry::with_defaults();
        let result = registry.extract(b"data", "application/octet-stream").await;
        assert!(matches!(result, Err(ExtractError::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn empty_csv_is_empty_content() {
        let registry = ExtractorRegistry::with_defaults();
        let result = registry.extract(b"", "text/csv").await;
        assert!(matches!(result, Err(ExtractError::EmptyContent)));
    }

    #[tokio::test]
    async fn whitespace_only_csv_is_empty_content() {
        let registry = ExtractorRegistry::with_defaults();
        let result = registry.extract(b"  \n \n  ", "text/csv").await;
        assert!(matches!(result, Err(ExtractError::EmptyContent)));
    }
}
