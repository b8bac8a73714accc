//! PDF content extractor.

use async_trait::async_trait;
use lopdf::Document;

use crate::TRACING_TARGET;
use crate::error::{ExtractError, ExtractResult};
use crate::registry::ContentExtractor;

/// Extractor for PDF files.
///
/// Page text is extracted in document order via `pdf-extract`; `lopdf` is
/// used to report the page count.
pub struct PdfExtractor;

impl PdfExtractor {
    /// Creates a new PDF extractor.
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentExtractor for PdfExtractor {
    fn supported_types(&self) -> &[&str] {
        &["application/pdf"]
    }

    async fn extract(&self, data: &[u8]) -> ExtractResult<String> {
        // Both parsers are CPU-bound and synchronous.
        let bytes = data.to_vec();
        let (text, page_count) = tokio::task::spawn_blocking(move || {
            let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())?;
            let page_count = Document::load_mem(&bytes)
                .map(|doc| doc.get_pages().len())
                .unwrap_or(0);
            Ok::<_, String>((text, page_count))
        })
        .await
        .map_err(|e| ExtractError::parse(format!("task join error: {e}")))?
        .map_err(|e| ExtractError::parse(format!("PDF extraction failed: {e}")))?;

        tracing::debug!(
            target: TRACING_TARGET,
            pages = page_count,
            chars = text.len(),
            "Extracted PDF text"
        );

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn garbage_bytes_fail_to_parse() {
        let extractor = PdfExtractor::new();
        let result = extractor.extract(b"definitely not a pdf").await;
        assert!(matches!(result, Err(ExtractError::Parse(_))));
    }
}
