//! Extraction error types.

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Errors that can occur while extracting text from a document.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// No extractor is registered for the content type.
    #[error("unsupported content type: {0}")]
    UnsupportedFormat(String),

    /// The document parsed but yielded no usable text.
    #[error("document content is empty or invalid")]
    EmptyContent,

    /// The document could not be parsed.
    #[error("extraction failed: {0}")]
    Parse(String),
}

impl ExtractError {
    /// Creates an unsupported format error.
    pub fn unsupported(content_type: impl Into<String>) -> Self {
        Self::UnsupportedFormat(content_type.into())
    }

    /// Creates a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
