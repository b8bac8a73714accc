//! CSV content extractor.

use async_trait::async_trait;

use crate::error::{ExtractError, ExtractResult};
use crate::registry::ContentExtractor;

/// Extractor for CSV files.
///
/// Rows are split on line breaks and fields on commas, then re-joined with
/// spaces into a flattened text representation. The split is intentionally
/// naive: quoted commas and embedded newlines are not handled.
pub struct CsvExtractor;

impl CsvExtractor {
    /// Creates a new CSV extractor.
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentExtractor for CsvExtractor {
    fn supported_types(&self) -> &[&str] {
        &["text/csv"]
    }

    async fn extract(&self, data: &[u8]) -> ExtractResult<String> {
        let content = std::str::from_utf8(data)
            .map_err(|e| ExtractError::parse(format!("CSV is not valid UTF-8: {e}")))?;

        let text = content
            .lines()
            .map(|row| row.split(',').collect::<Vec<_>>().join(" "))
            .collect::<Vec<_>>()
            .join(" \n");

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn flattens_rows_and_fields() {
        let extractor = CsvExtractor::new();
        let text = extractor
            .extract(b"name,age\nalice,30\nbob,41")
            .await
            .unwrap();
        assert_eq!(text, "name age \nalice 30 \nbob 41");
    }

    #[tokio::test]
    async fn quoted_commas_are_split_naively() {
        // Known limitation: no CSV quoting support.
        let extractor = CsvExtractor::new();
        let text = extractor.extract(b"\"a,b\",c").await.unwrap();
        assert_eq!(text, "\"a b\" c");
    }

    #[tokio::test]
    async fn invalid_utf8_is_a_parse_error() {
        let extractor = CsvExtractor::new();
        let result = extractor.extract(&[0xff, 0xfe, 0x00]).await;
        assert!(matches!(result, Err(ExtractError::Parse(_))));
    }
}
