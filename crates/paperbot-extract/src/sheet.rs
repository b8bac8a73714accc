//! Spreadsheet (XLSX) content extractor.

use std::io::Cursor;

use async_trait::async_trait;
use calamine::{Reader, Xlsx};

use crate::TRACING_TARGET;
use crate::error::{ExtractError, ExtractResult};
use crate::registry::ContentExtractor;

/// Extractor for XLSX spreadsheets.
///
/// Only the first sheet is read; subsequent sheets are silently ignored.
/// Each row is flattened by joining cell values with spaces, rows are
/// joined with newlines.
pub struct SpreadsheetExtractor;

impl SpreadsheetExtractor {
    /// Creates a new spreadsheet extractor.
    pub fn new() -> Self {
        Self
    }
}

impl Default for SpreadsheetExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentExtractor for SpreadsheetExtractor {
    fn supported_types(&self) -> &[&str] {
        &["application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"]
    }

    async fn extract(&self, data: &[u8]) -> ExtractResult<String> {
        let bytes = data.to_vec();
        let text = tokio::task::spawn_blocking(move || {
            let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
                .map_err(|e| format!("failed to open workbook: {e}"))?;

            let range = workbook
                .worksheet_range_at(0)
                .ok_or_else(|| "workbook contains no sheets".to_string())?
                .map_err(|e| format!("failed to read first sheet: {e}"))?;

            let text = range
                .rows()
                .map(|row| {
                    row.iter()
                        .map(|cell| cell.to_string())
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect::<Vec<_>>()
                .join(" \n");

            Ok::<_, String>(text)
        })
        .await
        .map_err(|e| ExtractError::parse(format!("task join error: {e}")))?
        .map_err(ExtractError::parse)?;

        tracing::debug!(
            target: TRACING_TARGET,
            chars = text.len(),
            "Extracted first worksheet"
        );

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn garbage_bytes_fail_to_parse() {
        let extractor = SpreadsheetExtractor::new();
        let result = extractor.extract(b"not a zip archive").await;
        assert!(matches!(result, Err(ExtractError::Parse(_))));
    }
}
