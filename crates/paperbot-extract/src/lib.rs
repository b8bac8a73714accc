#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod csv;
mod error;
mod pdf;
mod registry;
mod sheet;

pub use csv::CsvExtractor;
pub use error::{ExtractError, ExtractResult};
pub use pdf::PdfExtractor;
pub use registry::{ContentExtractor, ExtractorRegistry, normalize_mime};
pub use sheet::SpreadsheetExtractor;

/// Tracing target for extraction operations.
pub const TRACING_TARGET: &str = "paperbot_extract";
