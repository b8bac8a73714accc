//! Byte-bounded text chunking for embedding requests.

mod chunk;
mod metadata;

pub use self::chunk::{OwnedSplitChunk, SplitChunk};
pub use self::metadata::SplitMetadata;

/// Default chunk size in bytes.
///
/// Safely below the embedding service's documented 10,000-byte input ceiling.
pub const DEFAULT_CHUNK_MAX_BYTES: usize = 9_500;

/// Splits extracted document text into bounded-size segments.
///
/// Segment boundaries fall at fixed byte offsets rather than sentence or
/// word boundaries (backed off only as far as needed to stay on a UTF-8
/// character boundary). This is intentionally not an NLP-aware splitter.
#[derive(Debug, Clone)]
pub struct Chunker {
    max_bytes: usize,
}

impl Chunker {
    /// Creates a new chunker with the given maximum segment size in bytes.
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes: max_bytes.max(1),
        }
    }

    /// Returns the configured maximum segment size.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Splits text into ordered segments with byte offset tracking.
    ///
    /// Concatenating the returned segments reproduces the input exactly.
    /// For ASCII input every segment except possibly the last is exactly
    /// `max_bytes` long; multi-byte characters shorten a segment by at most
    /// three bytes to avoid slicing through a code point.
    pub fn split<'a>(&self, text: &'a str) -> Vec<SplitChunk<'a>> {
        let mut chunks = Vec::with_capacity(text.len() / self.max_bytes + 1);
        let mut start = 0;

        while start < text.len() {
            let mut end = usize::min(start + self.max_bytes, text.len());
            while end > start && !text.is_char_boundary(end) {
                end -= 1;
            }
            // A single code point wider than max_bytes still forms a chunk.
            if end == start {
                end = start + 1;
                while end < text.len() && !text.is_char_boundary(end) {
                    end += 1;
                }
            }

            chunks.push(SplitChunk {
                text: &text[start..end],
                metadata: SplitMetadata::new(chunks.len() as u32, start as u32, end as u32),
            });
            start = end;
        }

        chunks
    }

    /// Splits text and returns owned chunks.
    pub fn split_owned(&self, text: &str) -> Vec<OwnedSplitChunk> {
        self.split(text).into_iter().map(|c| c.into_owned()).collect()
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_MAX_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_is_a_partition() {
        let chunker = Chunker::new(4);
        let text = "abcdefghij";
        let chunks = chunker.split(text);

        let rejoined: String = chunks.iter().map(|c| c.text).collect();
        assert_eq!(rejoined, text);
    }

    #[test]
    fn ascii_segments_have_exact_sizes() {
        let chunker = Chunker::new(4);
        let chunks = chunker.split("abcdefghij");

        assert_eq!(chunks.len(), 3); // ceil(10 / 4)
        assert_eq!(chunks[0].text, "abcd");
        assert_eq!(chunks[1].text, "efgh");
        assert_eq!(chunks[2].text, "ij");
    }

    #[test]
    fn segment_count_matches_ceil() {
        let chunker = Chunker::new(100);
        assert_eq!(chunker.split(&"x".repeat(100)).len(), 1);
        assert_eq!(chunker.split(&"x".repeat(101)).len(), 2);
        assert_eq!(chunker.split(&"x".repeat(250)).len(), 3);
    }

    #[test]
    fn empty_input_yields_no_segments() {
        let chunker = Chunker::new(16);
        assert!(chunker.split("").is_empty());
    }

    #[test]
    fn no_segment_is_empty() {
        let chunker = Chunker::new(3);
        for chunk in chunker.split("hello world") {
            assert!(!chunk.text.is_empty());
        }
    }

    #[test]
    fn multibyte_input_stays_a_partition() {
        let chunker = Chunker::new(4);
        let text = "héllo wörld ünïcode";
        let chunks = chunker.split(text);

        let rejoined: String = chunks.iter().map(|c| c.text).collect();
        assert_eq!(rejoined, text);
        for chunk in &chunks {
            assert!(chunk.text.len() <= 4);
        }
    }

    #[test]
    fn oversized_code_point_still_chunks() {
        let chunker = Chunker::new(1);
        let text = "é"; // two bytes
        let chunks = chunker.split(text);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "é");
    }

    #[test]
    fn offsets_are_contiguous() {
        let chunker = Chunker::new(5);
        let chunks = chunker.split("abcdefghijklm");

        let mut expected_start = 0;
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.metadata.chunk_index, i as u32);
            assert_eq!(chunk.metadata.start_offset, expected_start);
            expected_start = chunk.metadata.end_offset;
        }
        assert_eq!(expected_start, 13);
    }
}
