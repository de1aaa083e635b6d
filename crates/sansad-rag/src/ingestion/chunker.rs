//! Overlapping word-window chunking with deterministic ids

use crate::config::ChunkingConfig;
use crate::types::Chunk;

/// Text chunker producing overlapping word windows
///
/// Windows start at word offsets 0, stride, 2*stride, ... while the offset
/// is below the token count; trailing windows may be shorter than the
/// target. Output is fully deterministic for identical text and parameters.
pub struct TextChunker {
    target_words: usize,
    overlap: f64,
}

impl TextChunker {
    /// Create a chunker with explicit parameters
    pub fn new(target_words: usize, overlap: f64) -> Self {
        Self {
            target_words,
            overlap,
        }
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.target_words, config.overlap)
    }

    /// Window stride in words
    ///
    /// `round(target * (1 - overlap))`, with the target itself substituted
    /// when the computed stride is 0 so pathological overlap values near 1.0
    /// cannot stall the window loop.
    fn stride(&self) -> usize {
        let stride = (self.target_words as f64 * (1.0 - self.overlap)).round() as usize;
        if stride == 0 {
            self.target_words
        } else {
            stride
        }
    }

    /// Split text into chunks owned by the given storage id
    ///
    /// Empty input yields an empty sequence, not an error.
    pub fn chunk(&self, text: &str, storage_id: &str) -> Vec<Chunk> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Vec::new();
        }

        let stride = self.stride();
        let mut chunks = Vec::new();
        let mut offset = 0usize;
        let mut ordinal = 0u32;

        while offset < words.len() {
            let end = (offset + self.target_words).min(words.len());
            let window = words[offset..end].join(" ");
            chunks.push(Chunk::new(storage_id, window, ordinal));
            ordinal += 1;
            offset += stride;
        }

        chunks
    }
}
