//! Document and chunk types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Confidence signal on extracted text, driving the OCR-needed decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionConfidence {
    /// Usable text was extracted
    Ok,
    /// Text was extracted but is suspiciously short (< 100 characters)
    Low,
    /// Extraction failed entirely; the document likely needs OCR
    Failed,
}

impl ExtractionConfidence {
    /// Whether this confidence level flags the document for OCR
    pub fn needs_ocr(&self) -> bool {
        !matches!(self, Self::Ok)
    }
}

/// Result of text extraction from document bytes
///
/// Derived on demand, never persisted on its own. Extraction failure is not
/// an error: it yields empty text with `Failed` confidence so ingestion can
/// flag the document for a downstream OCR step instead of aborting.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted plain text, possibly empty
    pub text: String,
    /// Best-effort document metadata (title, author, dates)
    pub metadata: HashMap<String, String>,
    /// Extraction confidence
    pub confidence: ExtractionConfidence,
    /// Detected language label: "en", "hi" or "unknown"
    pub language: String,
}

impl ExtractionResult {
    /// An extraction that produced nothing usable
    pub fn failed() -> Self {
        Self {
            text: String::new(),
            metadata: HashMap::new(),
            confidence: ExtractionConfidence::Failed,
            language: "unknown".to_string(),
        }
    }
}

/// A document that has been ingested
///
/// Identity is the content hash; a document is written once and never
/// mutated or deleted by this subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// SHA-256 hex digest of the raw bytes
    pub content_hash: String,
    /// Unique storage name the blob was persisted under
    pub storage_id: String,
    /// Optional free-text source label supplied by the caller
    pub source: Option<String>,
    /// Detected language label
    pub language: String,
    /// Whether extraction confidence flagged this document for OCR
    pub needs_ocr: bool,
    /// Number of chunks produced at ingestion time
    pub num_chunks: u32,
    /// Ingestion timestamp
    pub ingested_at: chrono::DateTime<chrono::Utc>,
    /// Best-effort extracted metadata
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// A bounded contiguous slice of a document's extracted text
///
/// The unit of embedding and retrieval. Chunk ids are deterministic:
/// `{storage_id}.chunk{ordinal}`, stable across re-runs given identical
/// input text and chunking parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Deterministic chunk id
    pub id: String,
    /// Storage id of the owning document
    pub storage_id: String,
    /// Full window text (not preview-truncated)
    pub text: String,
    /// Window position within the document, starting at 0
    pub ordinal: u32,
}

impl Chunk {
    /// Build the deterministic chunk id for a storage id and ordinal
    pub fn make_id(storage_id: &str, ordinal: u32) -> String {
        format!("{}.chunk{}", storage_id, ordinal)
    }

    /// Create a new chunk
    pub fn new(storage_id: &str, text: String, ordinal: u32) -> Self {
        Self {
            id: Self::make_id(storage_id, ordinal),
            storage_id: storage_id.to_string(),
            text,
            ordinal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_ids_are_deterministic() {
        let a = Chunk::new("1700000000_ab12cd34.pdf", "text".into(), 3);
        let b = Chunk::new("1700000000_ab12cd34.pdf", "other".into(), 3);
        assert_eq!(a.id, "1700000000_ab12cd34.pdf.chunk3");
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn confidence_drives_ocr_flag() {
        assert!(!ExtractionConfidence::Ok.needs_ocr());
        assert!(ExtractionConfidence::Low.needs_ocr());
        assert!(ExtractionConfidence::Failed.needs_ocr());
    }
}
