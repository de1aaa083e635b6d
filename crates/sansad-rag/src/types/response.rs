//! Response types for the ingestion and query endpoints

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::document::Document;

/// Outcome of an ingestion request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestStatus {
    /// Bytes already known; nothing was written or re-processed
    Duplicate,
    /// New document stored, chunked and indexed
    Ingested,
}

/// Structured summary returned by the ingest operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSummary {
    /// Whether the document was new or a duplicate
    pub status: IngestStatus,
    /// SHA-256 hex digest of the uploaded bytes
    pub content_hash: String,
    /// Storage id the bytes live under (the existing one for duplicates)
    pub storage_id: String,
    /// Source label supplied by the caller
    pub source: Option<String>,
    /// Detected language label
    pub language: String,
    /// Whether the document is flagged for a downstream OCR step
    pub needs_ocr: bool,
    /// Hint for the caller: "ocr_required" or "ready_for_embedding"
    pub next_step: String,
    /// Number of chunks produced
    pub num_chunks: usize,
    /// Ordered chunk ids
    pub chunk_ids: Vec<String>,
    /// Best-effort extracted document metadata
    pub metadata: HashMap<String, String>,
}

impl IngestSummary {
    /// Summary for a duplicate upload; points at the existing storage id
    pub fn duplicate(content_hash: String, storage_id: String, source: Option<String>) -> Self {
        Self {
            status: IngestStatus::Duplicate,
            content_hash,
            storage_id,
            source,
            language: "unknown".to_string(),
            needs_ocr: false,
            next_step: "none".to_string(),
            num_chunks: 0,
            chunk_ids: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    /// Summary for a freshly ingested document
    pub fn ingested(document: &Document, chunk_ids: Vec<String>) -> Self {
        let next_step = if document.needs_ocr {
            "ocr_required"
        } else {
            "ready_for_embedding"
        };

        Self {
            status: IngestStatus::Ingested,
            content_hash: document.content_hash.clone(),
            storage_id: document.storage_id.clone(),
            source: document.source.clone(),
            language: document.language.clone(),
            needs_ocr: document.needs_ocr,
            next_step: next_step.to_string(),
            num_chunks: chunk_ids.len(),
            chunk_ids,
            metadata: document.metadata.clone(),
        }
    }
}

/// Outcome of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStatus {
    /// The question was answered from retrieved context
    Answered,
    /// No indexed chunks matched; generation was never invoked
    NoContext,
}

/// Structured summary returned by the query operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerSummary {
    /// Whether an answer was produced
    pub status: AnswerStatus,
    /// Generated answer text; absent when no context was found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// Chunk ids supplied to the model as grounding, best-match-first
    pub supporting_chunk_ids: Vec<String>,
}

impl AnswerSummary {
    /// Deterministic "no relevant context" result
    pub fn no_context() -> Self {
        Self {
            status: AnswerStatus::NoContext,
            answer: None,
            supporting_chunk_ids: Vec::new(),
        }
    }

    /// An answered query
    pub fn answered(answer: String, supporting_chunk_ids: Vec<String>) -> Self {
        Self {
            status: AnswerStatus::Answered,
            answer: Some(answer),
            supporting_chunk_ids,
        }
    }
}
