//! Core data types for documents, chunks, requests and responses

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, Document, ExtractionConfidence, ExtractionResult};
pub use query::{IngestUrlRequest, QueryRequest};
pub use response::{AnswerStatus, AnswerSummary, IngestStatus, IngestSummary};
