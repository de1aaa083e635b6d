//! sansad-rag: retrieval-augmented question answering over parliamentary
//! session records
//!
//! The crate ingests PDF documents, deduplicates them by content hash,
//! splits extracted text into overlapping word windows with deterministic
//! ids, embeds the windows and indexes them for nearest-neighbor retrieval.
//! Questions are answered by a generative model constrained to the
//! retrieved context. Embedding, generation and the vector index are
//! injected capability ports, so local or remote models can be substituted
//! behind the same contracts.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod storage;
pub mod transport;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use pipeline::RagPipeline;
pub use types::{
    document::{Chunk, Document, ExtractionConfidence, ExtractionResult},
    query::{IngestUrlRequest, QueryRequest},
    response::{AnswerStatus, AnswerSummary, IngestStatus, IngestSummary},
};
