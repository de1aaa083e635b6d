//! Vector index provider trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;

/// Entry stored in the vector index, one per embedded chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Deterministic chunk id
    pub chunk_id: String,
    /// Embedding vector
    pub embedding: Vec<f32>,
    /// Full chunk text used as grounding context at query time
    pub text: String,
    /// Metadata (storage id, ordinal, source label)
    pub metadata: HashMap<String, String>,
}

/// Query result with its similarity score
#[derive(Debug, Clone)]
pub struct ScoredEntry {
    /// The matched entry
    pub entry: IndexEntry,
    /// Similarity score (0.0 to 1.0, higher is more similar)
    pub similarity: f32,
}

/// Trait for vector storage and k-nearest-neighbor search
///
/// The distance metric is the implementation's concern but must be the same
/// at ingestion and query time. Results come back best-match-first.
#[async_trait]
pub trait VectorIndexProvider: Send + Sync {
    /// Insert entries; re-inserting an existing chunk id must not create a
    /// duplicate entry
    async fn add(&self, entries: &[IndexEntry]) -> Result<()>;

    /// Query the k nearest entries to a vector
    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredEntry>>;

    /// Total number of entries stored
    async fn len(&self) -> Result<usize>;

    /// Check if the index is empty
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Check if the provider is healthy
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
