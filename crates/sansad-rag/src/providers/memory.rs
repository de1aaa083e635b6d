//! In-memory vector index with brute-force cosine search
//!
//! The default index for single-process deployments and tests. Search is a
//! linear scan over all stored vectors, which is adequate for a corpus of a
//! few thousand chunks.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashSet;

use crate::error::Result;

use super::vector_index::{IndexEntry, ScoredEntry, VectorIndexProvider};

/// In-memory vector index
#[derive(Default)]
pub struct InMemoryVectorIndex {
    entries: RwLock<Vec<IndexEntry>>,
}

impl InMemoryVectorIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a < f32::EPSILON || mag_b < f32::EPSILON {
        0.0
    } else {
        dot / (mag_a * mag_b)
    }
}

#[async_trait]
impl VectorIndexProvider for InMemoryVectorIndex {
    async fn add(&self, new_entries: &[IndexEntry]) -> Result<()> {
        let mut entries = self.entries.write();
        let known: HashSet<String> = entries.iter().map(|e| e.chunk_id.clone()).collect();
        for entry in new_entries {
            // Re-ingestion idempotence: an existing chunk id is left as is.
            if !known.contains(&entry.chunk_id) {
                entries.push(entry.clone());
            }
        }
        Ok(())
    }

    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredEntry>> {
        let entries = self.entries.read();
        let mut scored: Vec<ScoredEntry> = entries
            .iter()
            .map(|entry| ScoredEntry {
                similarity: cosine_similarity(vector, &entry.embedding),
                entry: entry.clone(),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        Ok(scored)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.entries.read().len())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "in-memory-cosine"
    }
}
