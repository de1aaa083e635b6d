//! Pipeline facade: ingest-one-document and answer-one-question
//!
//! Composes ContentStore -> TextExtractor -> Chunker -> embed -> index on
//! the ingestion side and delegates queries to the retrieval orchestrator.
//! Providers are injected, never imported as globals, so tests can swap in
//! deterministic stub ports.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::ingestion::{TextChunker, TextExtractor};
use crate::providers::{EmbeddingProvider, GenerationProvider, IndexEntry, VectorIndexProvider};
use crate::retrieval::{Retrieval, RetrievalOrchestrator};
use crate::storage::{ContentStore, IngestionLedger, PreviewStore};
use crate::types::{AnswerSummary, Chunk, Document, IngestSummary};

/// End-to-end ingestion and query pipeline
pub struct RagPipeline {
    content_store: Arc<ContentStore>,
    previews: Arc<PreviewStore>,
    ledger: Arc<IngestionLedger>,
    chunker: TextChunker,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndexProvider>,
    orchestrator: RetrievalOrchestrator,
}

impl RagPipeline {
    /// Build a pipeline from configuration and injected provider ports
    pub fn new(
        config: &RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
        generator: Arc<dyn GenerationProvider>,
    ) -> Result<Self> {
        let ledger = Arc::new(IngestionLedger::open(config.storage.ledger_path())?);
        let content_store = Arc::new(ContentStore::new(
            config.storage.blob_dir(),
            Arc::clone(&ledger),
            config.storage.max_document_size,
        )?);
        let previews = Arc::new(PreviewStore::new(
            config.storage.preview_dir(),
            config.chunking.preview_chars,
        )?);

        let orchestrator = RetrievalOrchestrator::new(
            Arc::clone(&embedder),
            Arc::clone(&index),
            generator,
        );

        Ok(Self {
            content_store,
            previews,
            ledger,
            chunker: TextChunker::from_config(&config.chunking),
            embedder,
            index,
            orchestrator,
        })
    }

    /// Ingest one document
    ///
    /// Duplicate bytes short-circuit after the content-hash check: nothing
    /// is re-extracted, re-chunked or re-indexed.
    pub async fn ingest(&self, bytes: Vec<u8>, source: Option<String>) -> Result<IngestSummary> {
        let store = Arc::clone(&self.content_store);
        let (blob, bytes) = tokio::task::spawn_blocking(move || {
            let blob = store.put(&bytes)?;
            Ok::<_, Error>((blob, bytes))
        })
        .await
        .map_err(|e| Error::Internal(format!("Task join error: {}", e)))??;

        if blob.is_duplicate {
            tracing::info!(
                storage_id = %blob.storage_id,
                "Duplicate upload, returning existing document"
            );
            return Ok(IngestSummary::duplicate(
                blob.content_hash,
                blob.storage_id,
                source,
            ));
        }

        let extraction = tokio::task::spawn_blocking(move || {
            TextExtractor::new().extract(&bytes)
        })
        .await
        .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?;

        let chunks = self.chunker.chunk(&extraction.text, &blob.storage_id);
        let chunk_ids: Vec<String> = chunks.iter().map(|c| c.id.clone()).collect();

        if !chunks.is_empty() {
            self.embed_and_index(&chunks, source.as_deref()).await?;
            self.write_previews(&chunks).await?;
        }

        let document = Document {
            content_hash: blob.content_hash,
            storage_id: blob.storage_id,
            source,
            language: extraction.language,
            needs_ocr: extraction.confidence.needs_ocr(),
            num_chunks: chunks.len() as u32,
            ingested_at: chrono::Utc::now(),
            metadata: extraction.metadata,
        };

        let ledger = Arc::clone(&self.ledger);
        let record = document.clone();
        tokio::task::spawn_blocking(move || ledger.record_document(&record))
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))??;

        tracing::info!(
            storage_id = %document.storage_id,
            num_chunks = document.num_chunks,
            needs_ocr = document.needs_ocr,
            "Document ingested"
        );

        Ok(IngestSummary::ingested(&document, chunk_ids))
    }

    /// Answer one question from retrieved context
    pub async fn ask(&self, question: &str, top_k: usize) -> Result<AnswerSummary> {
        match self.orchestrator.answer(question, top_k).await? {
            Retrieval::Answered { answer, supporting } => Ok(AnswerSummary::answered(
                answer,
                supporting.into_iter().map(|s| s.chunk_id).collect(),
            )),
            Retrieval::NoContext => Ok(AnswerSummary::no_context()),
        }
    }

    /// Embed full chunk texts and add them to the vector index
    ///
    /// The full window text is the unit sent to the embedder; preview
    /// truncation never degrades what gets indexed.
    async fn embed_and_index(&self, chunks: &[Chunk], source: Option<&str>) -> Result<()> {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let entries: Vec<IndexEntry> = chunks
            .iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| {
                let mut metadata = HashMap::new();
                metadata.insert("storage_id".to_string(), chunk.storage_id.clone());
                metadata.insert("ordinal".to_string(), chunk.ordinal.to_string());
                if let Some(source) = source {
                    metadata.insert("source".to_string(), source.to_string());
                }
                IndexEntry {
                    chunk_id: chunk.id.clone(),
                    embedding,
                    text: chunk.text.clone(),
                    metadata,
                }
            })
            .collect();

        self.index.add(&entries).await
    }

    /// Persist truncated chunk previews
    async fn write_previews(&self, chunks: &[Chunk]) -> Result<()> {
        let previews = Arc::clone(&self.previews);
        let chunks = chunks.to_vec();
        tokio::task::spawn_blocking(move || {
            for chunk in &chunks {
                previews.write(&chunk.id, &chunk.text)?;
            }
            Ok::<_, Error>(())
        })
        .await
        .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?
    }

    /// List all ingested documents, newest first
    pub async fn list_documents(&self) -> Result<Vec<Document>> {
        let ledger = Arc::clone(&self.ledger);
        tokio::task::spawn_blocking(move || ledger.list_documents())
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?
    }

    /// Fetch one ingested document by storage id
    pub async fn get_document(&self, storage_id: &str) -> Result<Document> {
        let ledger = Arc::clone(&self.ledger);
        let storage_id = storage_id.to_string();
        tokio::task::spawn_blocking(move || {
            ledger
                .get_document(&storage_id)?
                .ok_or(Error::DocumentNotFound(storage_id))
        })
        .await
        .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?
    }

    /// Number of entries currently in the vector index
    pub async fn indexed_chunks(&self) -> Result<usize> {
        self.index.len().await
    }
}
