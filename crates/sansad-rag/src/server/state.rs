//! Application state for the HTTP server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::pipeline::RagPipeline;
use crate::providers::{InMemoryVectorIndex, OllamaClient, OllamaEmbedder, OllamaGenerator};
use crate::transport::{DocumentFetcher, HttpFetcher};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RagConfig,
    pipeline: Arc<RagPipeline>,
    fetcher: Arc<dyn DocumentFetcher>,
    ready: RwLock<bool>,
}

impl AppState {
    /// Create application state with Ollama providers and the in-memory index
    pub fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing pipeline state...");

        // One HTTP client serves both the embedding and generation endpoints.
        let ollama = Arc::new(OllamaClient::new(&config.llm)?);
        let embedder = Arc::new(OllamaEmbedder::from_client(
            Arc::clone(&ollama),
            config.embeddings.dimensions,
        ));
        let generator = Arc::new(OllamaGenerator::from_client(
            ollama,
            config.llm.generate_model.clone(),
        ));
        let index = Arc::new(InMemoryVectorIndex::new());

        let pipeline = Arc::new(RagPipeline::new(&config, embedder, index, generator)?);
        let fetcher: Arc<dyn DocumentFetcher> = Arc::new(HttpFetcher::new(&config.transport)?);

        tracing::info!(
            embed_model = %config.llm.embed_model,
            generate_model = %config.llm.generate_model,
            data_dir = %config.storage.data_dir.display(),
            "Pipeline initialized"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                fetcher,
                ready: RwLock::new(true),
            }),
        })
    }

    /// Pipeline handle
    pub fn pipeline(&self) -> &Arc<RagPipeline> {
        &self.inner.pipeline
    }

    /// Document download transport
    pub fn fetcher(&self) -> &Arc<dyn DocumentFetcher> {
        &self.inner.fetcher
    }

    /// Configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Whether the server is ready to accept traffic
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }
}
