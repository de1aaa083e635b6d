//! Pipeline server binary
//!
//! Run with: cargo run -p sansad-rag --bin sansad-rag-server
//!
//! Set SANSAD_RAG_CONFIG to a TOML file to override the defaults.

use sansad_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sansad_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::var("SANSAD_RAG_CONFIG") {
        Ok(path) => RagConfig::from_file(&path)?,
        Err(_) => RagConfig::default(),
    };

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - Embedding dimensions: {}", config.embeddings.dimensions);
    tracing::info!("  - Generation model: {}", config.llm.generate_model);
    tracing::info!(
        "  - Chunking: {} words, {:.0}% overlap",
        config.chunking.target_words,
        config.chunking.overlap * 100.0
    );
    tracing::info!("  - Data dir: {}", config.storage.data_dir.display());

    // Warn early if the model backend is down; requests would fail later.
    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    let client = reqwest::Client::new();
    match client
        .get(format!("{}/api/tags", config.llm.base_url))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Ollama is running");
        }
        _ => {
            tracing::warn!("Ollama not available at {}", config.llm.base_url);
            tracing::warn!("Start it with: ollama serve");
            tracing::warn!(
                "Pull models with: ollama pull {} && ollama pull {}",
                config.llm.embed_model,
                config.llm.generate_model
            );
        }
    }

    let server = RagServer::new(config)?;

    tracing::info!("API: http://{}", server.address());
    tracing::info!("Endpoints:");
    tracing::info!("  POST /api/ingest      - Ingest a PDF by URL");
    tracing::info!("  POST /api/ingest-file - Upload a PDF file");
    tracing::info!("  POST /api/query       - Ask a question");
    tracing::info!("  GET  /api/documents   - List documents");

    server.start().await?;

    Ok(())
}
