//! API routes

pub mod documents;
pub mod ingest;
pub mod query;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route("/ingest", post(ingest::ingest_url))
        .route(
            "/ingest-file",
            post(ingest::ingest_file).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/query", post(query::query))
        .route("/documents", get(documents::list_documents))
        .route("/documents/:storage_id", get(documents::get_document))
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "sansad-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "RAG pipeline for parliamentary session records",
        "endpoints": {
            "POST /api/ingest": "Ingest a PDF by URL",
            "POST /api/ingest-file": "Upload and ingest a PDF file",
            "POST /api/query": "Ask a question over ingested documents",
            "GET /api/documents": "List ingested documents",
            "GET /api/documents/:storage_id": "Get one document record"
        },
        "features": {
            "deduplication": "Content-hash based document deduplication",
            "ocr_flagging": "Low-confidence extraction flags documents for OCR",
            "grounded_answers": "Answers are scoped to retrieved document context"
        }
    }))
}
