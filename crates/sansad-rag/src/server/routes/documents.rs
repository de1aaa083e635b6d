//! Document registry endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::Document;

/// GET /api/documents - List ingested documents, newest first
pub async fn list_documents(State(state): State<AppState>) -> Result<Json<Vec<Document>>> {
    let documents = state.pipeline().list_documents().await?;
    Ok(Json(documents))
}

/// GET /api/documents/:storage_id - Get one document record
pub async fn get_document(
    State(state): State<AppState>,
    Path(storage_id): Path<String>,
) -> Result<Json<Document>> {
    let document = state.pipeline().get_document(&storage_id).await?;
    Ok(Json(document))
}
