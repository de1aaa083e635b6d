//! Query endpoint

use axum::{extract::State, Json};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{AnswerSummary, QueryRequest};

/// POST /api/query - Answer a question over ingested documents
pub async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<AnswerSummary>> {
    tracing::info!(question = %request.question, top_k = request.top_k, "Query received");

    let summary = state
        .pipeline()
        .ask(&request.question, request.top_k)
        .await?;

    Ok(Json(summary))
}
