//! Document ingestion endpoints

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{IngestSummary, IngestUrlRequest};

/// POST /api/ingest - Fetch a PDF by URL and ingest it
pub async fn ingest_url(
    State(state): State<AppState>,
    Json(request): Json<IngestUrlRequest>,
) -> Result<Json<IngestSummary>> {
    let url = request.pdf_url.trim();
    if url.is_empty() {
        return Err(Error::Validation("pdf_url must not be empty".to_string()));
    }

    tracing::info!(url = %url, "Fetching document");
    let bytes = state.fetcher().fetch(url).await?;

    let summary = state
        .pipeline()
        .ingest(bytes.to_vec(), request.source)
        .await?;
    Ok(Json(summary))
}

/// POST /api/ingest-file - Upload and ingest a PDF file
pub async fn ingest_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestSummary>> {
    let mut source: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "source" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| Error::Validation(format!("Failed to read source: {}", e)))?;
                if !value.trim().is_empty() {
                    source = Some(value);
                }
            }
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| Error::Validation(format!("Failed to read file: {}", e)))?;
                file = Some((filename, data.to_vec()));
            }
            _ => continue,
        }
    }

    let (filename, data) =
        file.ok_or_else(|| Error::Validation("Missing file field".to_string()))?;

    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(Error::Validation(
            "Only PDF files are supported".to_string(),
        ));
    }

    tracing::info!(filename = %filename, bytes = data.len(), "Processing upload");

    let summary = state.pipeline().ingest(data, source).await?;
    Ok(Json(summary))
}
