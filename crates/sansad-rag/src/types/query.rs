//! Request types for the ingestion and query endpoints

use serde::{Deserialize, Serialize};

/// Request to ingest a document by URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestUrlRequest {
    /// URL of the PDF to fetch
    pub pdf_url: String,
    /// Optional free-text source label
    #[serde(default)]
    pub source: Option<String>,
}

/// Query request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question to answer
    pub question: String,
    /// Number of chunks to retrieve (default: 5)
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_k_defaults_to_five() {
        let request: QueryRequest =
            serde_json::from_str(r#"{"question": "what was discussed?"}"#).unwrap();
        assert_eq!(request.top_k, 5);
    }
}
