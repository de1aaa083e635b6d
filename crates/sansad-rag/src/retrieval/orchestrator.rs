//! Retrieval orchestration: embed, search, assemble, generate
//!
//! An empty retrieval result short-circuits before the generation call, so a
//! question against an empty index can never produce an ungrounded answer.
//! Generation failures surface as errors, distinct from "no context found".

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::providers::{EmbeddingProvider, GenerationProvider, VectorIndexProvider};

/// A chunk supplied to the model as grounding
#[derive(Debug, Clone)]
pub struct SupportingChunk {
    /// Deterministic chunk id
    pub chunk_id: String,
    /// Similarity to the question embedding
    pub similarity: f32,
}

/// Outcome of a retrieval-grounded query
#[derive(Debug, Clone)]
pub enum Retrieval {
    /// An answer grounded in the listed chunks, best-match-first
    Answered {
        answer: String,
        supporting: Vec<SupportingChunk>,
    },
    /// No indexed chunks matched; generation was never invoked
    NoContext,
}

/// Orchestrates question embedding, nearest-neighbor search, context
/// assembly and the bounded generation request
pub struct RetrievalOrchestrator {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndexProvider>,
    generator: Arc<dyn GenerationProvider>,
}

impl RetrievalOrchestrator {
    /// Create an orchestrator over the given ports
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
        generator: Arc<dyn GenerationProvider>,
    ) -> Self {
        Self {
            embedder,
            index,
            generator,
        }
    }

    /// Answer a question from retrieved context
    pub async fn answer(&self, question: &str, top_k: usize) -> Result<Retrieval> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::Validation("Question must not be empty".to_string()));
        }
        if top_k == 0 {
            return Err(Error::Validation("top_k must be at least 1".to_string()));
        }

        // The question embedding must live in the same space as the
        // ingestion-time chunk embeddings.
        let query_embedding = self.embedder.embed(question).await?;

        let results = self.index.query(&query_embedding, top_k).await?;
        if results.is_empty() {
            tracing::info!("No relevant context found for query");
            return Ok(Retrieval::NoContext);
        }

        let context = PromptBuilder::build_context(&results);
        let prompt = PromptBuilder::build_grounded_prompt(question, &context);

        let answer = self.generator.generate(&prompt).await?;

        let supporting = results
            .iter()
            .map(|r| SupportingChunk {
                chunk_id: r.entry.chunk_id.clone(),
                similarity: r.similarity,
            })
            .collect();

        Ok(Retrieval::Answered {
            answer,
            supporting,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{IndexEntry, InMemoryVectorIndex};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }

        fn dimensions(&self) -> usize {
            2
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct CountingGenerator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GenerationProvider for CountingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("- stub answer".to_string())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "counting"
        }

        fn model(&self) -> &str {
            "stub"
        }
    }

    #[tokio::test]
    async fn empty_index_returns_no_context_without_generating() {
        let generator = Arc::new(CountingGenerator {
            calls: AtomicUsize::new(0),
        });
        let orchestrator = RetrievalOrchestrator::new(
            Arc::new(FixedEmbedder),
            Arc::new(InMemoryVectorIndex::new()),
            generator.clone(),
        );

        let outcome = orchestrator.answer("what happened?", 5).await.unwrap();
        assert!(matches!(outcome, Retrieval::NoContext));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_question_is_rejected() {
        let orchestrator = RetrievalOrchestrator::new(
            Arc::new(FixedEmbedder),
            Arc::new(InMemoryVectorIndex::new()),
            Arc::new(CountingGenerator {
                calls: AtomicUsize::new(0),
            }),
        );

        let err = orchestrator.answer("   ", 5).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn answered_query_lists_supporting_chunks() {
        let index = Arc::new(InMemoryVectorIndex::new());
        index
            .add(&[IndexEntry {
                chunk_id: "doc.pdf.chunk0".to_string(),
                embedding: vec![1.0, 0.0],
                text: "the budget was discussed".to_string(),
                metadata: HashMap::new(),
            }])
            .await
            .unwrap();

        let orchestrator = RetrievalOrchestrator::new(
            Arc::new(FixedEmbedder),
            index,
            Arc::new(CountingGenerator {
                calls: AtomicUsize::new(0),
            }),
        );

        match orchestrator.answer("what about the budget?", 5).await.unwrap() {
            Retrieval::Answered { answer, supporting } => {
                assert_eq!(answer, "- stub answer");
                assert_eq!(supporting.len(), 1);
                assert_eq!(supporting[0].chunk_id, "doc.pdf.chunk0");
            }
            Retrieval::NoContext => panic!("expected an answer"),
        }
    }
}
